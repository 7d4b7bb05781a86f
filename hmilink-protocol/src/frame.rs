//! Byte-stream framing for the display protocol.
//!
//! Frame format (display → host):
//! - TYPE (1 byte): message type identifier, never 0xFF
//! - PAYLOAD (0-N bytes): type-specific data, may contain 0xFF
//! - TERMINATOR (3 bytes): 0xFF 0xFF 0xFF
//!
//! There is no length field and no checksum. A frame ends at the first run
//! of three boundary bytes, so a payload may carry one or two 0xFF bytes in
//! a row but never three.

use heapless::Vec;

/// Boundary byte; three in a row terminate a frame
pub const BOUNDARY_BYTE: u8 = 0xFF;

/// Terminator appended to every message in both directions
pub const TERMINATOR: [u8; 3] = [BOUNDARY_BYTE; 3];

/// Default receive buffer capacity (payload plus terminator)
pub const DEFAULT_RX_CAPACITY: usize = 256;

/// Default silence after which a partial frame is abandoned
pub const DEFAULT_FRAME_TIMEOUT_MS: u32 = 800;

/// A complete message, terminator stripped
///
/// Borrowed from the assembler's buffer; only valid until the next byte is
/// fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame<'a> {
    bytes: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Wrap already-delimited message bytes (no terminator)
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Message type identifier (first byte)
    pub fn msg_type(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// Whole message including the type byte
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Bytes after the type byte
    pub fn payload(&self) -> &'a [u8] {
        self.bytes.get(1..).unwrap_or(&[])
    }

    /// Message length including the type byte
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Something the assembler has to report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramerEvent<'a> {
    /// Three boundary bytes closed a frame
    Frame(Frame<'a>),
    /// The frame outgrew the receive buffer; the rest of it up to the
    /// next terminator is skipped without producing a frame
    Overflow { discarded: usize },
    /// A partial frame went stale and was thrown away
    TimedOut { discarded: usize },
}

/// Assembler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramerState {
    /// Between frames; stray boundary bytes are dropped
    Idle,
    /// Collecting bytes of a frame
    Assembling,
    /// Skipping the rest of an overflowed frame up to its terminator
    Discarding,
}

/// State machine turning a serial byte stream into frames
///
/// `N` bounds the bytes held for one frame, terminator included.
#[derive(Debug, Clone)]
pub struct FrameAssembler<const N: usize = DEFAULT_RX_CAPACITY> {
    state: FramerState,
    buffer: Vec<u8, N>,
    boundary_run: u8,
    last_byte_ms: u32,
    timeout_ms: u32,
}

impl<const N: usize> Default for FrameAssembler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameAssembler<N> {
    /// Create an assembler with the default partial-frame timeout
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_FRAME_TIMEOUT_MS)
    }

    /// Create an assembler abandoning partial frames after `timeout_ms`
    pub fn with_timeout(timeout_ms: u32) -> Self {
        Self {
            state: FramerState::Idle,
            buffer: Vec::new(),
            boundary_run: 0,
            last_byte_ms: 0,
            timeout_ms,
        }
    }

    /// Drop any partial frame and go back to `Idle`
    pub fn reset(&mut self) {
        self.state = FramerState::Idle;
        self.buffer.clear();
        self.boundary_run = 0;
    }

    pub fn state(&self) -> FramerState {
        self.state
    }

    pub fn is_assembling(&self) -> bool {
        self.state == FramerState::Assembling
    }

    /// Bytes held for the frame in progress
    pub fn buffered(&self) -> usize {
        match self.state {
            FramerState::Assembling => self.buffer.len(),
            FramerState::Idle | FramerState::Discarding => 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    fn is_stale(&self, now_ms: u32) -> bool {
        self.state != FramerState::Idle && now_ms.wrapping_sub(self.last_byte_ms) > self.timeout_ms
    }

    fn abandon(&mut self) -> usize {
        let discarded = self.buffered();
        self.reset();
        discarded
    }

    /// Abandon the frame in progress if the link has been silent too long
    ///
    /// Also ends skipping an overflowed frame whose terminator never came.
    /// Returns the number of buffered bytes thrown away.
    pub fn check_timeout(&mut self, now_ms: u32) -> Option<usize> {
        if self.is_stale(now_ms) {
            Some(self.abandon())
        } else {
            None
        }
    }

    /// Feed a single byte received at `now_ms`
    ///
    /// A stale partial frame is abandoned before the byte is considered, so
    /// old bytes never end up in front of a new message.
    pub fn feed(&mut self, byte: u8, now_ms: u32) -> Option<FramerEvent<'_>> {
        let stale = self.check_timeout(now_ms);
        self.last_byte_ms = now_ms;
        let timed_out = stale.map(|discarded| FramerEvent::TimedOut { discarded });

        match self.state {
            FramerState::Idle => {
                // Boundary bytes between frames are line noise
                if byte == BOUNDARY_BYTE {
                    return timed_out;
                }
                self.buffer.clear();
                self.boundary_run = 0;
                self.state = FramerState::Assembling;
            }
            FramerState::Discarding => {
                if self.count_boundary(byte) {
                    self.reset();
                }
                return timed_out;
            }
            FramerState::Assembling => {}
        }

        if self.buffer.push(byte).is_err() {
            let discarded = self.buffer.len() + 1;
            self.buffer.clear();
            if self.count_boundary(byte) {
                // The overflowing byte closed the frame
                self.reset();
            } else {
                self.state = FramerState::Discarding;
            }
            return Some(FramerEvent::Overflow { discarded });
        }

        if self.count_boundary(byte) {
            self.state = FramerState::Idle;
            self.boundary_run = 0;
            let len = self.buffer.len() - TERMINATOR.len();
            return Some(FramerEvent::Frame(Frame::new(&self.buffer[..len])));
        }

        timed_out
    }

    /// Track the boundary run; true once it forms a terminator
    fn count_boundary(&mut self, byte: u8) -> bool {
        if byte == BOUNDARY_BYTE {
            self.boundary_run += 1;
        } else {
            self.boundary_run = 0;
        }
        usize::from(self.boundary_run) == TERMINATOR.len()
    }

    /// Feed every byte `bytes` yields, reporting each event as it happens
    ///
    /// Returns the number of bytes consumed.
    pub fn drain<I, F>(&mut self, bytes: I, now_ms: u32, mut on_event: F) -> usize
    where
        I: IntoIterator<Item = u8>,
        F: FnMut(FramerEvent<'_>),
    {
        let mut consumed = 0;
        for byte in bytes {
            consumed += 1;
            if let Some(event) = self.feed(byte, now_ms) {
                on_event(event);
            }
        }
        consumed
    }
}
