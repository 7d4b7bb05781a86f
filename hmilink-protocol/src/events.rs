//! Typed fields carried by display messages

/// Touch state reported with component and coordinate touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchAction {
    /// Finger lifted
    Release,
    /// Finger down
    Press,
    /// Any other value the firmware chose to send
    Other(u8),
}

// Wire format values
const TOUCH_RELEASE: u8 = 0x00;
const TOUCH_PRESS: u8 = 0x01;

impl TouchAction {
    /// Parse the event-type byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            TOUCH_RELEASE => TouchAction::Release,
            TOUCH_PRESS => TouchAction::Press,
            other => TouchAction::Other(other),
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            TouchAction::Release => TOUCH_RELEASE,
            TouchAction::Press => TOUCH_PRESS,
            TouchAction::Other(byte) => byte,
        }
    }

    pub fn is_press(&self) -> bool {
        matches!(self, TouchAction::Press)
    }
}

/// Raw touch position (0x67 awake, 0x68 while asleep)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchCoordinate {
    /// X position in pixels
    pub x: u16,
    /// Y position in pixels
    pub y: u16,
    pub action: TouchAction,
    /// Touch arrived while the panel was sleeping
    pub asleep: bool,
}

/// Instruction failures reported by the display
///
/// These are data for the active page, not errors of the link itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// 0x00: instruction not understood
    InvalidInstruction,
    /// 0x02: component name or id does not exist
    InvalidComponent,
    /// 0x03: page id does not exist
    InvalidPage,
    /// 0x04: picture resource does not exist
    InvalidPicture,
    /// 0x1A: variable or attribute does not exist
    InvalidVariable,
    /// 0x1B: operation not valid for the variable
    InvalidOperation,
    /// 0x1C: assignment rejected
    AssignmentFailed,
}

impl CommandError {
    /// Map a response code to an error, `None` for non-error codes
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(CommandError::InvalidInstruction),
            0x02 => Some(CommandError::InvalidComponent),
            0x03 => Some(CommandError::InvalidPage),
            0x04 => Some(CommandError::InvalidPicture),
            0x1A => Some(CommandError::InvalidVariable),
            0x1B => Some(CommandError::InvalidOperation),
            0x1C => Some(CommandError::AssignmentFailed),
            _ => None,
        }
    }

    /// Response code as sent by the display
    pub fn code(self) -> u8 {
        match self {
            CommandError::InvalidInstruction => 0x00,
            CommandError::InvalidComponent => 0x02,
            CommandError::InvalidPage => 0x03,
            CommandError::InvalidPicture => 0x04,
            CommandError::InvalidVariable => 0x1A,
            CommandError::InvalidOperation => 0x1B,
            CommandError::AssignmentFailed => 0x1C,
        }
    }
}

/// Body of a text return (0x70)
///
/// The device gives no guarantee the bytes are printable or UTF-8, so the
/// raw bytes stay available next to the text views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextPayload<'a> {
    bytes: &'a [u8],
}

impl<'a> TextPayload<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.bytes).ok()
    }

    /// One character per byte (Latin-1), never fails
    pub fn chars(&self) -> impl Iterator<Item = char> + 'a {
        self.bytes.iter().map(|&b| char::from(b))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
