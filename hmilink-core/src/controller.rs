//! Polled display-link controller
//!
//! The controller is the single owner of the serial link. Each call to
//! [`DisplayController::poll`]:
//! - Drains the bytes the transport already holds through the framer
//! - Decodes completed frames and dispatches them to the page lifecycle
//! - Abandons a stale partial frame and asks the display to resync
//! - Ticks the refresh scheduler for the active page

use core::any::Any;

use hmilink_hal::Uart;
use hmilink_protocol::messages::MSG_SUCCESS;
use hmilink_protocol::{
    DisplayEvent, Frame, FrameAssembler, FramerEvent, HostCommand, DEFAULT_RX_CAPACITY,
};

use crate::config::LinkConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink, NoDiagnostics, TransferDirection};
use crate::lifecycle::{PageLifecycle, PageRegistry, PageState};
use crate::link::Link;
use crate::scheduler::RefreshScheduler;
use crate::traits::{Outbound, Page, PageId};

/// Bytes pulled from the transport per read
const RX_CHUNK_SIZE: usize = 64;

/// Link health counters
///
/// All counters wrap on overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Frames completed by the framer
    pub frames: u32,
    /// Frames too short for their type
    pub dropped: u32,
    /// Frames with an unknown type byte
    pub unknown: u32,
    /// Frames lost to receive buffer overflow
    pub overflows: u32,
    /// Partial frames abandoned after going stale
    pub timeouts: u32,
    /// `sendme` resync requests sent
    pub resyncs: u32,
}

/// Controller for one display on one serial link
///
/// `N` is the receive buffer capacity for a single frame.
pub struct DisplayController<'p, T, D = NoDiagnostics, const N: usize = DEFAULT_RX_CAPACITY>
where
    T: Uart,
    D: DiagnosticSink,
{
    link: Link<T, D>,
    framer: FrameAssembler<N>,
    lifecycle: PageLifecycle<'p>,
    scheduler: RefreshScheduler,
    config: LinkConfig,
    stats: LinkStats,
    last_poll_ms: u32,
}

impl<'p, T: Uart> DisplayController<'p, T> {
    /// Create a controller with default configuration and no diagnostics
    pub fn new(transport: T, registry: PageRegistry<'p>) -> Self {
        Self::with_config(transport, registry, LinkConfig::default(), NoDiagnostics)
    }
}

impl<'p, T, D, const N: usize> DisplayController<'p, T, D, N>
where
    T: Uart,
    D: DiagnosticSink,
{
    pub fn with_config(
        transport: T,
        registry: PageRegistry<'p>,
        config: LinkConfig,
        diagnostics: D,
    ) -> Self {
        Self {
            link: Link::new(transport, diagnostics),
            framer: FrameAssembler::with_timeout(config.frame_timeout_ms),
            lifecycle: PageLifecycle::new(registry),
            scheduler: RefreshScheduler::new(config.refresh_interval_ms),
            config,
            stats: LinkStats::default(),
            last_poll_ms: 0,
        }
    }

    /// Activate the first page and ask the display which page it shows
    ///
    /// Returns whether a page is active afterwards.
    pub fn begin(&mut self) -> bool {
        info!("display link starting, {} pages", self.lifecycle.registry().len());
        self.framer.reset();
        self.lifecycle.activate_initial(&mut self.link);
        self.stats.resyncs = self.stats.resyncs.wrapping_add(1);
        self.lifecycle.has_active_page()
    }

    /// Process everything the transport holds, then run timers
    ///
    /// `now_ms` is a free-running millisecond counter; wraparound is fine.
    pub fn poll(&mut self, now_ms: u32) {
        self.last_poll_ms = now_ms;
        self.drain(now_ms);

        if let Some(discarded) = self.framer.check_timeout(now_ms) {
            handle_timeout(discarded, &mut self.lifecycle, &mut self.link, &mut self.stats);
        }

        if self.lifecycle.has_active_page() && self.scheduler.poll(now_ms) {
            trace!("refresh tick at {}", now_ms);
            self.lifecycle
                .with_active(&mut self.link, |page, link| page.refresh(now_ms, link));
        }
    }

    /// Feed pending bytes to the framer in chunks until the transport is empty
    fn drain(&mut self, now_ms: u32) {
        let mut chunk = [0u8; RX_CHUNK_SIZE];
        loop {
            let len = match self.link.transport_mut().read_available(&mut chunk) {
                Ok(0) => break,
                Ok(len) => len,
                Err(_) => {
                    warn!("failed to read from display");
                    self.link.record(Diagnostic::TransportError {
                        direction: TransferDirection::Read,
                    });
                    break;
                }
            };
            trace!("rx {} bytes", len);

            let Self {
                link,
                framer,
                lifecycle,
                stats,
                ..
            } = &mut *self;
            framer.drain(chunk[..len].iter().copied(), now_ms, |event| {
                handle_framer_event(event, lifecycle, link, stats)
            });
        }
    }

    /// Write a raw instruction, bypassing page gating
    pub fn send_raw(&mut self, command: &str) {
        self.link.send(command.as_bytes());
    }

    /// Refresh the active page now, outside the schedule
    ///
    /// The page sees the timestamp of the most recent poll. The schedule is
    /// left alone, so the next periodic tick comes when it would have.
    /// Returns `false` when no page is active.
    pub fn force_refresh(&mut self) -> bool {
        let now_ms = self.last_poll_ms;
        self.lifecycle
            .with_active(&mut self.link, |page, link| page.refresh(now_ms, link))
    }

    /// The page believed to be on screen
    pub fn current_page(&self) -> Option<&dyn Page> {
        self.lifecycle.current_page()
    }

    pub fn current_page_id(&self) -> Option<PageId> {
        self.lifecycle
            .has_active_page()
            .then(|| self.lifecycle.current_id())
    }

    /// Ask the display to report its current page
    ///
    /// The answer arrives as a page-change event on a later poll.
    pub fn request_current_page(&mut self) {
        self.lifecycle.request_resync(&mut self.link);
        self.stats.resyncs = self.stats.resyncs.wrapping_add(1);
    }

    /// Change the active page locally without telling the display
    pub fn switch_to(&mut self, page_id: PageId) -> bool {
        self.lifecycle.switch_to(page_id, &mut self.link)
    }

    /// Tell the display to show `page_id` and make it the active page
    ///
    /// Nothing is sent for unregistered ids.
    pub fn show_page(&mut self, page_id: PageId) -> bool {
        if !self.lifecycle.registry().contains(page_id) {
            self.link.record(Diagnostic::UnknownPage { page_id });
            return false;
        }
        if let Ok(instruction) = HostCommand::Page(page_id).instruction() {
            self.link.send(instruction.as_bytes());
        }
        self.lifecycle.switch_to(page_id, &mut self.link)
    }

    /// Deliver an application notification to the active page
    pub fn notify_current(&mut self, update_type: u8, payload: Option<&dyn Any>) -> bool {
        self.lifecycle.with_active(&mut self.link, |page, link| {
            page.on_external_update(update_type, payload, link)
        })
    }

    /// Deliver an application notification to a specific page
    ///
    /// Inactive pages receive it too; whatever they try to send is dropped.
    pub fn notify_page(
        &mut self,
        page_id: PageId,
        update_type: u8,
        payload: Option<&dyn Any>,
    ) -> bool {
        self.lifecycle.with_page(page_id, &mut self.link, |page, link| {
            page.on_external_update(update_type, payload, link)
        })
    }

    pub fn page_state(&self, page_id: PageId) -> Option<PageState> {
        self.lifecycle.page_state(page_id)
    }

    pub fn is_page_active(&self, page_id: PageId) -> bool {
        self.page_state(page_id).is_some_and(|state| state.active)
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        self.link.transport()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.link.transport_mut()
    }

    pub fn diagnostics(&self) -> &D {
        self.link.diagnostics()
    }

    pub fn diagnostics_mut(&mut self) -> &mut D {
        self.link.diagnostics_mut()
    }
}

fn handle_framer_event(
    event: FramerEvent<'_>,
    lifecycle: &mut PageLifecycle<'_>,
    out: &mut dyn Outbound,
    stats: &mut LinkStats,
) {
    match event {
        FramerEvent::Frame(frame) => dispatch(frame, lifecycle, out, stats),
        FramerEvent::Overflow { discarded } => {
            warn!("receive buffer overflow, dropped {} bytes", discarded);
            stats.overflows = stats.overflows.wrapping_add(1);
            out.record(Diagnostic::FrameOverflow { discarded });
        }
        FramerEvent::TimedOut { discarded } => handle_timeout(discarded, lifecycle, out, stats),
    }
}

fn handle_timeout(
    discarded: usize,
    lifecycle: &mut PageLifecycle<'_>,
    out: &mut dyn Outbound,
    stats: &mut LinkStats,
) {
    debug!("partial frame of {} bytes went stale", discarded);
    stats.timeouts = stats.timeouts.wrapping_add(1);
    out.record(Diagnostic::FrameTimeout { discarded });

    // Lost bytes may have been a page change
    lifecycle.request_resync(out);
    stats.resyncs = stats.resyncs.wrapping_add(1);
}

fn dispatch(
    frame: Frame<'_>,
    lifecycle: &mut PageLifecycle<'_>,
    out: &mut dyn Outbound,
    stats: &mut LinkStats,
) {
    stats.frames = stats.frames.wrapping_add(1);

    let Some(event) = DisplayEvent::from_frame(&frame) else {
        let msg_type = frame.msg_type().unwrap_or_default();
        trace!("dropping short frame type {:x}", msg_type);
        stats.dropped = stats.dropped.wrapping_add(1);
        out.record(Diagnostic::FrameDropped {
            msg_type,
            len: frame.len(),
        });
        return;
    };

    match event {
        DisplayEvent::CommandSuccess => {
            lifecycle.with_active(out, |page, link| page.on_command_ack(MSG_SUCCESS, link));
        }
        DisplayEvent::CommandError(error) => {
            lifecycle.with_active(out, |page, link| page.on_command_error(error, link));
        }
        DisplayEvent::Touch {
            page_id,
            component_id,
            action,
        } => {
            lifecycle.on_touch(page_id, component_id, action, out);
        }
        DisplayEvent::PageChange { page_id } => {
            debug!("display reports page {}", page_id);
            lifecycle.switch_to(page_id, out);
        }
        DisplayEvent::TouchCoordinate(touch) => {
            lifecycle.with_active(out, |page, link| page.on_touch_coordinate(touch, link));
        }
        DisplayEvent::Text(text) => {
            lifecycle.with_active(out, |page, link| page.on_text(text, link));
        }
        DisplayEvent::Numeric(value) => {
            lifecycle.with_active(out, |page, link| page.on_numeric(value, link));
        }
        DisplayEvent::SleepChange { entering } => {
            lifecycle.with_active(out, |page, link| page.on_sleep_change(entering, link));
        }
        DisplayEvent::Unknown { msg_type } => {
            trace!("ignoring message type {:x}", msg_type);
            stats.unknown = stats.unknown.wrapping_add(1);
            out.record(Diagnostic::UnknownMessage { msg_type });
        }
    }
}
