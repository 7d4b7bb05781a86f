//! Page capability trait

use core::any::Any;

use hmilink_protocol::{CommandError, HostCommand, TextPayload, TouchAction, TouchCoordinate};

use crate::diagnostics::Diagnostic;
use crate::traits::Outbound;

/// Page identifier as configured in the display editor (0-255)
pub type PageId = u8;

/// Handle passed to every page hook
///
/// Carries the page's lifecycle flags as read-only facts and gates
/// outbound instructions on the page being active, so a page that is not
/// on screen cannot disturb the live display.
pub struct PageLink<'a> {
    out: &'a mut dyn Outbound,
    page_id: PageId,
    active: bool,
    initialized: bool,
}

impl<'a> PageLink<'a> {
    /// Build a link for `page_id` with the given lifecycle flags
    ///
    /// The controller does this for every hook call; it is public so pages
    /// can be exercised on their own.
    pub fn new(
        out: &'a mut dyn Outbound,
        page_id: PageId,
        active: bool,
        initialized: bool,
    ) -> Self {
        Self {
            out,
            page_id,
            active,
            initialized,
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Whether the page is the one currently displayed
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the page's one-time init has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Send a raw instruction (`t0.txt="Hi"`, `n0.val=42`, ...)
    ///
    /// Silently dropped unless the page is active. Returns whether the
    /// instruction went out.
    pub fn send_command(&mut self, command: &str) -> bool {
        if !self.active {
            trace!("page {} not active, dropping command", self.page_id);
            self.out.record(Diagnostic::CommandSuppressed {
                page_id: self.page_id,
            });
            return false;
        }

        self.out.send(command.as_bytes());
        true
    }

    /// Ask the display to show another page
    ///
    /// Navigation is allowed from any page, active or not.
    pub fn set_page(&mut self, page_id: PageId) {
        if let Ok(instruction) = HostCommand::Page(page_id).instruction() {
            self.out.send(instruction.as_bytes());
        }
    }
}

/// A page of the display UI
///
/// Implemented by application code. The controller never creates or
/// destroys pages; it holds them for its lifetime and calls the hooks
/// below. Only `id`, `begin_once` and `refresh` are mandatory.
pub trait Page {
    /// Stable id matching the page number in the display project
    fn id(&self) -> PageId;

    /// One-time setup, run exactly once, right after the first `on_enter`
    fn begin_once(&mut self, link: &mut PageLink<'_>);

    /// Called every time the page becomes active
    fn on_enter(&mut self, link: &mut PageLink<'_>) {
        let _ = link;
    }

    /// Called every time the page stops being active, while still active
    fn on_leave(&mut self, link: &mut PageLink<'_>) {
        let _ = link;
    }

    /// Periodic or forced update of dynamic content
    fn refresh(&mut self, now_ms: u32, link: &mut PageLink<'_>);

    /// Component touch (0x65) on this page
    fn on_touch(&mut self, component_id: u8, action: TouchAction, link: &mut PageLink<'_>) {
        let _ = (component_id, action, link);
    }

    /// Raw touch position (0x67 / 0x68)
    fn on_touch_coordinate(&mut self, touch: TouchCoordinate, link: &mut PageLink<'_>) {
        let _ = (touch, link);
    }

    /// String return (0x70)
    fn on_text(&mut self, text: TextPayload<'_>, link: &mut PageLink<'_>) {
        let _ = (text, link);
    }

    /// Numeric return (0x71)
    fn on_numeric(&mut self, value: u32, link: &mut PageLink<'_>) {
        let _ = (value, link);
    }

    /// Last instruction succeeded (0x01)
    fn on_command_ack(&mut self, code: u8, link: &mut PageLink<'_>) {
        let _ = (code, link);
    }

    /// Last instruction failed; severity is the page's call
    fn on_command_error(&mut self, error: CommandError, link: &mut PageLink<'_>) {
        let _ = (error, link);
    }

    /// Display entered (`true`) or left (`false`) auto-sleep
    fn on_sleep_change(&mut self, entering: bool, link: &mut PageLink<'_>) {
        let _ = (entering, link);
    }

    /// Application-defined notification unrelated to the wire protocol
    ///
    /// `update_type` values are the application's to define; `payload` can
    /// be downcast to whatever type that update carries.
    fn on_external_update(
        &mut self,
        update_type: u8,
        payload: Option<&dyn Any>,
        link: &mut PageLink<'_>,
    ) {
        let _ = (update_type, payload, link);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeOutbound;

    #[test]
    fn test_inactive_page_cannot_send() {
        let mut out = FakeOutbound::default();
        let mut link = PageLink::new(&mut out, 3, false, true);
        assert!(!link.send_command("t0.txt=\"x\""));
        drop(link);

        assert!(out.sent.is_empty());
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::CommandSuppressed { page_id: 3 }]
        );
    }

    #[test]
    fn test_active_page_sends() {
        let mut out = FakeOutbound::default();
        let mut link = PageLink::new(&mut out, 1, true, false);
        assert!(link.send_command("n0.val=42"));
        assert!(link.is_active());
        assert!(!link.is_initialized());
        drop(link);

        assert_eq!(out.sent, vec![b"n0.val=42".to_vec()]);
    }

    #[test]
    fn test_set_page_allowed_when_inactive() {
        let mut out = FakeOutbound::default();
        let mut link = PageLink::new(&mut out, 1, false, true);
        link.set_page(4);
        drop(link);

        assert_eq!(out.sent, vec![b"page 4".to_vec()]);
    }
}
