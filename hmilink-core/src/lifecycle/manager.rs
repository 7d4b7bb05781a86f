//! Active-page tracking and transitions

use hmilink_protocol::{HostCommand, TouchAction};

use super::registry::{PageRegistry, PageSlot, PageState};
use crate::diagnostics::Diagnostic;
use crate::traits::{Outbound, Page, PageId, PageLink};

/// Owner of the registry and the single active page
///
/// Invariant: at most one page is flagged active, and it is always the
/// page at `current`.
pub struct PageLifecycle<'p> {
    registry: PageRegistry<'p>,
    current: usize,
}

impl<'p> PageLifecycle<'p> {
    /// Take over a registry
    ///
    /// The first page is marked active straight away so it can send
    /// commands before the display has confirmed which page it shows. No
    /// hooks run until [`activate_initial`](Self::activate_initial).
    pub fn new(mut registry: PageRegistry<'p>) -> Self {
        registry.slot_mut(0).state.active = true;
        Self {
            registry,
            current: 0,
        }
    }

    pub fn registry(&self) -> &PageRegistry<'p> {
        &self.registry
    }

    /// Id of the page believed to be on screen
    pub fn current_id(&self) -> PageId {
        self.registry.slot(self.current).page.id()
    }

    /// The active page, if any
    pub fn current_page(&self) -> Option<&dyn Page> {
        let slot = self.registry.slot(self.current);
        if slot.state.active {
            Some(&*slot.page)
        } else {
            None
        }
    }

    pub fn has_active_page(&self) -> bool {
        self.registry.slot(self.current).state.active
    }

    pub fn page_state(&self, page_id: PageId) -> Option<PageState> {
        self.registry.state(page_id)
    }

    /// Activate the first registered page and ask the display where it is
    ///
    /// Runs `on_enter` and, the first time, `begin_once` on that page. The
    /// display's answer arrives later as a page-change event.
    pub fn activate_initial(&mut self, out: &mut dyn Outbound) {
        self.activate(0, out);
        self.request_resync(out);
    }

    /// Send the resync request (`sendme`)
    pub fn request_resync(&self, out: &mut dyn Outbound) {
        debug!("requesting current page from display");
        if let Ok(instruction) = HostCommand::SendMe.instruction() {
            out.send(instruction.as_bytes());
        }
        out.record(Diagnostic::ResyncRequested);
    }

    /// Make `page_id` the active page
    ///
    /// Unknown ids leave everything untouched and return `false`. Switching
    /// to the page that is already active is a successful no-op. Otherwise
    /// the outgoing page gets `on_leave`, the incoming page `on_enter` and,
    /// if it never ran, `begin_once`, in that order.
    pub fn switch_to(&mut self, page_id: PageId, out: &mut dyn Outbound) -> bool {
        let Some(target) = self.registry.position(page_id) else {
            warn!("switch to unknown page {}", page_id);
            out.record(Diagnostic::UnknownPage { page_id });
            return false;
        };

        if target == self.current && self.has_active_page() {
            return true;
        }

        self.activate(target, out);
        true
    }

    /// Deliver a component touch
    ///
    /// A touch naming another page proves the display moved without us
    /// noticing; switch there first and deliver only if that worked.
    /// Returns whether the touch reached a page.
    pub fn on_touch(
        &mut self,
        page_id: PageId,
        component_id: u8,
        action: TouchAction,
        out: &mut dyn Outbound,
    ) -> bool {
        let believed = self.current_id();
        if page_id != believed {
            debug!("touch for page {} while on page {}", page_id, believed);
            out.record(Diagnostic::TouchResync {
                reported: page_id,
                believed,
            });

            if !self.switch_to(page_id, out) || self.current_id() != page_id {
                out.record(Diagnostic::TouchDropped {
                    page_id,
                    component_id,
                });
                return false;
            }
        }

        self.with_active(out, |page, link| page.on_touch(component_id, action, link))
    }

    /// Run `f` against the active page
    ///
    /// Returns `false` when no page is active.
    pub fn with_active<F>(&mut self, out: &mut dyn Outbound, f: F) -> bool
    where
        F: FnOnce(&mut dyn Page, &mut PageLink<'_>),
    {
        let slot = self.registry.slot_mut(self.current);
        if !slot.state.active {
            return false;
        }
        invoke(slot, out, f);
        true
    }

    /// Run `f` against any registered page, active or not
    pub fn with_page<F>(&mut self, page_id: PageId, out: &mut dyn Outbound, f: F) -> bool
    where
        F: FnOnce(&mut dyn Page, &mut PageLink<'_>),
    {
        match self.registry.position(page_id) {
            Some(index) => {
                invoke(self.registry.slot_mut(index), out, f);
                true
            }
            None => false,
        }
    }

    fn activate(&mut self, target: usize, out: &mut dyn Outbound) {
        let from = self.current_id();

        if target != self.current {
            let previous = self.registry.slot_mut(self.current);
            if previous.state.active {
                invoke(previous, out, |page, link| page.on_leave(link));
                previous.state.active = false;
            }
        }

        self.current = target;
        let slot = self.registry.slot_mut(target);
        slot.state.active = true;
        invoke(slot, out, |page, link| page.on_enter(link));

        // Init runs after the first enter, never before
        if !slot.state.initialized {
            invoke(slot, out, |page, link| page.begin_once(link));
            slot.state.initialized = true;
        }

        let to = slot.page.id();
        debug!("page {} -> {}", from, to);
        out.record(Diagnostic::PageSwitched { from, to });
    }
}

fn invoke<F>(slot: &mut PageSlot<'_>, out: &mut dyn Outbound, f: F)
where
    F: FnOnce(&mut dyn Page, &mut PageLink<'_>),
{
    let mut link = PageLink::new(
        out,
        slot.page.id(),
        slot.state.active,
        slot.state.initialized,
    );
    f(&mut *slot.page, &mut link);
}
