//! Shared test doubles

use core::any::Any;
use core::cell::RefCell;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use hmilink_protocol::{CommandError, TextPayload, TouchAction, TouchCoordinate};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::traits::{Outbound, Page, PageId, PageLink};

/// Outbound that keeps everything
#[derive(Debug, Default)]
pub struct FakeOutbound {
    pub sent: Vec<Vec<u8>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Outbound for FakeOutbound {
    fn send(&mut self, instruction: &[u8]) {
        self.sent.push(instruction.to_vec());
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Sink that keeps everything
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub seen: Vec<Diagnostic>,
}

impl DiagnosticSink for RecordingSink {
    fn record(&mut self, diagnostic: Diagnostic) {
        self.seen.push(diagnostic);
    }
}

/// Hook invocation as seen by a [`RecordingPage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Begin(PageId),
    Enter(PageId),
    Leave(PageId),
    Refresh(PageId, u32),
    Touch(PageId, u8, TouchAction),
    TouchXY(PageId, TouchCoordinate),
    Text(PageId, String),
    Numeric(PageId, u32),
    Ack(PageId, u8),
    Error(PageId, CommandError),
    Sleep(PageId, bool),
    External(PageId, u8, Option<u32>),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Page appending every hook call to a shared log
pub struct RecordingPage {
    id: PageId,
    log: CallLog,
    /// Instruction attempted on every refresh
    pub refresh_command: Option<&'static str>,
    /// Instruction attempted on every external update
    pub update_command: Option<&'static str>,
}

impl RecordingPage {
    pub fn new(id: PageId, log: &CallLog) -> Self {
        Self {
            id,
            log: Rc::clone(log),
            refresh_command: None,
            update_command: None,
        }
    }

    fn push(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl Page for RecordingPage {
    fn id(&self) -> PageId {
        self.id
    }

    fn begin_once(&mut self, _link: &mut PageLink<'_>) {
        self.push(Call::Begin(self.id));
    }

    fn on_enter(&mut self, _link: &mut PageLink<'_>) {
        self.push(Call::Enter(self.id));
    }

    fn on_leave(&mut self, _link: &mut PageLink<'_>) {
        self.push(Call::Leave(self.id));
    }

    fn refresh(&mut self, now_ms: u32, link: &mut PageLink<'_>) {
        self.push(Call::Refresh(self.id, now_ms));
        if let Some(command) = self.refresh_command {
            link.send_command(command);
        }
    }

    fn on_touch(&mut self, component_id: u8, action: TouchAction, _link: &mut PageLink<'_>) {
        self.push(Call::Touch(self.id, component_id, action));
    }

    fn on_touch_coordinate(&mut self, touch: TouchCoordinate, _link: &mut PageLink<'_>) {
        self.push(Call::TouchXY(self.id, touch));
    }

    fn on_text(&mut self, text: TextPayload<'_>, _link: &mut PageLink<'_>) {
        self.push(Call::Text(self.id, text.chars().collect()));
    }

    fn on_numeric(&mut self, value: u32, _link: &mut PageLink<'_>) {
        self.push(Call::Numeric(self.id, value));
    }

    fn on_command_ack(&mut self, code: u8, _link: &mut PageLink<'_>) {
        self.push(Call::Ack(self.id, code));
    }

    fn on_command_error(&mut self, error: CommandError, _link: &mut PageLink<'_>) {
        self.push(Call::Error(self.id, error));
    }

    fn on_sleep_change(&mut self, entering: bool, _link: &mut PageLink<'_>) {
        self.push(Call::Sleep(self.id, entering));
    }

    fn on_external_update(
        &mut self,
        update_type: u8,
        payload: Option<&dyn Any>,
        link: &mut PageLink<'_>,
    ) {
        let value = payload.and_then(|p| p.downcast_ref::<u32>()).copied();
        self.push(Call::External(self.id, update_type, value));
        if let Some(command) = self.update_command {
            link.send_command(command);
        }
    }
}
