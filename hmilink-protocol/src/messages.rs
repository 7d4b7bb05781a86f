//! Message types for the display protocol
//!
//! Message types are divided into two categories:
//! - Display → host: responses and events, decoded with
//!   [`DisplayEvent::from_frame`]
//! - Host → display: ASCII instructions, see [`HostCommand`]

use core::fmt::Write as _;

use heapless::{String, Vec};

use crate::events::{CommandError, TextPayload, TouchAction, TouchCoordinate};
use crate::frame::{Frame, DEFAULT_RX_CAPACITY, TERMINATOR};

// Message type IDs: Display → host
pub const MSG_SUCCESS: u8 = 0x01;
pub const MSG_TOUCH: u8 = 0x65;
pub const MSG_PAGE_CHANGE: u8 = 0x66;
pub const MSG_TOUCH_XY_AWAKE: u8 = 0x67;
pub const MSG_TOUCH_XY_ASLEEP: u8 = 0x68;
pub const MSG_TEXT: u8 = 0x70;
pub const MSG_NUMERIC: u8 = 0x71;
pub const MSG_SLEEP_ENTER: u8 = 0x86;
pub const MSG_SLEEP_EXIT: u8 = 0x87;

// Minimum frame lengths, type byte included
const TOUCH_LEN: usize = 4;
const PAGE_CHANGE_LEN: usize = 2;
const TOUCH_XY_LEN: usize = 6;
const NUMERIC_LEN: usize = 5;

/// Maximum encoded host command, terminator included
pub const MAX_COMMAND_LEN: usize = 64;

/// Encoded message does not fit its buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageTooLong;

/// Events parsed from display-originated frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayEvent<'a> {
    /// Last instruction executed (0x01)
    CommandSuccess,
    /// Last instruction failed
    CommandError(CommandError),
    /// Component touched (0x65)
    Touch {
        page_id: u8,
        component_id: u8,
        action: TouchAction,
    },
    /// Display is now showing `page_id` (0x66)
    PageChange { page_id: u8 },
    /// Raw touch position (0x67 / 0x68)
    TouchCoordinate(TouchCoordinate),
    /// String return (0x70)
    Text(TextPayload<'a>),
    /// Numeric return (0x71)
    Numeric(u32),
    /// Auto-sleep entered (0x86) or left (0x87)
    SleepChange { entering: bool },
    /// Type byte this decoder does not know
    Unknown { msg_type: u8 },
}

impl<'a> DisplayEvent<'a> {
    /// Decode a frame
    ///
    /// Returns `None` for frames shorter than their type requires. Bytes
    /// beyond the fixed fields are ignored.
    pub fn from_frame(frame: &Frame<'a>) -> Option<Self> {
        let data = frame.bytes();
        let msg_type = frame.msg_type()?;

        if let Some(error) = CommandError::from_code(msg_type) {
            return Some(DisplayEvent::CommandError(error));
        }

        let event = match msg_type {
            MSG_SUCCESS => DisplayEvent::CommandSuccess,
            MSG_TOUCH => {
                if data.len() < TOUCH_LEN {
                    return None;
                }
                DisplayEvent::Touch {
                    page_id: data[1],
                    component_id: data[2],
                    action: TouchAction::from_byte(data[3]),
                }
            }
            MSG_PAGE_CHANGE => {
                if data.len() < PAGE_CHANGE_LEN {
                    return None;
                }
                DisplayEvent::PageChange { page_id: data[1] }
            }
            MSG_TOUCH_XY_AWAKE | MSG_TOUCH_XY_ASLEEP => {
                if data.len() < TOUCH_XY_LEN {
                    return None;
                }
                DisplayEvent::TouchCoordinate(TouchCoordinate {
                    x: u16::from_be_bytes([data[1], data[2]]),
                    y: u16::from_be_bytes([data[3], data[4]]),
                    action: TouchAction::from_byte(data[5]),
                    asleep: msg_type == MSG_TOUCH_XY_ASLEEP,
                })
            }
            MSG_TEXT => DisplayEvent::Text(TextPayload::new(frame.payload())),
            MSG_NUMERIC => {
                if data.len() < NUMERIC_LEN {
                    return None;
                }
                DisplayEvent::Numeric(u32::from_le_bytes([data[1], data[2], data[3], data[4]]))
            }
            MSG_SLEEP_ENTER | MSG_SLEEP_EXIT => DisplayEvent::SleepChange {
                entering: msg_type == MSG_SLEEP_ENTER,
            },
            other => DisplayEvent::Unknown { msg_type: other },
        };

        Some(event)
    }

    /// Encode this event as the display would send it (for testing or simulation)
    pub fn encode(&self) -> Result<Vec<u8, DEFAULT_RX_CAPACITY>, MessageTooLong> {
        let mut out = Vec::<u8, DEFAULT_RX_CAPACITY>::new();
        match self {
            DisplayEvent::CommandSuccess => push(&mut out, &[MSG_SUCCESS])?,
            DisplayEvent::CommandError(error) => push(&mut out, &[error.code()])?,
            DisplayEvent::Touch {
                page_id,
                component_id,
                action,
            } => push(&mut out, &[MSG_TOUCH, *page_id, *component_id, action.to_byte()])?,
            DisplayEvent::PageChange { page_id } => push(&mut out, &[MSG_PAGE_CHANGE, *page_id])?,
            DisplayEvent::TouchCoordinate(touch) => {
                let msg_type = if touch.asleep {
                    MSG_TOUCH_XY_ASLEEP
                } else {
                    MSG_TOUCH_XY_AWAKE
                };
                let [x_hi, x_lo] = touch.x.to_be_bytes();
                let [y_hi, y_lo] = touch.y.to_be_bytes();
                push(
                    &mut out,
                    &[msg_type, x_hi, x_lo, y_hi, y_lo, touch.action.to_byte()],
                )?
            }
            DisplayEvent::Text(text) => {
                push(&mut out, &[MSG_TEXT])?;
                push(&mut out, text.as_bytes())?
            }
            DisplayEvent::Numeric(value) => {
                push(&mut out, &[MSG_NUMERIC])?;
                push(&mut out, &value.to_le_bytes())?
            }
            DisplayEvent::SleepChange { entering } => {
                let msg_type = if *entering {
                    MSG_SLEEP_ENTER
                } else {
                    MSG_SLEEP_EXIT
                };
                push(&mut out, &[msg_type])?
            }
            DisplayEvent::Unknown { msg_type } => push(&mut out, &[*msg_type])?,
        }
        push(&mut out, &TERMINATOR)?;
        Ok(out)
    }
}

fn push<const N: usize>(out: &mut Vec<u8, N>, bytes: &[u8]) -> Result<(), MessageTooLong> {
    out.extend_from_slice(bytes).map_err(|_| MessageTooLong)
}

/// Instructions the controller itself sends to the display
///
/// Component updates (`t0.txt="..."` and friends) are built by the
/// application and sent as raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand {
    /// Ask the display to report its current page (`sendme`)
    SendMe,
    /// Show another page (`page <id>`)
    Page(u8),
}

impl HostCommand {
    /// Instruction text without the terminator
    pub fn instruction(&self) -> Result<String<MAX_COMMAND_LEN>, MessageTooLong> {
        let mut text = String::new();
        match self {
            HostCommand::SendMe => text.push_str("sendme").map_err(|_| MessageTooLong)?,
            HostCommand::Page(id) => write!(text, "page {}", id).map_err(|_| MessageTooLong)?,
        }
        Ok(text)
    }

    /// Encode the instruction followed by the terminator
    pub fn encode(&self) -> Result<Vec<u8, MAX_COMMAND_LEN>, MessageTooLong> {
        let text = self.instruction()?;
        let mut out = Vec::new();
        push(&mut out, text.as_bytes())?;
        push(&mut out, &TERMINATOR)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Option<DisplayEvent<'_>> {
        DisplayEvent::from_frame(&Frame::new(bytes))
    }

    #[test]
    fn test_command_responses() {
        assert_eq!(decode(&[0x01]), Some(DisplayEvent::CommandSuccess));
        assert_eq!(
            decode(&[0x1A]),
            Some(DisplayEvent::CommandError(CommandError::InvalidVariable))
        );
        assert_eq!(
            decode(&[0x00]),
            Some(DisplayEvent::CommandError(CommandError::InvalidInstruction))
        );
    }

    #[test]
    fn test_touch_event() {
        assert_eq!(
            decode(&[0x65, 0x01, 0x02, 0x01]),
            Some(DisplayEvent::Touch {
                page_id: 1,
                component_id: 2,
                action: TouchAction::Press,
            })
        );
        // Undersized frame is dropped
        assert_eq!(decode(&[0x65, 0x01, 0x02]), None);
    }

    #[test]
    fn test_page_change() {
        assert_eq!(
            decode(&[0x66, 0x03]),
            Some(DisplayEvent::PageChange { page_id: 3 })
        );
        assert_eq!(decode(&[0x66]), None);
    }

    #[test]
    fn test_touch_coordinate_big_endian() {
        assert_eq!(
            decode(&[0x67, 0x01, 0x2C, 0x00, 0xF0, 0x01]),
            Some(DisplayEvent::TouchCoordinate(TouchCoordinate {
                x: 300,
                y: 240,
                action: TouchAction::Press,
                asleep: false,
            }))
        );

        match decode(&[0x68, 0x00, 0x05, 0x00, 0x06, 0x00]) {
            Some(DisplayEvent::TouchCoordinate(touch)) => {
                assert!(touch.asleep);
                assert_eq!(touch.action, TouchAction::Release);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(decode(&[0x67, 0x01, 0x2C, 0x00, 0xF0]), None);
    }

    #[test]
    fn test_text_return() {
        match decode(&[0x70, b'H', b'i']) {
            Some(DisplayEvent::Text(text)) => assert_eq!(text.as_str(), Some("Hi")),
            other => panic!("unexpected {:?}", other),
        }
        match decode(&[0x70]) {
            Some(DisplayEvent::Text(text)) => assert!(text.is_empty()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_numeric_little_endian() {
        assert_eq!(
            decode(&[0x71, 0x2A, 0x00, 0x00, 0x00]),
            Some(DisplayEvent::Numeric(42))
        );
        assert_eq!(
            decode(&[0x71, 0x78, 0x56, 0x34, 0x12, 0xAA]),
            Some(DisplayEvent::Numeric(0x1234_5678))
        );
        assert_eq!(decode(&[0x71, 0x2A, 0x00, 0x00]), None);
    }

    #[test]
    fn test_sleep_change() {
        assert_eq!(
            decode(&[0x86]),
            Some(DisplayEvent::SleepChange { entering: true })
        );
        assert_eq!(
            decode(&[0x87]),
            Some(DisplayEvent::SleepChange { entering: false })
        );
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(
            decode(&[0x24, 0x00]),
            Some(DisplayEvent::Unknown { msg_type: 0x24 })
        );
        assert_eq!(decode(&[]), None);
    }

    #[test]
    fn test_event_encode_matches_wire() {
        let touch = DisplayEvent::Touch {
            page_id: 1,
            component_id: 2,
            action: TouchAction::Press,
        };
        assert_eq!(
            touch.encode().unwrap().as_slice(),
            &[0x65, 0x01, 0x02, 0x01, 0xFF, 0xFF, 0xFF]
        );

        let numeric = DisplayEvent::Numeric(42).encode().unwrap();
        let decoded = decode(&numeric[..numeric.len() - TERMINATOR.len()]);
        assert_eq!(decoded, Some(DisplayEvent::Numeric(42)));
    }

    #[test]
    fn test_host_commands() {
        assert_eq!(
            HostCommand::SendMe.encode().unwrap().as_slice(),
            b"sendme\xFF\xFF\xFF"
        );
        assert_eq!(
            HostCommand::Page(12).encode().unwrap().as_slice(),
            b"page 12\xFF\xFF\xFF"
        );
    }
}
