//! Logging backend selection
//!
//! `log` or `defmt` when the matching feature is enabled, otherwise the
//! macros only type-check their arguments. Declared first in `lib.rs` with
//! `#[macro_use]` so every module sees the macros by textual scope.

#![allow(unused_macros)]

cfg_if::cfg_if! {
    if #[cfg(feature = "log")] {
        macro_rules! trace {
            ($($arg:tt)*) => { ::log::trace!($($arg)*) };
        }
        macro_rules! debug {
            ($($arg:tt)*) => { ::log::debug!($($arg)*) };
        }
        macro_rules! info {
            ($($arg:tt)*) => { ::log::info!($($arg)*) };
        }
        macro_rules! warn {
            ($($arg:tt)*) => { ::log::warn!($($arg)*) };
        }
    } else if #[cfg(feature = "defmt")] {
        macro_rules! trace {
            ($($arg:tt)*) => { ::defmt::trace!($($arg)*) };
        }
        macro_rules! debug {
            ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
        }
        macro_rules! info {
            ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
        }
        macro_rules! warn {
            ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
        }
    } else {
        macro_rules! trace {
            ($($arg:tt)*) => {{ let _ = ::core::format_args!($($arg)*); }};
        }
        macro_rules! debug {
            ($($arg:tt)*) => {{ let _ = ::core::format_args!($($arg)*); }};
        }
        macro_rules! info {
            ($($arg:tt)*) => {{ let _ = ::core::format_args!($($arg)*); }};
        }
        macro_rules! warn {
            ($($arg:tt)*) => {{ let _ = ::core::format_args!($($arg)*); }};
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_usable_in_any_position() {
        let msg_type = 0x42u8;
        let discarded = 3usize;
        trace!("ignoring message type {:x}", msg_type);
        debug!("partial frame of {} bytes went stale", discarded);
        info!("display link starting");
        match discarded {
            0 => warn!("nothing dropped"),
            _ => warn!("dropped {} bytes", discarded),
        }
    }
}
