//! Leveled kernel logging
//!
//! Each record is a colored level tag followed by a printk template:
//!
//! ```text
//! [ERROR] ...   red
//! [WARN]  ...   yellow
//! [INFO]  ...
//! [DEBUG] ...   cyan, only with the `debug-log` feature
//! ```
//!
//! Use the [`kerror!`], [`kwarn!`], [`kinfo!`] and [`kdebug!`] macros; they
//! take the same template and arguments as [`printk!`].

use core::sync::atomic::{AtomicU8, Ordering};

use crate::printk::{format_checked, Arg, ByteSink, FormatError};

/// Whether `kdebug!` produces anything at all
pub const DEBUG_ENABLED: bool = cfg!(feature = "debug-log");

/// Record severity, most severe first
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    /// Tag printed before the record, padded so bodies line up
    pub const fn prefix(self) -> &'static [u8] {
        match self {
            Level::Error => b"\x1b[31m[ERROR]\x1b[0m ",
            Level::Warn => b"\x1b[33m[WARN]\x1b[0m  ",
            Level::Info => b"[INFO]  ",
            Level::Debug => b"\x1b[36m[DEBUG]\x1b[0m ",
        }
    }

    fn from_u8(raw: u8) -> Level {
        match raw {
            1 => Level::Error,
            2 => Level::Warn,
            3 => Level::Info,
            _ => Level::Debug,
        }
    }
}

static MAX_LEVEL: AtomicU8 = AtomicU8::new(if DEBUG_ENABLED {
    Level::Debug as u8
} else {
    Level::Info as u8
});

/// Least severe level still printed
pub fn max_level() -> Level {
    Level::from_u8(MAX_LEVEL.load(Ordering::Relaxed))
}

/// Change the least severe level still printed
pub fn set_max_level(level: Level) {
    MAX_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Would a record at `level` be printed right now
pub fn enabled(level: Level) -> bool {
    if level == Level::Debug && !DEBUG_ENABLED {
        return false;
    }
    level <= max_level()
}

/// Write one record (tag + formatted body) to `sink`
pub fn write_record<S: ByteSink + ?Sized>(
    sink: &mut S,
    level: Level,
    template: &[u8],
    args: &[Arg<'_>],
) -> Result<(), FormatError> {
    sink.write_bytes(level.prefix());
    format_checked(sink, template, args)
}

#[macro_export]
macro_rules! kerror {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::console::log(
            $crate::log::Level::Error,
            ::core::convert::AsRef::<[u8]>::as_ref($fmt),
            &[$($crate::printk::Arg::from($arg)),*],
        )
    };
}

#[macro_export]
macro_rules! kwarn {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::console::log(
            $crate::log::Level::Warn,
            ::core::convert::AsRef::<[u8]>::as_ref($fmt),
            &[$($crate::printk::Arg::from($arg)),*],
        )
    };
}

#[macro_export]
macro_rules! kinfo {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::console::log(
            $crate::log::Level::Info,
            ::core::convert::AsRef::<[u8]>::as_ref($fmt),
            &[$($crate::printk::Arg::from($arg)),*],
        )
    };
}

/// Debug record; arguments are not evaluated without `debug-log`
#[macro_export]
macro_rules! kdebug {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        if $crate::log::DEBUG_ENABLED {
            $crate::console::log(
                $crate::log::Level::Debug,
                ::core::convert::AsRef::<[u8]>::as_ref($fmt),
                &[$($crate::printk::Arg::from($arg)),*],
            )
        }
    };
}
