//! Tagged argument list
//!
//! C varargs carry no type information; printk callers here pass an ordered
//! slice of [`Arg`] values instead. Each variant remembers the storage width
//! the caller used so directives can reinterpret it the way C promotion would.

use core::ffi::CStr;

use super::error::FormatError;

/// One printk argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    /// `int`-sized signed value
    Int(i32),
    /// `long`-sized signed value
    Long(i64),
    /// `unsigned int`-sized value (also characters)
    UInt(u32),
    /// `unsigned long`-sized value
    ULong(u64),
    /// Raw pointer value
    Ptr(usize),
    /// Byte string; `None` is a null string pointer
    Str(Option<&'a [u8]>),
}

impl<'a> Arg<'a> {
    /// The raw bit pattern of an integer-class argument, widened to 64 bits
    ///
    /// Signed sources are sign-extended. Strings are not integers.
    pub fn bits(&self) -> Option<u64> {
        match *self {
            Arg::Int(v) => Some(v as i64 as u64),
            Arg::Long(v) => Some(v as u64),
            Arg::UInt(v) => Some(v as u64),
            Arg::ULong(v) => Some(v),
            Arg::Ptr(v) => Some(v as u64),
            Arg::Str(_) => None,
        }
    }
}

macro_rules! arg_from {
    ($variant:ident($target:ty): $($source:ty),+) => {
        $(
            impl<'a> From<$source> for Arg<'a> {
                fn from(value: $source) -> Self {
                    Arg::$variant(value as $target)
                }
            }
        )+
    };
}

arg_from!(Int(i32): i8, i16, i32);
arg_from!(Long(i64): i64, isize);
arg_from!(UInt(u32): u8, u16, u32, char);
arg_from!(ULong(u64): u64, usize);

impl<'a, T: ?Sized> From<*const T> for Arg<'a> {
    fn from(ptr: *const T) -> Self {
        Arg::Ptr(ptr.cast::<u8>() as usize)
    }
}

impl<'a, T: ?Sized> From<*mut T> for Arg<'a> {
    fn from(ptr: *mut T) -> Self {
        Arg::Ptr(ptr.cast::<u8>() as usize)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Arg::Str(Some(s.as_bytes()))
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(s: &'a [u8]) -> Self {
        Arg::Str(Some(s))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Arg<'a> {
    fn from(s: &'a [u8; N]) -> Self {
        Arg::Str(Some(s))
    }
}

impl<'a> From<&'a CStr> for Arg<'a> {
    fn from(s: &'a CStr) -> Self {
        Arg::Str(Some(s.to_bytes()))
    }
}

impl<'a> From<Option<&'a str>> for Arg<'a> {
    fn from(s: Option<&'a str>) -> Self {
        Arg::Str(s.map(str::as_bytes))
    }
}

impl<'a> From<Option<&'a [u8]>> for Arg<'a> {
    fn from(s: Option<&'a [u8]>) -> Self {
        Arg::Str(s)
    }
}

/// Consumes arguments left to right
pub(crate) struct ArgCursor<'s, 'a> {
    args: &'s [Arg<'a>],
    next: usize,
}

impl<'s, 'a> ArgCursor<'s, 'a> {
    pub(crate) fn new(args: &'s [Arg<'a>]) -> Self {
        Self { args, next: 0 }
    }

    /// Take the next argument for the directive starting at `offset`
    pub(crate) fn take(&mut self, offset: usize) -> Result<(usize, Arg<'a>), FormatError> {
        let index = self.next;
        let arg = *self
            .args
            .get(index)
            .ok_or(FormatError::MissingArgument { offset })?;
        self.next += 1;
        Ok((index, arg))
    }

    pub(crate) fn remaining(&self) -> usize {
        self.args.len() - self.next
    }
}
