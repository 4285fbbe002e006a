//! printk: formatted output over a byte sink
//!
//! The engine scans a template left to right. Literal bytes go straight to
//! the sink; each `%` directive is parsed into a [`Directive`], consumes its
//! argument(s) from an ordered [`Arg`] slice and is converted to text.
//! Nothing is buffered: every output byte reaches the sink the moment it is
//! produced, and no state survives between calls.
//!
//! ## Degradation
//!
//! Malformed input never faults. Unknown conversions print nothing and
//! consume nothing, a truncated directive ends the template, a missing or
//! ill-typed argument leaves its directive empty. [`format_checked`] reports
//! the first such misuse; [`format_and_emit`] drops the report.

pub mod args;
pub mod directive;
pub mod error;
pub mod num;
pub mod sink;

pub use args::Arg;
pub use directive::{Conversion, Directive, Length};
pub use error::FormatError;
pub use sink::{ByteSink, CaptureSink, SinkWriter};

use args::ArgCursor;

/// Format `template` with `args` into `sink`, ignoring misuse
pub fn format_and_emit<S: ByteSink + ?Sized>(sink: &mut S, template: &[u8], args: &[Arg<'_>]) {
    let _ = format_checked(sink, template, args);
}

/// Format `template` with `args` into `sink`
///
/// Output is byte-for-byte what [`format_and_emit`] produces. The result is
/// the first misuse detected, if any.
pub fn format_checked<S: ByteSink + ?Sized>(
    sink: &mut S,
    template: &[u8],
    args: &[Arg<'_>],
) -> Result<(), FormatError> {
    let mut cursor = ArgCursor::new(args);
    let mut first_error = None;
    let mut pos = 0;

    while let Some(&byte) = template.get(pos) {
        if byte == 0 {
            break;
        }
        if byte != b'%' {
            sink.write_byte(byte);
            pos += 1;
            continue;
        }

        match Directive::parse(&template[pos + 1..], pos) {
            Ok((directive, used)) => {
                if let Err(e) = convert(sink, &directive, &mut cursor, pos) {
                    first_error.get_or_insert(e);
                }
                pos += 1 + used;
            }
            Err(e) => {
                first_error.get_or_insert(e);
                break;
            }
        }
    }

    if first_error.is_none() && cursor.remaining() > 0 {
        first_error = Some(FormatError::ExtraArguments {
            unused: cursor.remaining(),
        });
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Dispatch one directive to its converter
fn convert<S: ByteSink + ?Sized>(
    sink: &mut S,
    directive: &Directive,
    cursor: &mut ArgCursor<'_, '_>,
    offset: usize,
) -> Result<(), FormatError> {
    match directive.conversion {
        Conversion::Percent => {
            sink.write_byte(b'%');
            Ok(())
        }
        Conversion::Unknown(byte) => Err(FormatError::UnknownConversion {
            offset,
            conversion: char::from(byte),
        }),
        Conversion::Char => {
            let (index, arg) = cursor.take(offset)?;
            let bits = arg.bits().ok_or(FormatError::ArgumentMismatch { offset, index })?;
            sink.write_byte(bits as u8);
            Ok(())
        }
        Conversion::Str => {
            let (index, arg) = cursor.take(offset)?;
            match arg {
                Arg::Str(Some(bytes)) => {
                    for &byte in bytes.iter().take_while(|&&b| b != 0) {
                        sink.write_byte(byte);
                    }
                }
                Arg::Str(None) | Arg::Ptr(0) => sink.write_bytes(b"(null)"),
                _ => return Err(FormatError::ArgumentMismatch { offset, index }),
            }
            Ok(())
        }
        Conversion::Signed => {
            let bits = integer(cursor, offset)?;
            let value = match directive.length {
                Length::Long => bits as i64,
                Length::Int | Length::Short => bits as u32 as i32 as i64,
            };
            num::emit_signed(sink, value, directive);
            Ok(())
        }
        Conversion::Unsigned => {
            let value = unsigned(integer(cursor, offset)?, directive.length);
            num::emit_unsigned(sink, value, directive);
            Ok(())
        }
        Conversion::LowerHex | Conversion::UpperHex => {
            let value = unsigned(integer(cursor, offset)?, directive.length);
            let uppercase = directive.conversion == Conversion::UpperHex;
            num::emit_hex(sink, value, uppercase, directive);
            Ok(())
        }
        Conversion::Pointer => {
            let (index, arg) = cursor.take(offset)?;
            let addr = match arg {
                Arg::Str(Some(bytes)) => bytes.as_ptr() as u64,
                Arg::Str(None) => 0,
                other => other
                    .bits()
                    .ok_or(FormatError::ArgumentMismatch { offset, index })?,
            };
            if addr == 0 {
                sink.write_bytes(b"(nil)");
            } else {
                let forced = Directive {
                    width: 16,
                    zero_pad: true,
                    ..*directive
                };
                sink.write_bytes(b"0x");
                num::emit_hex(sink, addr, false, &forced);
            }
            Ok(())
        }
    }
}

/// Next argument as a raw integer bit pattern
fn integer(cursor: &mut ArgCursor<'_, '_>, offset: usize) -> Result<u64, FormatError> {
    let (index, arg) = cursor.take(offset)?;
    arg.bits().ok_or(FormatError::ArgumentMismatch { offset, index })
}

fn unsigned(bits: u64, length: Length) -> u64 {
    match length {
        Length::Long => bits,
        Length::Int | Length::Short => bits as u32 as u64,
    }
}
