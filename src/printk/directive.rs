//! Format directive descriptor and parser
//!
//! Grammar, after the introducing `%`:
//!
//! ```text
//! {flag}* {width}? {'.' precision}? {length}? conversion
//! flag       := '-' | '+' | ' ' | '#' | '0'
//! length     := 'l' | 'h'
//! conversion := '%' | 'c' | 's' | 'd' | 'u' | 'x' | 'X' | 'p'
//! ```

use super::error::FormatError;

/// Storage width selected by the length modifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Length {
    #[default]
    Int,
    Long,
    /// Parsed, but consumes an `int` exactly like [`Length::Int`]
    Short,
}

/// Conversion type of a directive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Conversion {
    #[default]
    Percent,
    Char,
    Str,
    Signed,
    Unsigned,
    LowerHex,
    UpperHex,
    Pointer,
    Unknown(u8),
}

impl Conversion {
    fn from_byte(byte: u8) -> Self {
        match byte {
            b'%' => Conversion::Percent,
            b'c' => Conversion::Char,
            b's' => Conversion::Str,
            b'd' => Conversion::Signed,
            b'u' => Conversion::Unsigned,
            b'x' => Conversion::LowerHex,
            b'X' => Conversion::UpperHex,
            b'p' => Conversion::Pointer,
            other => Conversion::Unknown(other),
        }
    }
}

/// One parsed `%...` directive
///
/// `left_align`, `show_sign`, `alternate` and `precision` are recorded but
/// have no effect on any conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directive {
    pub zero_pad: bool,
    pub left_align: bool,
    pub show_sign: bool,
    pub alternate: bool,
    pub width: usize,
    pub precision: Option<usize>,
    pub length: Length,
    pub conversion: Conversion,
}

impl Directive {
    /// Parse the directive whose body starts at `rest[0]`
    ///
    /// `rest` is the template immediately after `%`; `offset` is the position
    /// of that `%`, used only for diagnostics. Returns the directive and the
    /// number of body bytes consumed. A NUL byte ends the template.
    pub fn parse(rest: &[u8], offset: usize) -> Result<(Directive, usize), FormatError> {
        let at = |pos: usize| rest.get(pos).copied().filter(|&b| b != 0);
        let mut directive = Directive::default();
        let mut pos = 0;

        while let Some(flag) = at(pos) {
            match flag {
                b'-' => directive.left_align = true,
                b'+' => directive.show_sign = true,
                b' ' => {}
                b'#' => directive.alternate = true,
                b'0' => directive.zero_pad = true,
                _ => break,
            }
            pos += 1;
        }

        while let Some(digit @ b'0'..=b'9') = at(pos) {
            directive.width = accumulate(directive.width, digit);
            pos += 1;
        }

        if at(pos) == Some(b'.') {
            pos += 1;
            let mut precision = 0;
            while let Some(digit @ b'0'..=b'9') = at(pos) {
                precision = accumulate(precision, digit);
                pos += 1;
            }
            directive.precision = Some(precision);
        }

        match at(pos) {
            Some(b'l') => {
                directive.length = Length::Long;
                pos += 1;
            }
            Some(b'h') => {
                directive.length = Length::Short;
                pos += 1;
            }
            _ => {}
        }

        let conversion = at(pos).ok_or(FormatError::UnterminatedDirective { offset })?;
        directive.conversion = Conversion::from_byte(conversion);
        Ok((directive, pos + 1))
    }
}

fn accumulate(value: usize, digit: u8) -> usize {
    value
        .saturating_mul(10)
        .saturating_add(usize::from(digit - b'0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<(Directive, usize), FormatError> {
        Directive::parse(body.as_bytes(), 0)
    }

    #[test]
    fn test_plain_conversions() {
        for (body, conversion) in [
            ("%", Conversion::Percent),
            ("c", Conversion::Char),
            ("s", Conversion::Str),
            ("d", Conversion::Signed),
            ("u", Conversion::Unsigned),
            ("x", Conversion::LowerHex),
            ("X", Conversion::UpperHex),
            ("p", Conversion::Pointer),
        ] {
            let (directive, used) = parse(body).unwrap();
            assert_eq!(directive.conversion, conversion);
            assert_eq!(used, 1);
            assert_eq!(directive.width, 0);
            assert!(!directive.zero_pad);
        }
    }

    #[test]
    fn test_flags_width_precision_length() {
        let (directive, used) = parse("-+ #08.3lx tail").unwrap();
        assert!(directive.left_align);
        assert!(directive.show_sign);
        assert!(directive.alternate);
        assert!(directive.zero_pad);
        assert_eq!(directive.width, 8);
        assert_eq!(directive.precision, Some(3));
        assert_eq!(directive.length, Length::Long);
        assert_eq!(directive.conversion, Conversion::LowerHex);
        assert_eq!(used, 10);
    }

    #[test]
    fn test_duplicate_flags_are_harmless() {
        let (directive, _) = parse("0000-0-5d").unwrap();
        assert!(directive.zero_pad);
        assert!(directive.left_align);
        assert_eq!(directive.width, 5);
    }

    #[test]
    fn test_zero_is_a_flag_not_width() {
        let (directive, _) = parse("010u").unwrap();
        assert!(directive.zero_pad);
        assert_eq!(directive.width, 10);
    }

    #[test]
    fn test_empty_precision() {
        let (directive, _) = parse(".hd").unwrap();
        assert_eq!(directive.precision, Some(0));
        assert_eq!(directive.length, Length::Short);
    }

    #[test]
    fn test_huge_width_saturates() {
        let (directive, _) = parse("99999999999999999999999999d").unwrap();
        assert_eq!(directive.width, usize::MAX);
    }

    #[test]
    fn test_unknown_conversion_is_parsed() {
        let (directive, used) = parse("5q").unwrap();
        assert_eq!(directive.conversion, Conversion::Unknown(b'q'));
        assert_eq!(used, 2);
    }

    #[test]
    fn test_unterminated() {
        for body in ["", "08", "-", "5.", "l"] {
            assert_eq!(
                Directive::parse(body.as_bytes(), 3),
                Err(FormatError::UnterminatedDirective { offset: 3 })
            );
        }
        assert_eq!(
            Directive::parse(b"8\0d", 0),
            Err(FormatError::UnterminatedDirective { offset: 0 })
        );
    }
}
