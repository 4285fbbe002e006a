//! Memory inspector
//!
//! Classic 16-bytes-per-row hex + ASCII dump. Rows start on 16-byte
//! boundaries; cells outside the requested range print as `..` and `.`.
//! Every row is produced through printk, there is no separate output path.

use crate::printk::{format_and_emit, Arg, ByteSink};

const ROW: usize = 16;

/// Dump `bytes` as though they were located at `base_addr`
pub fn dump_bytes<S: ByteSink + ?Sized>(sink: &mut S, base_addr: usize, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }

    // Inclusive, so a range ending at the top of memory keeps its last byte
    let last = base_addr.saturating_add(bytes.len() - 1);
    let byte_at = |addr: usize| -> Option<u8> {
        if addr < base_addr || addr > last {
            None
        } else {
            bytes.get(addr - base_addr).copied()
        }
    };

    let mut row = base_addr & !(ROW - 1);
    while row <= last {
        format_and_emit(sink, b"0x%lx:    ", &[Arg::from(row)]);

        for col in 0..ROW {
            match row.checked_add(col).and_then(byte_at) {
                Some(byte) => format_and_emit(sink, b"%02x ", &[Arg::from(byte)]),
                None => format_and_emit(sink, b".. ", &[]),
            }
        }

        format_and_emit(sink, b"   ", &[]);
        for col in 0..ROW {
            match row.checked_add(col).and_then(byte_at) {
                Some(byte @ 0x20..=0x7e) => format_and_emit(sink, b"%c", &[Arg::from(byte)]),
                _ => format_and_emit(sink, b".", &[]),
            }
        }
        format_and_emit(sink, b"\n", &[]);

        row = match row.checked_add(ROW) {
            Some(next) => next,
            None => break,
        };
    }
}

/// Dump `len` bytes of live memory starting at `addr`
///
/// # Safety
/// `addr..addr + len` must be readable for the duration of the call.
pub unsafe fn dump_memory<S: ByteSink + ?Sized>(sink: &mut S, addr: *const u8, len: usize) {
    if len == 0 || addr.is_null() {
        return;
    }
    let bytes = core::slice::from_raw_parts(addr, len);
    dump_bytes(sink, addr as usize, bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printk::CaptureSink;

    fn dump(base_addr: usize, bytes: &[u8]) -> std::string::String {
        let mut sink = CaptureSink::<2048>::new();
        dump_bytes(&mut sink, base_addr, bytes);
        std::string::String::from_utf8(sink.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_single_unaligned_byte() {
        let out = dump(0x1003, b"A");
        assert_eq!(
            out,
            "0x1000:    .. .. .. 41 .. .. .. .. .. .. .. .. .. .. .. ..    ...A............\n"
        );
    }

    #[test]
    fn test_full_aligned_row() {
        let bytes: [u8; 16] = *b"Hello, kernel!\n\x7f";
        let out = dump(0x4008_0000, &bytes);
        assert_eq!(
            out,
            "0x40080000:    48 65 6c 6c 6f 2c 20 6b 65 72 6e 65 6c 21 0a 7f    Hello, kernel!..\n"
        );
    }

    #[test]
    fn test_range_spanning_rows() {
        let bytes = [0u8, 1, 2, 3];
        let out = dump(0x1e, &bytes);
        let rows: std::vec::Vec<&str> = out.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("0x10:    .. .. .. .. .. .. .. .. .. .. .. .. .. .. 00 01 "));
        assert!(rows[0].ends_with("................"));
        assert!(rows[1].starts_with("0x20:    02 03 .. "));
    }

    #[test]
    fn test_exclusive_end_on_boundary() {
        let bytes = [0xaau8; 16];
        let out = dump(0x30, &bytes);
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("0x30:    aa aa"));
    }

    #[test]
    fn test_empty_range_prints_nothing() {
        assert_eq!(dump(0x1000, &[]), "");
    }

    #[test]
    fn test_top_of_address_space() {
        let out = dump(usize::MAX - 1, &[0x41]);
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("0xfffffffffffffff0:"));
    }

    #[test]
    fn test_range_ending_at_last_address() {
        let out = dump(usize::MAX - 15, &[0x41; 16]);
        assert_eq!(out.lines().count(), 1);
        assert_eq!(
            out,
            "0xfffffffffffffff0:    41 41 41 41 41 41 41 41 41 41 41 41 41 41 41 41    AAAAAAAAAAAAAAAA\n"
        );

        let out = dump(usize::MAX, &[0x7a]);
        assert_eq!(
            out,
            "0xfffffffffffffff0:    .. .. .. .. .. .. .. .. .. .. .. .. .. .. .. 7a    ...............z\n"
        );
    }

    #[test]
    fn test_live_memory() {
        #[repr(align(16))]
        struct Aligned([u8; 3]);
        let data = Aligned([0x5a; 3]);
        let mut sink = CaptureSink::<256>::new();
        unsafe { dump_memory(&mut sink, data.0.as_ptr(), data.0.len()) };
        let out = std::str::from_utf8(sink.as_bytes()).unwrap();
        assert!(out.contains("5a 5a 5a"));
        assert!(out.contains("ZZZ"));
    }
}
