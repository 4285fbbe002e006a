//! Kernel console
//!
//! One global console, serialized by a spin lock, is the only way kernel code
//! reaches the UART. The printk engine itself holds no lock and no state; the
//! lock lives here, at the boundary, so concurrent callers never interleave
//! bytes within a single record.
//!
//! On `aarch64-unknown-none` the console drives the PL011. Everywhere else
//! (unit tests, the host preview binary) it records into a fixed buffer that
//! [`drain`] hands back.

use spin::Mutex;

use crate::log::{self, Level};
use crate::printk::{format_checked, Arg, ByteSink, FormatError};

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
use crate::drivers::{Pl011, UART0_BASE};

#[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
use crate::printk::CaptureSink;

/// Bytes the host console keeps before dropping output
#[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
pub const CAPTURE_BYTES: usize = 4096;

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
type Backend = Pl011;

#[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
type Backend = CaptureSink<CAPTURE_BYTES>;

/// Console writer
pub struct Console {
    backend: Backend,
}

impl Console {
    const fn new() -> Self {
        Console {
            #[cfg(all(target_arch = "aarch64", target_os = "none"))]
            // SAFETY: the console is the only user of UART0.
            backend: unsafe { Pl011::new(UART0_BASE) },
            #[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
            backend: CaptureSink::new(),
        }
    }
}

impl ByteSink for Console {
    fn write_byte(&mut self, byte: u8) {
        self.backend.write_byte(byte);
    }
}

/// Global console instance
static CONSOLE: Mutex<Console> = Mutex::new(Console::new());

/// Initialize the console subsystem
pub fn init() {
    #[cfg(all(target_arch = "aarch64", target_os = "none"))]
    CONSOLE.lock().backend.init();

    #[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
    CONSOLE.lock().backend.clear();
}

/// Format `template` with `args` onto the console
pub fn printk(template: &[u8], args: &[Arg<'_>]) {
    let outcome = format_checked(&mut *CONSOLE.lock(), template, args);
    settle(outcome);
}

/// Print one log record if `level` is enabled
pub fn log(level: Level, template: &[u8], args: &[Arg<'_>]) {
    if !log::enabled(level) {
        return;
    }
    let outcome = log::write_record(&mut *CONSOLE.lock(), level, template, args);
    settle(outcome);
}

/// Hex dump a slice onto the console, labelled with its real addresses
pub fn dump_slice(bytes: &[u8]) {
    crate::hexdump::dump_bytes(&mut *CONSOLE.lock(), bytes.as_ptr() as usize, bytes);
}

/// Hex dump live memory onto the console
///
/// # Safety
/// `addr..addr + len` must be readable for the duration of the call.
pub unsafe fn dump_memory(addr: *const u8, len: usize) {
    crate::hexdump::dump_memory(&mut *CONSOLE.lock(), addr, len);
}

/// Hand captured output to `f`, then forget it
#[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
pub fn drain<F: FnOnce(&[u8])>(f: F) {
    let mut console = CONSOLE.lock();
    f(console.backend.as_bytes());
    console.backend.clear();
}

/// Decide what a misused template costs, after the lock is released
fn settle(outcome: Result<(), FormatError>) {
    if let Err(e) = outcome {
        if cfg!(feature = "strict-format") {
            panic!("printk: {}", e);
        }
    }
}

/// Formatted print to the console
///
/// ```ignore
/// printk!("var=%d, addr=0x%lx\n", 42, 0x4008_0000usize);
/// ```
#[macro_export]
macro_rules! printk {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::console::printk(
            ::core::convert::AsRef::<[u8]>::as_ref($fmt),
            &[$($crate::printk::Arg::from($arg)),*],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured() -> std::vec::Vec<u8> {
        let mut out = std::vec::Vec::new();
        drain(|bytes| out.extend_from_slice(bytes));
        out
    }

    #[test]
    fn test_printk_macro_reaches_console() {
        let _serial = crate::test_support::SERIAL.lock();
        init();

        crate::printk!("var=%d, addr=0x%x\n", 42, 0xdead_beef_u32);
        crate::printk!(b"%s|%c\n", "raw", b'!');
        assert_eq!(captured(), b"var=42, addr=0xdeadbeef\nraw|!\n");
        assert!(captured().is_empty());
    }

    #[test]
    fn test_log_macros_tag_records() {
        let _serial = crate::test_support::SERIAL.lock();
        init();
        let saved = log::max_level();
        log::set_max_level(Level::Debug);

        crate::kinfo!("Kernel initialized successfully!\n");
        crate::kwarn!("This is a warning message.\n");
        crate::kerror!("This is an error message!\n");
        crate::kdebug!("Debugging information: var=%d\n", 42);

        let mut expected = std::vec::Vec::new();
        expected.extend_from_slice(b"[INFO]  Kernel initialized successfully!\n");
        expected.extend_from_slice(b"\x1b[33m[WARN]\x1b[0m  This is a warning message.\n");
        expected.extend_from_slice(b"\x1b[31m[ERROR]\x1b[0m This is an error message!\n");
        if log::DEBUG_ENABLED {
            expected.extend_from_slice(b"\x1b[36m[DEBUG]\x1b[0m Debugging information: var=42\n");
        }
        assert_eq!(captured(), expected);

        log::set_max_level(saved);
    }

    #[test]
    fn test_filtered_levels_print_nothing() {
        let _serial = crate::test_support::SERIAL.lock();
        init();
        let saved = log::max_level();
        log::set_max_level(Level::Error);

        crate::kinfo!("hidden %d\n", 1);
        crate::kwarn!("hidden\n");
        crate::kerror!("shown\n");
        assert_eq!(captured(), b"\x1b[31m[ERROR]\x1b[0m shown\n");

        log::set_max_level(saved);
    }

    #[test]
    fn test_disabled_debug_skips_arguments() {
        let _serial = crate::test_support::SERIAL.lock();
        init();

        let mut evaluated = false;
        crate::kdebug!("%d\n", {
            evaluated = true;
            1
        });
        assert_eq!(evaluated, log::DEBUG_ENABLED);
        let _ = captured();
    }

    #[cfg(not(feature = "strict-format"))]
    #[test]
    fn test_misuse_degrades_quietly() {
        let _serial = crate::test_support::SERIAL.lock();
        init();

        crate::printk!("[%d][%q]%", "text");
        assert_eq!(captured(), b"[][]");
    }

    #[cfg(feature = "strict-format")]
    #[test]
    #[should_panic(expected = "printk")]
    fn test_strict_format_panics_on_misuse() {
        let _serial = crate::test_support::SERIAL.lock();
        init();

        crate::printk!("[%q]");
    }

    #[cfg(feature = "strict-format")]
    #[test]
    fn test_strict_format_releases_lock_before_panic() {
        let _serial = crate::test_support::SERIAL.lock();
        init();

        let outcome = std::panic::catch_unwind(|| crate::printk!("%d\n"));
        assert!(outcome.is_err());
        assert!(CONSOLE.try_lock().is_some());

        crate::printk!("after %d\n", 1);
        // The newline of the failed record still went out
        assert_eq!(captured(), b"\nafter 1\n");
    }

    #[test]
    fn test_dump_slice_uses_real_address() {
        let _serial = crate::test_support::SERIAL.lock();
        init();

        #[repr(align(16))]
        struct Aligned([u8; 4]);
        let data = Aligned(*b"virt");
        dump_slice(&data.0);
        let out = captured();
        let text = std::str::from_utf8(&out).unwrap();
        let row = data.0.as_ptr() as usize;
        assert!(text.starts_with(&std::format!("0x{:x}:    ", row)));
        assert!(text.contains("76 69 72 74"));
        assert!(text.ends_with("\n"));
    }
}
