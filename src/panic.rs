//! Panic reporting
//!
//! The report goes straight to a fresh UART handle and never takes the
//! console lock: a panic raised while the console is held would otherwise
//! deadlock.

use core::fmt::{Display, Write};

use crate::printk::{format_and_emit, ByteSink, SinkWriter};

/// Write the panic banner, location and message to `sink`
pub fn report_parts<S: ByteSink, M: Display>(sink: &mut S, location: Option<(&str, u32)>, message: M) {
    sink.write_bytes(b"\n!!! KERNEL PANIC !!!\n");

    if let Some((file, line)) = location {
        format_and_emit(sink, b"Location: %s:%u\n", &[file.into(), line.into()]);
    }

    let mut writer = SinkWriter(&mut *sink);
    let _ = writeln!(writer, "Message: {}", message);

    sink.write_bytes(b"System halted.\n");
}

/// Report a panic on UART0 and park the core
#[cfg(all(target_arch = "aarch64", target_os = "none"))]
pub fn kernel_panic(info: &core::panic::PanicInfo) -> ! {
    // SAFETY: the core is about to halt; sharing the UART with a console
    // mid-record costs at most a garbled line.
    let mut uart = unsafe { crate::drivers::Pl011::new(crate::drivers::UART0_BASE) };
    let location = info.location().map(|l| (l.file(), l.line()));
    report_parts(&mut uart, location, info.message());
    uart.flush();

    crate::arch::halt()
}
