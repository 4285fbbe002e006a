//! virtos - a minimal AArch64 kernel for the QEMU `virt` machine
//!
//! The kernel boots on one core, brings up the PL011 UART and reports
//! through a printf-style formatting engine. Everything above the UART is
//! target independent and is unit tested on the host.

#![cfg_attr(not(test), no_std)]
// Hardware register code often uses explicit bit shifts for documentation
#![allow(clippy::identity_op)]

pub mod arch;
pub mod console;
pub mod drivers;
pub mod hexdump;
pub mod log;
pub mod memlayout;
pub mod panic;
pub mod printk;

use memlayout::KernelLayout;

/// Kernel version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Kernel name
pub const NAME: &str = "virtos";

/// Print the boot banner and what the kernel knows about itself
pub fn boot_report(dtb: usize, layout: Option<&KernelLayout>) {
    crate::printk!("\n%s %s on QEMU virt\n", NAME, VERSION);
    crate::kinfo!("Kernel initialized successfully!\n");
    crate::kinfo!("core %u at EL%u\n", arch::core_id(), arch::current_el());
    crate::kdebug!("device tree at %p\n", dtb as *const u8);

    if let Some(layout) = layout {
        crate::kinfo!(
            "image 0x%lx-0x%lx (%lu bytes)\n",
            layout.image.start,
            layout.image.end,
            layout.image_size()
        );
        crate::kdebug!("bss 0x%lx-0x%lx\n", layout.bss.start, layout.bss.end);
    }
}
