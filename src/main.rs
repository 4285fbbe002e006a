//! virtos kernel binary
//!
//! On `aarch64-unknown-none` this is the kernel image: `_start` in
//! `arch::aarch64::boot` sets up a stack and calls [`kernel_main`]. Built for
//! the host it prints the boot report to stdout instead.

#![cfg_attr(all(target_arch = "aarch64", target_os = "none"), no_std, no_main)]

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
mod kernel {
    use core::panic::PanicInfo;

    use virtos::memlayout::KernelLayout;
    use virtos::{arch, console, kdebug, kinfo};

    /// Rust entry, called from the boot assembly with the DTB address in x0
    #[no_mangle]
    pub extern "C" fn kernel_main(dtb: usize) -> ! {
        console::init();

        let layout = KernelLayout::current();
        virtos::boot_report(dtb, Some(&layout));

        if virtos::log::DEBUG_ENABLED {
            kdebug!("first bytes of the image:\n");
            // SAFETY: the image is mapped and at least 64 bytes long.
            unsafe { console::dump_memory(layout.image.start as *const u8, 64) };
        }

        kinfo!("nothing left to do, parking core %u\n", arch::core_id());
        arch::halt()
    }

    #[panic_handler]
    fn panic(info: &PanicInfo) -> ! {
        virtos::panic::kernel_panic(info)
    }
}

#[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
fn main() -> std::io::Result<()> {
    use std::io::Write;

    virtos::console::init();
    virtos::boot_report(0, None);

    let mut written = Ok(());
    virtos::console::drain(|bytes| {
        written = std::io::stdout().write_all(bytes);
    });
    written?;
    std::io::stdout().flush()
}
