//! ARM64 CPU primitives

use core::arch::asm;

/// Affinity level 0 of this core (`MPIDR_EL1.Aff0`)
pub fn core_id() -> usize {
    let mpidr: u64;
    unsafe {
        asm!("mrs {}, mpidr_el1", out(reg) mpidr, options(nomem, nostack));
    }
    (mpidr & 0xff) as usize
}

/// Current exception level, 0 through 3
pub fn current_el() -> u8 {
    let el: u64;
    unsafe {
        asm!("mrs {}, CurrentEL", out(reg) el, options(nomem, nostack));
    }
    ((el >> 2) & 0x3) as u8
}

/// Sleep until an event or interrupt arrives
pub fn wait_for_event() {
    unsafe {
        asm!("wfe", options(nomem, nostack));
    }
}
