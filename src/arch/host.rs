//! Host stand-ins for the CPU primitives
//!
//! A host process has no exception levels or core affinity worth reporting,
//! so these describe the boot core of a freshly reset machine.

/// Always the boot core
pub fn core_id() -> usize {
    0
}

/// The kernel's exception level
pub fn current_el() -> u8 {
    1
}

/// Yield instead of sleeping
pub fn wait_for_event() {
    core::hint::spin_loop();
}
