//! Architecture-specific code
//!
//! The kernel only runs on AArch64 (`aarch64-unknown-none`). Host builds,
//! which exist for unit tests and the preview binary, get inert stand-ins
//! with the same signatures.

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
pub mod aarch64;

#[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
pub mod host;

// Re-export current architecture
#[cfg(all(target_arch = "aarch64", target_os = "none"))]
pub use aarch64::cpu::*;

#[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
pub use host::*;

/// Park the calling core forever
pub fn halt() -> ! {
    loop {
        wait_for_event();
    }
}
