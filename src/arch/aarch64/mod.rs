//! ARM64 (AArch64) support
//!
//! `boot` holds the reset entry point; `cpu` the handful of system register
//! accessors the kernel needs before anything else exists.

pub mod boot;
pub mod cpu;
