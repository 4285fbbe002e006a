//! Device drivers
//!
//! Only the console UART exists so far. It is driven by polling; nothing
//! here uses interrupts.

pub mod uart;

pub use uart::{Pl011, UART0_BASE};
