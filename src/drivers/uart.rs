//! ARM PL011 UART driver
//!
//! Polling transmit path for the PrimeCell UART that QEMU's `virt` machine
//! maps at [`UART0_BASE`]. The driver is the kernel's byte sink: one byte in,
//! blocking until the transmit FIFO has room, strictly in order.

use core::ptr::{read_volatile, write_volatile};

use crate::printk::ByteSink;

/// UART0 on the QEMU virt machine
pub const UART0_BASE: usize = 0x0900_0000;

/// Reference clock QEMU feeds the PL011
pub const UART_CLOCK_HZ: u32 = 24_000_000;
/// Console line rate
pub const UART_BAUD: u32 = 115_200;

/// PL011 register offsets
const UART_DR: usize = 0x00; // Data Register
const UART_FR: usize = 0x18; // Flag Register
const UART_IBRD: usize = 0x24; // Integer Baud Rate Divisor
const UART_FBRD: usize = 0x28; // Fractional Baud Rate Divisor
const UART_LCR_H: usize = 0x2C; // Line Control Register
const UART_CR: usize = 0x30; // Control Register
const UART_IMSC: usize = 0x38; // Interrupt Mask Set/Clear Register
const UART_ICR: usize = 0x44; // Interrupt Clear Register

/// Flag Register bits
const FR_BUSY: u32 = 1 << 3; // UART Busy
const FR_TXFF: u32 = 1 << 5; // Transmit FIFO Full
const FR_TXFE: u32 = 1 << 7; // Transmit FIFO Empty

/// Control Register bits
const CR_UARTEN: u32 = 1 << 0;
const CR_TXE: u32 = 1 << 8;
const CR_RXE: u32 = 1 << 9;

/// Line Control Register bits
const LCR_H_FEN: u32 = 1 << 4; // FIFO Enable
const LCR_H_WLEN_8: u32 = 3 << 5; // 8-bit word length

/// All interrupt sources
const ICR_ALL: u32 = 0x7FF;

/// Integer and fractional baud rate divisors
///
/// The PL011 divides `clock / (16 * baud)` into a 16-bit integer part and a
/// 6-bit fraction rounded to the nearest 1/64.
pub const fn baud_divisors(clock_hz: u32, baud: u32) -> (u32, u32) {
    let scaled = (clock_hz as u64 * 4 + baud as u64 / 2) / baud as u64; // 64 * clock / (16 * baud)
    ((scaled >> 6) as u32, (scaled & 0x3F) as u32)
}

/// PL011 UART
pub struct Pl011 {
    base: usize,
}

impl Pl011 {
    /// Bind a driver to the registers at `base`
    ///
    /// # Safety
    /// `base` must be the MMIO base of a PL011 that nothing else drives
    /// concurrently.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    fn write_reg(&self, offset: usize, value: u32) {
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }

    /// Program 8N1 at [`UART_BAUD`] with FIFOs on and interrupts masked
    pub fn init(&mut self) {
        // Disable while reprogramming
        self.write_reg(UART_CR, 0);
        self.write_reg(UART_ICR, ICR_ALL);

        let (ibrd, fbrd) = baud_divisors(UART_CLOCK_HZ, UART_BAUD);
        self.write_reg(UART_IBRD, ibrd);
        self.write_reg(UART_FBRD, fbrd);

        self.write_reg(UART_LCR_H, LCR_H_WLEN_8 | LCR_H_FEN);
        self.write_reg(UART_IMSC, 0);
        self.write_reg(UART_CR, CR_UARTEN | CR_TXE | CR_RXE);
    }

    /// Send one byte, spinning while the transmit FIFO is full
    pub fn putc(&mut self, byte: u8) {
        while self.read_reg(UART_FR) & FR_TXFF != 0 {
            core::hint::spin_loop();
        }
        self.write_reg(UART_DR, byte as u32);
    }

    /// Wait until everything queued has left the shifter
    pub fn flush(&self) {
        while self.read_reg(UART_FR) & (FR_TXFE | FR_BUSY) != FR_TXFE {
            core::hint::spin_loop();
        }
    }
}

impl ByteSink for Pl011 {
    fn write_byte(&mut self, byte: u8) {
        self.putc(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qemu_console_divisors() {
        // 24 MHz / (16 * 115200) = 13.0208
        assert_eq!(baud_divisors(UART_CLOCK_HZ, UART_BAUD), (13, 1));
    }

    #[test]
    fn test_exact_divisors() {
        // 3 MHz / (16 * 9600) = 19.53125 = 19 + 34/64
        assert_eq!(baud_divisors(3_000_000, 9_600), (19, 34));
        assert_eq!(baud_divisors(16 * 115_200, 115_200), (1, 0));
    }
}
