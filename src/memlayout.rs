//! Kernel image layout
//!
//! The linker script exports the image bounds and the `.bss` bounds; boot
//! code zeroes `.bss` from them and the boot report prints them.

use core::ops::Range;

/// Physical address QEMU `virt` loads the kernel image at
pub const KERNEL_LOAD_ADDR: usize = 0x4008_0000;

/// Where the kernel image sits in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelLayout {
    /// `__kernel_start..__kernel_end`
    pub image: Range<usize>,
    /// `__bss_start..__bss_end`
    pub bss: Range<usize>,
}

impl KernelLayout {
    pub fn image_size(&self) -> usize {
        self.image.end.saturating_sub(self.image.start)
    }

    pub fn bss_size(&self) -> usize {
        self.bss.end.saturating_sub(self.bss.start)
    }

    /// Is `addr` inside the loaded image
    pub fn contains(&self, addr: usize) -> bool {
        self.image.contains(&addr)
    }

    /// Layout of the running kernel, read from the linker symbols
    #[cfg(all(target_arch = "aarch64", target_os = "none"))]
    pub fn current() -> KernelLayout {
        extern "C" {
            static __kernel_start: u8;
            static __kernel_end: u8;
            static __bss_start: u8;
            static __bss_end: u8;
        }

        // SAFETY: only the addresses of the linker symbols are taken.
        unsafe {
            KernelLayout {
                image: core::ptr::addr_of!(__kernel_start) as usize
                    ..core::ptr::addr_of!(__kernel_end) as usize,
                bss: core::ptr::addr_of!(__bss_start) as usize
                    ..core::ptr::addr_of!(__bss_end) as usize,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KernelLayout {
        KernelLayout {
            image: KERNEL_LOAD_ADDR..0x4009_4000,
            bss: 0x4008_c000..0x4009_4000,
        }
    }

    #[test]
    fn test_sizes() {
        let layout = sample();
        assert_eq!(layout.image_size(), 0x14000);
        assert_eq!(layout.bss_size(), 0x8000);
    }

    #[test]
    fn test_contains_is_half_open() {
        let layout = sample();
        assert!(layout.contains(KERNEL_LOAD_ADDR));
        assert!(layout.contains(0x4009_3fff));
        assert!(!layout.contains(0x4009_4000));
        assert!(!layout.contains(KERNEL_LOAD_ADDR - 1));
    }

    #[test]
    fn test_inverted_range_has_no_size() {
        let layout = KernelLayout {
            image: 0x2000..0x1000,
            bss: 0x2000..0x2000,
        };
        assert_eq!(layout.image_size(), 0);
        assert_eq!(layout.bss_size(), 0);
    }
}
