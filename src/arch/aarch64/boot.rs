//! ARM64 reset entry point
//!
//! QEMU starts every core at `_start` with the device tree blob address in
//! `x0`. Secondary cores are parked. The boot core:
//! 1. Points `sp` at the top of the boot stack
//! 2. Zeroes `.bss` (`__bss_start..__bss_end`, provided by `kernel.ld`)
//! 3. Calls `kernel_main(dtb)` with `x0` untouched
//!
//! `kernel_main` never returns; if it did, the core parks.

use core::arch::global_asm;

/// Stack size for the boot core (64 KiB)
const BOOT_STACK_SIZE: usize = 0x10000;

// Boot stack in its own .bss subsection so it is zeroed with the rest
global_asm!(
    ".section .bss.boot_stack, \"aw\", %nobits",
    ".balign 16",
    ".global __boot_stack_bottom",
    "__boot_stack_bottom:",
    ".skip {stack_size}",
    ".global __boot_stack_top",
    "__boot_stack_top:",
    stack_size = const BOOT_STACK_SIZE,
);

global_asm!(
    ".section .text.boot, \"ax\"",
    ".global _start",
    "_start:",
    // Only core 0 continues
    "    mrs     x1, mpidr_el1",
    "    and     x1, x1, #0xff",
    "    cbnz    x1, 2f",
    // Stack
    "    adrp    x1, __boot_stack_top",
    "    add     x1, x1, :lo12:__boot_stack_top",
    "    mov     sp, x1",
    // Zero .bss, 8 bytes at a time (both ends are 16-byte aligned)
    "    adrp    x1, __bss_start",
    "    add     x1, x1, :lo12:__bss_start",
    "    adrp    x2, __bss_end",
    "    add     x2, x2, :lo12:__bss_end",
    "1:  cmp     x1, x2",
    "    b.hs    3f",
    "    str     xzr, [x1], #8",
    "    b       1b",
    // x0 still holds the DTB address
    "3:  bl      kernel_main",
    "2:  wfe",
    "    b       2b",
);
