use std::env;

fn main() {
    let linker_file = "kernel.ld";

    // Tells Cargo to run again if the linker script changes.
    println!("cargo:rerun-if-changed={}", linker_file);
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds (unit tests, the preview binary) use the platform linker defaults.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("none") {
        let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
        println!("cargo:rustc-link-arg-bins=-T{}/{}", manifest_dir, linker_file);
    }
}
