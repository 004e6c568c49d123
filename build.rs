//! Build script for Wave Bubble firmware
//!
//! Handles:
//! - Memory layout configuration
//! - defmt linker script for embedded builds

fn main() {
    // Tell Cargo to re-run this if the linker script changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    // Only the embedded target links against the cortex-m-rt and defmt scripts
    if std::env::var_os("CARGO_FEATURE_EMBEDDED").is_some() {
        if let Ok(dir) = std::env::var("CARGO_MANIFEST_DIR") {
            println!("cargo:rustc-link-search={dir}");
        }
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
}
