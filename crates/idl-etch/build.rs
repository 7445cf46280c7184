//! Build script for idl-etch
//!
//! Templates are embedded with `include_str!`; rebuild when they change.

fn main() {
    println!("cargo:rerun-if-changed=templates/");
    println!("cargo:rerun-if-changed=build.rs");
}
