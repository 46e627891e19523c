//! # BASIC
//!
//! Tiny BASIC on a bytecode virtual machine.
//!

mod term;

fn main() {
    term::main();
}
