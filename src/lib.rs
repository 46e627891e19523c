//! # Tiny BASIC VM
//!
//! Tiny BASIC the way it was first built: a small virtual machine whose
//! bytecode program *is* the BASIC interpreter. The grammar, statement
//! dispatch and error recovery live in `basic.asm`; the machine only
//! knows how to test tokens, keep stacks and call the host.
//!
//! Run the executable and you should see:
//! ```text
//! TINY BASIC VM, VERSION 0.3.0
//! OK
//! █
//! ```
//!
//! Give a file name on the command line to `LOAD` and `RUN` it.
//!
//! To embed the machine, implement [`mach::Host`] or use the in-memory
//! [`mach::MemoryHost`]:
//! ```
//! use basic::mach::{MemoryHost, Runtime};
//! let mut host = MemoryHost::new();
//! host.type_line("PRINT 6*7");
//! let mut runtime = Runtime::basic(host).unwrap();
//! runtime.exec().unwrap();
//! assert!(runtime.host().output().contains("42\n"));
//! ```

#[path = "doc/introduction.rs"]
#[allow(non_snake_case)]
pub mod _Introduction;

#[path = "doc/machine.rs"]
#[allow(non_snake_case)]
pub mod __Machine;

pub mod lang;
pub mod mach;
