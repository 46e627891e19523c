/*!
## Rust Machine Module

This Rust module is the Tiny BASIC virtual machine. The BASIC language
itself is not in here; it is a bytecode program the machine runs.

*/

pub type Address = usize;

pub const CONTROL_STACK_SIZE: usize = 64;
pub const EXPRESSION_STACK_SIZE: usize = 64;
pub const SUBROUTINE_STACK_SIZE: usize = 64 + 26;
pub const MAX_LINE_LEN: usize = 256;
pub const DEFAULT_DIMENSION: usize = 11;
pub const TAB_WIDTH: usize = 10;

mod console;
mod control;
mod fault;
mod function;
mod host;
mod image;
mod listing;
mod number;
mod opcode;
mod operation;
mod runtime;
mod stack;
mod string;
mod val;
mod var;

pub use fault::Abort;
pub use fault::Exception;
pub use fault::Fault;
pub use function::Function;
pub use host::FileHandle;
pub use host::Host;
pub use host::Input;
pub use host::MathException;
pub use host::MemoryHost;
pub use host::Mode;
pub use image::Image;
pub use listing::Listing;
pub use number::Number;
pub use opcode::Opcode;
pub use opcode::Operand;
pub use operation::Operation;
pub use runtime::Depths;
pub use runtime::Runtime;
pub use stack::Frame;
pub use stack::Stack;
pub use string::BasicString;
pub use string::StringHeap;
pub use val::Val;
pub use var::Kind;
pub use var::Var;
pub use var::VarRef;

#[cfg(test)]
mod tests;
