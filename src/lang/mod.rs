/*!
# Rust Language Module

The BASIC language as the machine sees it: error reporting, the
bytecode assembler and the grammar of Tiny BASIC written as a bytecode
program.

*/

pub type LineNumber = u16;
pub const MAX_LINENO: LineNumber = 65535;

#[macro_use]
mod error;
mod asm;

pub use asm::assemble;
pub use asm::AsmError;
pub use asm::COLLECTOR;
pub use asm::EXECUTOR;
pub use error::Error;
pub use error::ErrorCode;

use crate::mach::Image;

/// Source of the bundled Tiny BASIC grammar.
pub const BASIC_ASM: &str = include_str!("basic.asm");

/// The bundled Tiny BASIC grammar, assembled.
pub fn basic() -> Result<Image, Vec<AsmError>> {
    assemble(BASIC_ASM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_grammar_assembles() {
        let image = basic().unwrap();
        assert_eq!(image.code()[0], crate::mach::Opcode::INIT as u8);
        assert!(image.collector() > 0);
        assert!(image.executor() > image.collector());
    }
}
