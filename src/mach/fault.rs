use super::Address;
use crate::lang::Error;

/// ## Internal machine faults
///
/// A fault means the bytecode program, not the BASIC program, is
/// broken. The machine stops.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    #[error("!{0} STACK UNDERFLOW")]
    StackUnderflow(&'static str),
    #[error("!VM PROGRAM COUNTER OUT OF RANGE")]
    ProgramCounter,
    #[error("!UNDEFINED VM OPCODE")]
    UndefinedOpcode,
    #[error("!BAD VM IMAGE")]
    BadImage,
    #[error("!INVALID ONDONE TARGET")]
    OnDoneTarget,
    #[error("!STEP WITHOUT FOR")]
    StepWithoutFor,
    #[error("!NESTED ENTRY INTO DATA MODE")]
    NestedDataMode,
    #[error("!INVALID EXIT FROM DATA MODE")]
    DataModeExit,
    #[error("!DATA RESET WHILE IN DATA MODE")]
    DataModeReset,
    #[error("!INVALID DMODE")]
    DataModeOperand,
    #[error("!NXTLN IN DIRECT MODE")]
    DirectNextLine,
    #[error("!MISSING LINE")]
    MissingLine,
    #[error("!BAD DIMENSION")]
    BadDimension,
    #[error("!BAD VAR ADDRESS")]
    BadVarAddress,
    #[error("!ILLEGAL SBSTR MODE")]
    SubstringMode,
    #[error("!ILLEGAL DONEM MODE")]
    DoneMode,
    #[error("!INVALID RELATIONAL OPERATOR")]
    Relation,
    #[error("!INVALID NXTFOR")]
    NextOperand,
    #[error("!NO PRINTER FOR VALUE")]
    NoPrinter,
}

/// Everything a handler can fail with.
#[derive(Debug, Clone, PartialEq)]
pub enum Exception {
    Recoverable(Error),
    Fatal(Fault),
}

impl From<Error> for Exception {
    fn from(error: Error) -> Exception {
        Exception::Recoverable(error)
    }
}

impl From<Fault> for Exception {
    fn from(fault: Fault) -> Exception {
        Exception::Fatal(fault)
    }
}

/// A fault together with where it happened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{fault}, PC={pc}, OPC={opcode}")]
pub struct Abort {
    pub fault: Fault,
    pub pc: Address,
    pub opcode: u8,
}
