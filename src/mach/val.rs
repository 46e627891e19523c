use super::number::{self, Number};
use super::{BasicString, VarRef};

/// ## Expression stack value
///
/// Strings are handles into the string heap. A variable reference is
/// never dereferenced unless an instruction asks for it.

#[derive(Debug, Clone)]
pub enum Val {
    Number(Number),
    String(BasicString),
    VarRef(VarRef),
}

impl From<Number> for Val {
    fn from(n: Number) -> Self {
        Val::Number(n)
    }
}

impl From<BasicString> for Val {
    fn from(s: BasicString) -> Self {
        Val::String(s)
    }
}

impl From<VarRef> for Val {
    fn from(v: VarRef) -> Self {
        Val::VarRef(v)
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Val::Number(n) => write!(f, "{}", number::format(*n)),
            Val::String(s) => write!(f, "{}", s),
            Val::VarRef(v) => write!(f, "{}", v),
        }
    }
}
