use super::number::Number;
use super::{BasicString, Exception, Fault, Val, VarRef};
use crate::error;
use crate::lang::{Error, ErrorCode, LineNumber};

/// ## Stack enforced and size limited vector

pub struct Stack<T> {
    name: &'static str,
    overflow: ErrorCode,
    capacity: usize,
    vec: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:?}", self.name, self.vec)
    }
}

impl<T> Stack<T> {
    pub fn new(name: &'static str, capacity: usize, overflow: ErrorCode) -> Stack<T> {
        Stack {
            name,
            overflow,
            capacity,
            vec: Vec::with_capacity(capacity),
        }
    }
    fn underflow_error(&self) -> Fault {
        Fault::StackUnderflow(self.name)
    }
    pub fn clear(&mut self) {
        self.vec.clear()
    }
    pub fn len(&self) -> usize {
        self.vec.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }
    pub fn is_full(&self) -> bool {
        self.vec.len() >= self.capacity
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn last(&self) -> Option<&T> {
        self.vec.last()
    }
    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.vec.last_mut()
    }
    /// Look `depth` entries down from the top.
    pub fn peek(&self, depth: usize) -> Option<&T> {
        self.vec.len().checked_sub(depth + 1).map(|i| &self.vec[i])
    }
    pub fn push(&mut self, val: T) -> Result<(), Error> {
        self.push_or(val, self.overflow)
    }
    pub fn push_or(&mut self, val: T, overflow: ErrorCode) -> Result<(), Error> {
        if self.is_full() {
            return Err(Error::new(overflow));
        }
        self.vec.push(val);
        Ok(())
    }
    pub fn pop(&mut self) -> Result<T, Fault> {
        match self.vec.pop() {
            Some(v) => Ok(v),
            None => Err(self.underflow_error()),
        }
    }
    pub fn pop_n(&mut self, len: usize) -> Result<Vec<T>, Fault> {
        if len > self.vec.len() {
            Err(self.underflow_error())
        } else {
            let range = (self.vec.len() - len)..;
            Ok(self.vec.drain(range).collect())
        }
    }
}

impl Stack<Val> {
    pub fn pop_number(&mut self) -> Result<Number, Exception> {
        match self.pop()? {
            Val::Number(n) => Ok(n),
            _ => Err(error!(WrongValueType).into()),
        }
    }
    pub fn pop_string(&mut self) -> Result<BasicString, Exception> {
        match self.pop()? {
            Val::String(s) => Ok(s),
            _ => Err(error!(WrongValueType).into()),
        }
    }
    pub fn pop_varref(&mut self) -> Result<VarRef, Exception> {
        match self.pop()? {
            Val::VarRef(v) => Ok(v),
            _ => Err(error!(WrongValueType).into()),
        }
    }
}

/// ## Subroutine and loop frames
///
/// GOSUB and FOR share one stack so that NEXT can unwind through a
/// GOSUB and RETURN through a FOR.

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Gosub {
        line_number: LineNumber,
        cursor: usize,
    },
    Loop {
        var: VarRef,
        resume: Option<LineNumber>,
        start: Number,
        end: Number,
        step: Number,
    },
}

/// Which frame `pop_nearest` looks for. `Loop(None)` is any loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Gosub,
    Loop(Option<VarRef>),
}

impl Frame {
    fn matches(&self, target: Target) -> bool {
        match (target, self) {
            (Target::Gosub, Frame::Gosub { .. }) => true,
            (Target::Loop(None), Frame::Loop { .. }) => true,
            (Target::Loop(Some(v)), Frame::Loop { var, .. }) => *var == v,
            _ => false,
        }
    }
}

impl Stack<Frame> {
    pub fn push_frame(&mut self, frame: Frame) -> Result<(), Error> {
        let overflow = match frame {
            Frame::Gosub { .. } => ErrorCode::TooManyGosubs,
            Frame::Loop { .. } => ErrorCode::TooManyForLoops,
        };
        self.push_or(frame, overflow)
    }

    /// Find the frame nearest the top matching `target`. Everything
    /// above it is discarded, and with `discard` the frame as well.
    pub fn pop_nearest(&mut self, target: Target, discard: bool) -> Option<Frame> {
        let slot = self.vec.iter().rposition(|frame| frame.matches(target))?;
        let frame = self.vec[slot].clone();
        self.vec.truncate(if discard { slot } else { slot + 1 });
        Some(frame)
    }
}
