use super::LineNumber;

/// ## Recoverable BASIC errors
///
/// These are reported to the user as `?SYNTAX ERROR AT LINE 10` and
/// send the machine back to direct mode.

#[derive(Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    line_number: Option<LineNumber>,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            line_number: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn line_number(&self) -> Option<LineNumber> {
        self.line_number
    }

    pub fn is_direct(&self) -> bool {
        self.line_number.is_none()
    }

    pub fn in_line_number(&self, line: LineNumber) -> Error {
        debug_assert!(self.line_number.is_none());
        Error {
            code: self.code,
            line_number: Some(line),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Syntax,
    MissingLine,
    LineNumberOutOfRange,
    TooManyGosubs,
    ReturnWithoutGosub,
    TooManyForLoops,
    NextWithoutFor,
    ExpressionTooComplex,
    DivisionByZero,
    ArithmeticException,
    NumberOutOfRange,
    WrongValueType,
    FileNotFound,
    WrongMode,
    IllegalQuantity,
    OutOfData,
    BadSubscript,
    RedimensionedArray,
    OutOfMemory,
}

impl ErrorCode {
    pub fn message(self) -> &'static str {
        use ErrorCode::*;
        match self {
            Syntax => "SYNTAX",
            MissingLine => "MISSING LINE",
            LineNumberOutOfRange => "LINE NUMBER OUT OF RANGE",
            TooManyGosubs => "TOO MANY GOSUBS",
            ReturnWithoutGosub => "RETURN WITHOUT GOSUB",
            TooManyForLoops => "TOO MANY FOR LOOPS",
            NextWithoutFor => "NEXT WITHOUT FOR",
            ExpressionTooComplex => "EXPRESSION TOO COMPLEX",
            DivisionByZero => "DIVISION BY ZERO",
            ArithmeticException => "ARITHMETIC EXCEPTION",
            NumberOutOfRange => "NUMBER OUT OF RANGE",
            WrongValueType => "WRONG VALUE TYPE",
            FileNotFound => "FILE NOT FOUND",
            WrongMode => "WRONG MODE",
            IllegalQuantity => "ILLEGAL QUANTITY",
            OutOfData => "OUT OF DATA",
            BadSubscript => "BAD SUBSCRIPT",
            RedimensionedArray => "REDIM'D ARRAY",
            OutOfMemory => "OUT OF MEMORY",
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ERROR", self.code.message())?;
        if let Some(line_number) = self.line_number {
            write!(f, " AT LINE {}", line_number)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(error!(Syntax).to_string(), "SYNTAX ERROR");
        assert_eq!(
            error!(NextWithoutFor, 40).to_string(),
            "NEXT WITHOUT FOR ERROR AT LINE 40"
        );
        assert_eq!(
            error!(RedimensionedArray).to_string(),
            "REDIM'D ARRAY ERROR"
        );
    }

    #[test]
    fn test_direct() {
        assert!(error!(OutOfData).is_direct());
        assert!(!error!(OutOfData, 1).is_direct());
        assert_eq!(error!(OutOfData, 7).line_number(), Some(7));
    }
}
