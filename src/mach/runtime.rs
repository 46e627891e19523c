use super::number::{self, Number};
use super::{
    Abort, Address, Exception, Fault, FileHandle, Frame, Function, Host, Image, Listing, Opcode,
    Operation, Stack, StringHeap, Val, Var,
};
use super::{CONTROL_STACK_SIZE, EXPRESSION_STACK_SIZE, SUBROUTINE_STACK_SIZE};
use crate::error;
use crate::lang::{AsmError, Error, ErrorCode, LineNumber};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::ops::Range;
use std::rc::Rc;

pub(super) type Result<T> = std::result::Result<T, Exception>;

/// ## Virtual machine
///
/// One value owns everything: the bytecode image, the three stacks,
/// variables, strings, the stored program and the console state.
/// The BASIC language is the bytecode; this only executes it.

pub struct Runtime<H: Host> {
    pub(super) host: H,
    pub(super) image: Image,
    pub(super) pc: Address,
    pub(super) opc_pc: Address,
    pub(super) opcode: u8,
    pub(super) running: bool,
    pub(super) insns: u64,
    pub(super) control: Stack<Address>,
    pub(super) subroutine: Stack<Frame>,
    pub(super) expression: Stack<Val>,
    pub(super) ondone: Option<Address>,
    pub(super) strings: StringHeap,
    pub(super) var: Var,
    pub(super) listing: Listing,
    pub(super) direct: bool,
    pub(super) line_number: LineNumber,
    pub(super) line: Rc<[u8]>,
    pub(super) cursor: usize,
    pub(super) direct_line: Rc<[u8]>,
    pub(super) suppress_prompt: bool,
    pub(super) data: Option<(LineNumber, usize)>,
    pub(super) saved: Option<(LineNumber, usize)>,
    pub(super) cons_file: FileHandle,
    pub(super) cons_column: usize,
    pub(super) prog_file: Option<FileHandle>,
    pub(super) prog_file_name: Option<Vec<u8>>,
    pub(super) rng: StdRng,
}

/// Stack depths, for embedders and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Depths {
    pub control: usize,
    pub subroutine: usize,
    pub expression: usize,
}

impl<H: Host> Runtime<H> {
    pub fn new(host: H, image: Image) -> Runtime<H> {
        let strings = StringHeap::new();
        let var = Var::new(&strings.empty());
        let direct_line: Rc<[u8]> = Rc::from(&b"\n"[..]);
        Runtime {
            host,
            image,
            pc: 0,
            opc_pc: 0,
            opcode: 0,
            running: false,
            insns: 0,
            control: Stack::new("CONTROL", CONTROL_STACK_SIZE, ErrorCode::ExpressionTooComplex),
            subroutine: Stack::new(
                "SUBROUTINE",
                SUBROUTINE_STACK_SIZE,
                ErrorCode::TooManyGosubs,
            ),
            expression: Stack::new(
                "EXPRESSION",
                EXPRESSION_STACK_SIZE,
                ErrorCode::ExpressionTooComplex,
            ),
            ondone: None,
            strings,
            var,
            listing: Listing::default(),
            direct: true,
            line_number: 0,
            line: direct_line.clone(),
            cursor: 0,
            direct_line,
            suppress_prompt: false,
            data: None,
            saved: None,
            cons_file: FileHandle::CONSOLE,
            cons_column: 0,
            prog_file: None,
            prog_file_name: None,
            rng: StdRng::seed_from_u64(1),
        }
    }

    /// A machine running the bundled BASIC grammar.
    pub fn basic(host: H) -> std::result::Result<Runtime<H>, Vec<AsmError>> {
        Ok(Runtime::new(host, crate::lang::basic()?))
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn strings(&self) -> &StringHeap {
        &self.strings
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_direct(&self) -> bool {
        self.direct
    }

    pub fn instructions(&self) -> u64 {
        self.insns
    }

    pub fn depths(&self) -> Depths {
        Depths {
            control: self.control.len(),
            subroutine: self.subroutine.len(),
            expression: self.expression.len(),
        }
    }

    /// Run until EXIT, console disconnect, or a fault.
    pub fn exec(&mut self) -> std::result::Result<(), Abort> {
        self.host.math_exception();
        self.running = true;
        while self.running {
            self.step()?;
        }
        Ok(())
    }

    /// One dispatch cycle.
    pub fn step(&mut self) -> std::result::Result<(), Abort> {
        if self.strings.needs_collection() {
            self.strings.collect();
        }
        if self.host.check_break(self.cons_file) {
            self.print_break();
            self.direct_mode(0);
            return Ok(());
        }
        self.opc_pc = self.pc;
        let result = self.fetch_opcode().and_then(|opcode| {
            trace!("{:>5} {}", self.opc_pc, opcode);
            self.execute(opcode)
        });
        self.insns += 1;
        match result {
            Ok(()) => Ok(()),
            Err(Exception::Recoverable(error)) => {
                self.recover(error.code());
                Ok(())
            }
            Err(Exception::Fatal(fault)) => Err(self.abort(fault)),
        }
    }

    fn fetch_opcode(&mut self) -> Result<Opcode> {
        let byte = self.fetch_byte()?;
        self.opcode = byte;
        Ok(Opcode::try_from(byte).map_err(|_| Fault::UndefinedOpcode)?)
    }

    pub(super) fn fetch_byte(&mut self) -> Result<u8> {
        match self.image.code().get(self.pc) {
            Some(&byte) => {
                self.pc += 1;
                Ok(byte)
            }
            None => Err(Fault::ProgramCounter.into()),
        }
    }

    pub(super) fn fetch_label(&mut self) -> Result<Address> {
        let lo = self.fetch_byte()?;
        let hi = self.fetch_byte()?;
        Ok(u16::from_le_bytes([lo, hi]) as Address)
    }

    /// Inline token after a label. The last byte has bit 7 set.
    pub(super) fn fetch_token(&mut self) -> Result<Range<Address>> {
        let start = self.pc;
        loop {
            if self.fetch_byte()? & 0x80 != 0 {
                return Ok(start..self.pc);
            }
        }
    }

    fn execute(&mut self, opcode: Opcode) -> Result<()> {
        use Opcode::*;
        match opcode {
            TST => self.test_token(),
            CALL => {
                let label = self.fetch_label()?;
                self.control.push(self.pc)?;
                self.pc = label;
                Ok(())
            }
            RTN => {
                self.pc = self.control.pop()?;
                Ok(())
            }
            DONE => self.done(),
            JMP => {
                self.pc = self.fetch_label()?;
                Ok(())
            }
            PRS => self.print_literal(),
            PRN => self.print_value(),
            SPC => {
                self.putchar(b'\t');
                Ok(())
            }
            NLINE => {
                self.putchar(b'\n');
                Ok(())
            }
            NXT => self.next_statement(),
            XFER => self.transfer(),
            SAV => self.save_position(),
            RSTR => self.restore_position(),
            CMPR => {
                if !self.compare()? {
                    self.next_statement()?;
                }
                Ok(())
            }
            LIT => {
                let n = self.fetch_byte()?;
                self.push_number(number::from_int(n as i32))
            }
            INNUM => self.input_number(),
            FIN => {
                self.direct_mode(0);
                Ok(())
            }
            ERR => Err(error!(Syntax).into()),
            ADD => self.add(),
            SUB => self.binary(Operation::subtract),
            NEG => self.unary(Operation::negate),
            MUL => self.binary(Operation::multiply),
            DIV => self.binary(Operation::divide),
            STORE => {
                let value = self.expression.pop()?;
                let var = self.expression.pop_varref()?;
                self.var.store(var, value)
            }
            TSTV => self.test_variable(),
            TSTN => self.test_number(),
            IND => {
                let var = self.expression.pop_varref()?;
                let value = self.var.fetch(var)?;
                self.push(value)
            }
            LST => self.list(0, 0),
            INIT => {
                self.init();
                Ok(())
            }
            GETLINE => self.get_line(),
            TSTL => self.test_line_number(),
            INSRT => self.insert_line(),
            XINIT => {
                if self.prog_file.is_some() {
                    return Err(error!(Syntax).into());
                }
                self.expression.clear();
                Ok(())
            }
            RUN => self.run(),
            EXIT => {
                self.running = false;
                Ok(())
            }
            CMPRX => {
                let label = self.fetch_label()?;
                if !self.compare()? {
                    self.pc = label;
                }
                Ok(())
            }
            FOR => self.for_loop(),
            STEP => self.step_loop(),
            NXTFOR => self.next_loop(),
            MOD => self.binary(Operation::modulo),
            POW => self.binary(Operation::power),
            RND => {
                let n = self.expression.pop_number()?;
                let r = Function::rnd(&mut self.rng, n)?;
                self.push_number(r)
            }
            ABS => self.unary(Function::abs),
            TSTEOL => {
                let label = self.fetch_label()?;
                self.skip_whitespace();
                if self.peek(0) != b'\n' {
                    self.pc = label;
                }
                Ok(())
            }
            TSTS => self.test_string(),
            STR => {
                let n = self.expression.pop_number()?;
                let s = self.strings.alloc(number::format(n).as_bytes());
                self.push(Val::String(s))
            }
            VAL => {
                let s = self.expression.pop_string()?;
                let s = self.strings.terminate(&s);
                let n = Function::val(&s.bytes())?;
                self.push_number(n)
            }
            HEX => {
                let n = self.expression.pop_number()?;
                let s = self.strings.alloc(Function::hex(n)?.as_bytes());
                self.push(Val::String(s))
            }
            CPY => {
                let value = self.expression.pop()?;
                self.push(value.clone())?;
                self.push(value)
            }
            LSTX => {
                let last = number::to_int(self.expression.pop_number()?)?;
                let first = number::to_int(self.expression.pop_number()?)?;
                if last < 0 {
                    return Err(error!(Syntax).into());
                }
                let first = first.clamp(0, LineNumber::MAX as i32) as LineNumber;
                let last = last.min(LineNumber::MAX as i32) as LineNumber;
                self.list(first, last)
            }
            STRLEN => {
                let s = self.expression.pop_string()?;
                self.push_number(number::from_int(s.len() as i32))
            }
            ASC => {
                let s = self.expression.pop_string()?;
                let n = Function::asc(&s.bytes());
                self.push_number(n)
            }
            CHR => {
                let n = self.expression.pop_number()?;
                let s = self.strings.alloc(&[Function::chr(n)?]);
                self.push(Val::String(s))
            }
            FIX => self.unary(|n| Ok(Function::fix(n))),
            SGN => self.unary(|n| Ok(Function::sgn(n))),
            SCAN => self.scan(),
            ONDONE => {
                let label = self.fetch_label()?;
                if self.ondone.is_some() {
                    return Err(error!(Syntax).into());
                }
                if label == 0 {
                    return Err(Fault::OnDoneTarget.into());
                }
                self.ondone = Some(label);
                Ok(())
            }
            ADVEOL => {
                while self.peek(0) != b'\n' {
                    self.cursor += 1;
                }
                Ok(())
            }
            INVAR => self.input_variable(),
            POP => {
                self.expression.pop()?;
                Ok(())
            }
            LDPRG => self.load_program(),
            SVPRG => self.save_program(),
            DONEM => {
                let mode = self.fetch_byte()?;
                match mode {
                    0 if self.direct => Err(error!(WrongMode).into()),
                    1 if !self.direct => Err(error!(WrongMode).into()),
                    0 | 1 => self.done(),
                    _ => Err(Fault::DoneMode.into()),
                }
            }
            SRND => {
                let n = self.expression.pop_number()?;
                let seed = if n != number::from_int(0) {
                    Function::seed(n)
                } else {
                    self.host.wall_clock().unwrap_or(self.insns)
                };
                debug!("random seed {}", seed);
                self.rng = StdRng::seed_from_u64(seed);
                Ok(())
            }
            FLR => self.unary(|n| Ok(Function::floor(n))),
            CEIL => self.unary(|n| Ok(Function::ceil(n))),
            ATN => self.unary(Function::atn),
            COS => self.unary(Function::cos),
            SIN => self.unary(Function::sin),
            TAN => self.unary(Function::tan),
            EXP => self.unary(Function::exp),
            LOG => self.unary(Function::log),
            SQR => self.unary(Function::sqr),
            MKS => {
                let fill = self.expression.pop()?;
                let count = self.expression.pop_number()?;
                let bytes = Function::repeat(count, &fill)?;
                let s = self.strings.alloc(&bytes);
                self.push(Val::String(s))
            }
            SBSTR => self.substring(),
            TSTSOL => {
                let label = self.fetch_label()?;
                if self.cursor != 0 {
                    self.pc = label;
                }
                Ok(())
            }
            NXTLN => self.next_line(),
            DMODE => {
                let mode = self.fetch_byte()?;
                self.data_mode(mode)
            }
            DSTORE => self.data_store(),
            DIM => self.dimension(),
            ARRY => self.array_element(),
            ADVCRS => {
                let mode = self.fetch_byte()?;
                self.advance_cursor(mode)
            }
            DEGRAD => match self.fetch_byte()? {
                1 => self.unary(Function::radians),
                _ => self.unary(Function::degrees),
            },
            UPRLWR => {
                let upper = self.fetch_byte()? == 1;
                let s = self.expression.pop_string()?;
                let changed = Function::change_case(&s.bytes(), upper);
                let s = self.strings.alloc(&changed);
                self.push(Val::String(s))
            }
        }
    }

    pub(super) fn push(&mut self, value: Val) -> Result<()> {
        Ok(self.expression.push(value)?)
    }

    pub(super) fn push_number(&mut self, n: Number) -> Result<()> {
        self.push(Val::Number(n))
    }

    /// Exceptions the host's floating point unit noticed.
    fn check_math(&mut self) -> Result<()> {
        let exception = self.host.math_exception();
        if exception.divide_by_zero {
            Err(error!(DivisionByZero).into())
        } else if exception.arithmetic {
            Err(error!(ArithmeticException).into())
        } else {
            Ok(())
        }
    }

    fn unary<F>(&mut self, f: F) -> Result<()>
    where
        F: Fn(Number) -> std::result::Result<Number, Error>,
    {
        let n = self.expression.pop_number()?;
        let n = f(n)?;
        self.check_math()?;
        self.push_number(n)
    }

    fn binary<F>(&mut self, f: F) -> Result<()>
    where
        F: Fn(Number, Number) -> std::result::Result<Number, Error>,
    {
        let rhs = self.expression.pop_number()?;
        let lhs = self.expression.pop_number()?;
        let n = f(lhs, rhs)?;
        self.check_math()?;
        self.push_number(n)
    }

    fn add(&mut self) -> Result<()> {
        let rhs = self.expression.pop()?;
        let lhs = self.expression.pop()?;
        match (lhs, rhs) {
            (Val::Number(lhs), Val::Number(rhs)) => {
                let n = Operation::sum(lhs, rhs)?;
                self.check_math()?;
                self.push_number(n)
            }
            (Val::String(lhs), Val::String(rhs)) => {
                let s = self.strings.concatenate(&lhs, &rhs);
                self.push(Val::String(s))
            }
            _ => Err(error!(WrongValueType).into()),
        }
    }

    fn compare(&mut self) -> Result<bool> {
        let rhs = self.expression.pop()?;
        let relation = number::to_int(self.expression.pop_number()?)?;
        let lhs = self.expression.pop()?;
        Operation::compare(&lhs, relation, &rhs)
    }

    fn substring(&mut self) -> Result<()> {
        let mode = number::to_int(self.expression.pop_number()?)?;
        let (string, range) = match mode {
            0 => {
                let len = number::to_int(self.expression.pop_number()?)?;
                let pos = number::to_int(self.expression.pop_number()?)?;
                let string = self.expression.pop_string()?;
                (string, Function::mid(pos, len)?)
            }
            1 => {
                let pos = number::to_int(self.expression.pop_number()?)?;
                let string = self.expression.pop_string()?;
                let range = Function::tail(string.len(), pos)?;
                (string, range)
            }
            2 => {
                let len = number::to_int(self.expression.pop_number()?)?;
                let string = self.expression.pop_string()?;
                let range = Function::right(string.len(), len)?;
                (string, range)
            }
            _ => return Err(Fault::SubstringMode.into()),
        };
        let s = self.strings.substring(&string, range);
        self.push(Val::String(s))
    }

    /// Character under the cursor, or `offset` past it. Running off the
    /// end of the text reads as end of line.
    pub(super) fn peek(&self, offset: usize) -> u8 {
        self.line
            .get(self.cursor + offset)
            .copied()
            .unwrap_or(b'\n')
    }

    pub(super) fn skip_whitespace(&mut self) {
        while matches!(self.peek(0), b' ' | b'\t') {
            self.cursor += 1;
        }
    }

    fn reset_stacks(&mut self) {
        self.ondone = None;
        self.saved = None;
        self.control.clear();
        self.subroutine.clear();
        self.expression.clear();
    }

    /// Back to collecting lines at the console.
    pub(super) fn direct_mode(&mut self, cursor: usize) {
        self.reset_stacks();
        self.direct = true;
        self.pc = self.image.collector();
        self.line_number = 0;
        self.line = self.direct_line.clone();
        self.cursor = cursor;
    }

    pub(super) fn init(&mut self) {
        self.listing.clear();
        self.strings.invalidate_statics();
        self.var.clear(&self.strings.empty());
        self.reset_stacks();
        self.direct = true;
        self.line_number = 0;
        self.line = self.direct_line.clone();
        self.cursor = 0;
        self.data = None;
        self.cons_file = FileHandle::CONSOLE;
        self.prog_file_name = None;
        self.rng = StdRng::seed_from_u64(1);
    }

    fn run(&mut self) -> Result<()> {
        self.var.clear(&self.strings.empty());
        self.reset_stacks();
        self.direct = false;
        self.line_number = 0;
        self.data = None;
        self.next_statement()
    }

    /// Continue with the line after this one, or stop when there is none.
    pub(super) fn next_statement(&mut self) -> Result<()> {
        if self.direct {
            self.direct_mode(0);
            return Ok(());
        }
        match self.listing.next_line(self.line_number) {
            Some(line_number) => self.goto_line(line_number),
            None => {
                self.direct_mode(0);
                Ok(())
            }
        }
    }

    /// Start executing at the beginning of `line_number`.
    pub(super) fn goto_line(&mut self, line_number: LineNumber) -> Result<()> {
        let line = match self.listing.get(line_number) {
            Some(line) => line.clone(),
            None => return Err(error!(MissingLine).into()),
        };
        self.line = line;
        self.line_number = line_number;
        self.cursor = 0;
        self.pc = self.image.executor();
        Ok(())
    }

    /// Reposition within a line that must exist; PC is unchanged. Line
    /// zero is the direct line.
    pub(super) fn restore_line(&mut self, line_number: LineNumber, cursor: usize) -> Result<()> {
        if line_number == 0 {
            self.line = self.direct_line.clone();
        } else {
            match self.listing.get(line_number) {
                Some(line) => self.line = line.clone(),
                None => return Err(Fault::MissingLine.into()),
            }
        }
        self.line_number = line_number;
        self.cursor = cursor;
        Ok(())
    }

    fn recover(&mut self, code: ErrorCode) {
        if self.prog_file.is_some() {
            self.prog_file_fini();
        }
        let error = if self.direct {
            Error::new(code)
        } else {
            Error::new(code).in_line_number(self.line_number)
        };
        if self.saved.is_some() {
            self.exit_data_mode();
        }
        debug!("{}", error);
        if self.cons_column != 0 {
            self.putchar(b'\n');
        }
        self.print_str(&format!("?{}\n", error));
        self.direct_mode(0);
    }

    fn abort(&mut self, fault: Fault) -> Abort {
        let abort = Abort {
            fault,
            pc: self.opc_pc,
            opcode: self.opcode,
        };
        log::error!("{}", abort);
        self.cons_file = FileHandle::CONSOLE;
        if self.cons_column != 0 {
            self.putchar(b'\n');
        }
        self.print_str(&format!("{}\n", abort));
        self.running = false;
        abort
    }
}
