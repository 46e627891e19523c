use super::number::{self, Number};
use super::runtime::Result;
use super::stack::Target;
use super::{Fault, Frame, Host, Kind, Operation, Runtime, Val, VarRef};
use crate::error;
use crate::lang::{LineNumber, MAX_LINENO};
use log::debug;

/// ## Statement control flow
///
/// Token tests, line transfers, GOSUB and FOR frames, DATA/READ and
/// arrays. These are the instructions that move the line cursor.

impl<H: Host> Runtime<H> {
    pub(super) fn test_token(&mut self) -> Result<()> {
        let label = self.fetch_label()?;
        let token = self.fetch_token()?;
        self.skip_whitespace();
        let len = token.len();
        for (i, addr) in token.enumerate() {
            if self.image.code()[addr] & 0x7f != self.peek(i) {
                self.pc = label;
                return Ok(());
            }
        }
        self.cursor += len;
        Ok(())
    }

    /// Look for the token anywhere in the rest of the line, stepping
    /// over quoted text. The cursor lands just past the first match.
    pub(super) fn scan(&mut self) -> Result<()> {
        let label = self.fetch_label()?;
        let range = self.fetch_token()?;
        let token: Vec<u8> = self.image.code()[range].iter().map(|c| c & 0x7f).collect();
        self.skip_whitespace();
        let line = self.line.clone();
        let text = &line[self.cursor.min(line.len())..];
        let mut quoted = false;
        for (i, &c) in text.iter().enumerate() {
            match c {
                b'\n' => break,
                b'"' => quoted = !quoted,
                _ if !quoted && text[i..].starts_with(&token) => {
                    self.cursor += i + token.len();
                    return Ok(());
                }
                _ => {}
            }
        }
        self.pc = label;
        Ok(())
    }

    /// End of statement. An armed ONDONE hook runs first and is
    /// disarmed; it comes back here through RTN.
    pub(super) fn done(&mut self) -> Result<()> {
        if let Some(hook) = self.ondone.take() {
            self.control.push(self.opc_pc)?;
            self.pc = hook;
            return Ok(());
        }
        self.skip_whitespace();
        if self.peek(0) != b'\n' {
            return Err(error!(Syntax).into());
        }
        Ok(())
    }

    pub(super) fn transfer(&mut self) -> Result<()> {
        let n = number::to_int(self.expression.pop_number()?)?;
        if n < 1 || n > MAX_LINENO as i32 {
            return Err(error!(LineNumberOutOfRange).into());
        }
        self.goto_line(n as LineNumber)?;
        self.direct = false;
        Ok(())
    }

    pub(super) fn save_position(&mut self) -> Result<()> {
        let line_number = if self.direct { 0 } else { self.line_number };
        self.subroutine.push_frame(Frame::Gosub {
            line_number,
            cursor: self.cursor,
        })?;
        Ok(())
    }

    pub(super) fn restore_position(&mut self) -> Result<()> {
        match self.subroutine.pop_nearest(Target::Gosub, true) {
            Some(Frame::Gosub {
                line_number: 0, ..
            }) => {
                self.direct_mode(0);
                Ok(())
            }
            Some(Frame::Gosub {
                line_number,
                cursor,
            }) => self.restore_line(line_number, cursor),
            _ => Err(error!(ReturnWithoutGosub).into()),
        }
    }

    /// Move to the next stored line without running it. Used to step
    /// through DATA statements.
    pub(super) fn next_line(&mut self) -> Result<()> {
        let label = self.fetch_label()?;
        if self.line_number == 0 {
            return Err(Fault::DirectNextLine.into());
        }
        match self.listing.next_line(self.line_number) {
            Some(line_number) => self.restore_line(line_number, 0),
            None => {
                self.pc = label;
                Ok(())
            }
        }
    }

    pub(super) fn test_variable(&mut self) -> Result<()> {
        let label = self.fetch_label()?;
        self.skip_whitespace();
        let c = self.peek(0);
        if !c.is_ascii_uppercase() {
            self.pc = label;
            return Ok(());
        }
        self.cursor += 1;
        let kind = if self.peek(0) == b'$' {
            self.cursor += 1;
            Kind::String
        } else {
            Kind::Number
        };
        self.push(Val::VarRef(VarRef::scalar(kind, c - b'A')))
    }

    pub(super) fn test_number(&mut self) -> Result<()> {
        let label = self.fetch_label()?;
        self.skip_whitespace();
        match number::parse(&self.line[self.cursor..], false)? {
            Some((n, len)) => {
                self.cursor += len;
                self.push_number(n)
            }
            None => {
                self.pc = label;
                Ok(())
            }
        }
    }

    /// Line number at the cursor. Signs are not part of a line number.
    fn parse_line_number(&mut self, advance: bool) -> Result<Option<i32>> {
        self.skip_whitespace();
        let digits = self.line[self.cursor..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .count();
        if digits == 0 {
            return Ok(None);
        }
        let text = &self.line[self.cursor..self.cursor + digits];
        let n = text
            .iter()
            .try_fold(0i32, |n, c| n.checked_mul(10)?.checked_add((c - b'0') as i32))
            .ok_or_else(|| error!(IllegalQuantity))?;
        if advance {
            self.cursor += digits;
        }
        Ok(Some(n))
    }

    pub(super) fn test_line_number(&mut self) -> Result<()> {
        let label = self.fetch_label()?;
        match self.parse_line_number(false)? {
            Some(n) if n < 1 || n > MAX_LINENO as i32 => {
                Err(error!(LineNumberOutOfRange).into())
            }
            Some(_) => Ok(()),
            None => {
                self.pc = label;
                Ok(())
            }
        }
    }

    pub(super) fn insert_line(&mut self) -> Result<()> {
        let line_number = match self.parse_line_number(true)? {
            Some(n) if n >= 1 && n <= MAX_LINENO as i32 => n as LineNumber,
            _ => return Err(error!(LineNumberOutOfRange).into()),
        };
        let stored = self
            .listing
            .insert(line_number, &self.line[self.cursor..]);
        debug!(
            "{} line {}",
            if stored { "stored" } else { "deleted" },
            line_number
        );
        self.strings.invalidate_statics();
        self.data = None;
        self.suppress_prompt = true;
        Ok(())
    }

    /// A quoted literal becomes a string. Literals in stored lines
    /// alias the program text.
    pub(super) fn test_string(&mut self) -> Result<()> {
        let label = self.fetch_label()?;
        self.skip_whitespace();
        if self.peek(0) != b'"' {
            self.pc = label;
            return Ok(());
        }
        let start = self.cursor + 1;
        let mut end = start;
        loop {
            match self.line.get(end).copied().unwrap_or(b'\n') {
                b'"' => break,
                b'\n' => return Err(error!(Syntax).into()),
                _ => end += 1,
            }
        }
        let s = if self.line_number != 0 {
            self.strings.alias(&self.line, start..end)
        } else {
            self.strings.alloc(&self.line[start..end])
        };
        self.cursor = end + 1;
        self.push(Val::String(s))
    }

    pub(super) fn for_loop(&mut self) -> Result<()> {
        let end = self.expression.pop_number()?;
        let start = self.expression.pop_number()?;
        let var = self.expression.pop_varref()?;
        let step = if end >= start {
            number::from_int(1)
        } else {
            number::from_int(-1)
        };
        let resume = self.listing.next_line(self.line_number);
        self.subroutine.push_frame(Frame::Loop {
            var,
            resume,
            start,
            end,
            step,
        })?;
        self.var.store_number(var, start)
    }

    pub(super) fn step_loop(&mut self) -> Result<()> {
        let zero = number::from_int(0);
        if !matches!(self.subroutine.last(), Some(Frame::Loop { .. })) {
            return Err(Fault::StepWithoutFor.into());
        }
        let new_step = self.expression.pop_number()?;
        if let Some(Frame::Loop {
            start, end, step, ..
        }) = self.subroutine.last_mut()
        {
            if new_step == zero {
                return Err(error!(IllegalQuantity).into());
            }
            if start != end && (*end > *start) != (new_step > zero) {
                return Err(error!(IllegalQuantity).into());
            }
            *step = new_step;
        }
        Ok(())
    }

    /// NEXT with a variable (or a number when NEXT names none).
    pub(super) fn next_loop(&mut self) -> Result<()> {
        let target = match self.expression.pop()? {
            Val::VarRef(var) => Target::Loop(Some(var)),
            Val::Number(_) => Target::Loop(None),
            Val::String(_) => return Err(Fault::NextOperand.into()),
        };
        let (var, resume, end, step) = match self.subroutine.pop_nearest(target, false) {
            Some(Frame::Loop {
                var,
                resume,
                end,
                step,
                ..
            }) => (var, resume, end, step),
            _ => return Err(error!(NextWithoutFor).into()),
        };
        let value: Number = Operation::sum(self.var.fetch_number(var)?, step)?;
        let finished = if step < number::from_int(0) {
            value < end
        } else {
            value > end
        };
        if finished {
            self.subroutine.pop()?;
            return self.next_statement();
        }
        self.var.store_number(var, value)?;
        match resume {
            Some(line_number) => self.goto_line(line_number),
            None => Err(error!(MissingLine).into()),
        }
    }

    /// DATA mode swaps the execution cursor for the READ cursor.
    pub(super) fn data_mode(&mut self, mode: u8) -> Result<()> {
        match mode {
            0 | 2 => {
                if self.saved.is_none() {
                    return Err(Fault::DataModeExit.into());
                }
                self.exit_data_mode();
                if mode == 2 {
                    return Err(error!(OutOfData).into());
                }
                Ok(())
            }
            1 => {
                if self.saved.is_some() {
                    return Err(Fault::NestedDataMode.into());
                }
                let (line_number, cursor) = match self.data {
                    Some(position) => position,
                    None => match self.listing.first() {
                        Some(first) => (first, 0),
                        None => return Err(error!(OutOfData).into()),
                    },
                };
                let saved = (self.line_number, self.cursor);
                self.restore_line(line_number, cursor)?;
                self.saved = Some(saved);
                Ok(())
            }
            3 => {
                if self.saved.is_some() {
                    return Err(Fault::DataModeReset.into());
                }
                self.data = None;
                Ok(())
            }
            _ => Err(Fault::DataModeOperand.into()),
        }
    }

    pub(super) fn exit_data_mode(&mut self) {
        if let Some((line_number, cursor)) = self.saved.take() {
            self.data = Some((self.line_number, self.cursor));
            if self.restore_line(line_number, cursor).is_err() {
                self.direct_mode(0);
            }
        }
    }

    /// READ one DATA item into the variable on the stack.
    pub(super) fn data_store(&mut self) -> Result<()> {
        let var = self.expression.pop_varref()?;
        self.skip_whitespace();
        let line = self.line.clone();
        let start = self.cursor;
        let mut item = start;
        let mut quotes = 0;
        let mut i = start;
        loop {
            match line.get(i).copied().unwrap_or(b'\n') {
                b'"' => {
                    if quotes >= 2 || (quotes == 0 && i != start) {
                        return Err(error!(Syntax).into());
                    }
                    if quotes == 0 {
                        item += 1;
                    }
                    quotes += 1;
                }
                b',' if quotes != 1 => break,
                b'\n' if quotes == 1 => return Err(error!(Syntax).into()),
                b'\n' => break,
                _ => {}
            }
            i += 1;
        }
        self.cursor = i;
        let mut end = i.max(item);
        while end > item && matches!(line[end - 1], b' ' | b'\t') {
            end -= 1;
        }
        if quotes > 0 && end > item && line[end - 1] == b'"' {
            end -= 1;
        }
        let value = match var.kind() {
            Kind::Number => {
                if quotes > 0 {
                    return Err(error!(WrongValueType).into());
                }
                match number::parse(&line[item..end], true) {
                    Ok(Some((n, len))) if len == end - item => Val::Number(n),
                    Ok(Some(_)) => return Err(error!(WrongValueType).into()),
                    _ => return Err(error!(IllegalQuantity).into()),
                }
            }
            Kind::String if self.line_number != 0 => {
                Val::String(self.strings.alias(&line, item..end))
            }
            Kind::String => Val::String(self.strings.alloc(&line[item..end])),
        };
        self.var.store(var, value)
    }

    /// Subscripts sit above the array's variable reference. Returns the
    /// variable and the subscripts, deepest first.
    fn subscripts(&self) -> Result<(VarRef, Vec<i32>)> {
        let mut subscripts = vec![];
        let mut depth = 0;
        loop {
            match self.expression.peek(depth) {
                Some(Val::Number(n)) => {
                    let n = number::to_int(*n)?;
                    if n < 0 {
                        return Err(error!(IllegalQuantity).into());
                    }
                    subscripts.push(n);
                }
                Some(Val::VarRef(var)) => {
                    if subscripts.is_empty() {
                        return Err(error!(BadSubscript).into());
                    }
                    subscripts.reverse();
                    return Ok((*var, subscripts));
                }
                Some(Val::String(_)) => return Err(error!(WrongValueType).into()),
                None => return Err(Fault::BadDimension.into()),
            }
            depth += 1;
        }
    }

    pub(super) fn dimension(&mut self) -> Result<()> {
        let (var, max) = self.subscripts()?;
        self.var.dimension(var, &max, &self.strings.empty())?;
        self.expression.pop_n(max.len() + 1)?;
        Ok(())
    }

    pub(super) fn array_element(&mut self) -> Result<()> {
        let (var, subscripts) = self.subscripts()?;
        let element = self
            .var
            .element(var, &subscripts, &self.strings.empty())?;
        self.expression.pop_n(subscripts.len() + 1)?;
        self.push(Val::VarRef(element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mach::{Image, MemoryHost, Opcode};

    fn runtime(line: &str) -> Runtime<MemoryHost> {
        let image = Image::new(vec![Opcode::FIN as u8], 0, 0).unwrap();
        let mut r = Runtime::new(MemoryHost::new(), image);
        let mut text = line.as_bytes().to_vec();
        text.push(b'\n');
        r.direct_line = text.into();
        r.line = r.direct_line.clone();
        r
    }

    #[test]
    fn test_parse_line_number() {
        let mut r = runtime("  120 PRINT");
        assert_eq!(r.parse_line_number(false).unwrap(), Some(120));
        assert_eq!(r.cursor, 2);
        assert_eq!(r.parse_line_number(true).unwrap(), Some(120));
        assert_eq!(r.cursor, 5);
        let mut r = runtime("-5");
        assert_eq!(r.parse_line_number(true).unwrap(), None);
        let mut r = runtime("99999999999");
        assert!(r.parse_line_number(true).is_err());
    }

    #[test]
    fn test_data_items() {
        let mut r = runtime(r#" "A,B"  , 12 ,X Y  "#);
        let a = VarRef::scalar(Kind::String, 0);
        let n = VarRef::scalar(Kind::Number, 13);
        for (var, expect) in [(a, "A,B"), (n, "12"), (a, "X Y")] {
            r.expression.push(Val::VarRef(var)).unwrap();
            r.data_store().unwrap();
            assert_eq!(r.var.fetch(var).unwrap().to_string(), expect);
            if r.peek(0) == b',' {
                r.cursor += 1;
            }
        }
        assert_eq!(r.peek(0), b'\n');
    }

    #[test]
    fn test_data_item_errors() {
        let n = VarRef::scalar(Kind::Number, 13);
        for (text, message) in [
            (r#""12""#, "WRONG VALUE TYPE ERROR"),
            ("12X", "WRONG VALUE TYPE ERROR"),
            ("X", "ILLEGAL QUANTITY ERROR"),
            (r#"1"2""#, "SYNTAX ERROR"),
        ] {
            let mut r = runtime(text);
            r.expression.push(Val::VarRef(n)).unwrap();
            match r.data_store() {
                Err(crate::mach::Exception::Recoverable(e)) => {
                    assert_eq!(e.to_string(), message, "{}", text)
                }
                other => panic!("{}: {:?}", text, other),
            }
        }
    }
}
