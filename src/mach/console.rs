use super::number;
use super::runtime::Result;
use super::{Fault, FileHandle, Host, Input, Kind, Mode, Runtime, Val};
use super::{MAX_LINE_LEN, TAB_WIDTH};
use crate::error;
use crate::lang::LineNumber;
use log::debug;

/// ## Console and program files
///
/// Output goes to `cons_file`, which is the console except while a
/// program is being saved. Input comes from the console or, during
/// LOAD, from the program file.

impl<H: Host> Runtime<H> {
    pub(super) fn putchar(&mut self, ch: u8) {
        match ch {
            b'\n' => {
                self.host.putchar(self.cons_file, ch);
                self.cons_column = 0;
            }
            b'\t' => loop {
                self.host.putchar(self.cons_file, b' ');
                self.cons_column += 1;
                if self.cons_column % TAB_WIDTH == 0 {
                    break;
                }
            },
            _ => {
                self.host.putchar(self.cons_file, ch);
                self.cons_column += 1;
            }
        }
    }

    pub(super) fn print(&mut self, bytes: &[u8]) {
        for &ch in bytes {
            self.putchar(ch);
        }
    }

    pub(super) fn print_str(&mut self, s: &str) {
        self.print(s.as_bytes());
    }

    pub(super) fn print_break(&mut self) {
        self.print_str("\nBREAK\n");
    }

    /// Print a quoted literal straight from the line.
    pub(super) fn print_literal(&mut self) -> Result<()> {
        loop {
            let ch = self.peek(0);
            match ch {
                b'\n' => return Err(error!(Syntax).into()),
                b'"' => {
                    self.cursor += 1;
                    return Ok(());
                }
                _ => {
                    self.cursor += 1;
                    self.putchar(ch);
                }
            }
        }
    }

    pub(super) fn print_value(&mut self) -> Result<()> {
        match self.expression.pop()? {
            Val::Number(n) => self.print_str(&number::format(n)),
            Val::String(s) => {
                let bytes = s.to_vec();
                self.print(&bytes);
            }
            Val::VarRef(_) => return Err(Fault::NoPrinter.into()),
        }
        Ok(())
    }

    pub(super) fn list(&mut self, first: LineNumber, last: LineNumber) -> Result<()> {
        for line in self.listing.list(first, last)? {
            self.print(&line);
        }
        Ok(())
    }

    /// Column positioning for TAB (mode 1) and SPC (mode 0). Leaves an
    /// empty string for PRINT to print.
    pub(super) fn advance_cursor(&mut self, mode: u8) -> Result<()> {
        let n = number::to_int(self.expression.pop_number()?)?;
        if n < 0 {
            return Err(error!(IllegalQuantity).into());
        }
        let spaces = match mode {
            1 => (n as usize).saturating_sub(self.cons_column),
            _ => n as usize,
        };
        for _ in 0..spaces {
            self.putchar(b' ');
        }
        let empty = self.strings.empty();
        self.push(Val::String(empty))
    }

    /// Collect the next direct line from the console or program file.
    /// Lowercase letters outside quotes are folded to uppercase.
    pub(super) fn get_line(&mut self) -> Result<()> {
        self.line = self.direct_line.clone();
        self.cursor = 0;
        if !self.suppress_prompt && self.prog_file.is_none() {
            self.print_str("OK\n");
        }
        self.suppress_prompt = false;
        let mut buf: Vec<u8> = Vec::with_capacity(MAX_LINE_LEN);
        let mut quoted = false;
        loop {
            if self.host.check_break(self.cons_file) {
                self.print_break();
                self.control.clear();
                self.subroutine.clear();
                self.expression.clear();
                buf.clear();
                quoted = false;
                continue;
            }
            let mut ch = match self.host.getchar(self.cons_file) {
                Input::Byte(ch) => ch,
                Input::Break => continue,
                Input::Eof => {
                    if self.cons_file.is_console() {
                        self.disconnect();
                    } else {
                        self.prog_file_fini();
                    }
                    return Ok(());
                }
            };
            if ch == b'\n' {
                if self.cons_file.is_console() {
                    self.cons_column = 0;
                }
                break;
            }
            if buf.len() >= MAX_LINE_LEN - 1 {
                self.line_too_long();
                buf.clear();
                quoted = false;
                continue;
            }
            if ch == b'"' {
                quoted = !quoted;
            } else if !quoted {
                ch = ch.to_ascii_uppercase();
            }
            buf.push(ch);
        }
        buf.push(b'\n');
        self.direct_line = buf.into();
        self.line = self.direct_line.clone();
        Ok(())
    }

    fn disconnect(&mut self) {
        debug!("console disconnected");
        self.print_str("\nINPUT DISCONNECTED. GOODBYE.\n");
        self.running = false;
    }

    fn line_too_long(&mut self) {
        self.print_str("\n?INPUT LINE TOO LONG\n");
    }

    /// A line typed in answer to INPUT. `None` if the statement was
    /// interrupted or the console went away.
    fn read_input(&mut self) -> Option<Vec<u8>> {
        let mut buf = vec![];
        loop {
            if self.host.check_break(self.cons_file) {
                self.print_break();
                self.direct_mode(0);
                return None;
            }
            match self.host.getchar(self.cons_file) {
                Input::Byte(b'\n') => {
                    self.cons_column = 0;
                    return Some(buf);
                }
                Input::Byte(ch) => {
                    if buf.len() >= MAX_LINE_LEN - 1 {
                        self.line_too_long();
                        buf.clear();
                        continue;
                    }
                    buf.push(ch);
                }
                Input::Break => continue,
                Input::Eof => {
                    if self.cons_file.is_console() {
                        self.disconnect();
                    }
                    return None;
                }
            }
        }
    }

    fn redo(&mut self) {
        self.print_str("?REDO\n");
    }

    /// INPUT for a number with a bare `? ` prompt.
    pub(super) fn input_number(&mut self) -> Result<()> {
        loop {
            self.print_str("? ");
            let text = match self.read_input() {
                Some(text) => text,
                None => return Ok(()),
            };
            match parse_input_number(&text) {
                Some(n) => return self.push_number(n),
                None => self.redo(),
            }
        }
    }

    /// INPUT into the variable on top of the stack. The prompt count
    /// below it says how many `?` to print, and is left for the next
    /// variable.
    pub(super) fn input_variable(&mut self) -> Result<()> {
        let var = self.expression.pop_varref()?;
        let prompts = number::to_int(self.expression.pop_number()?)?;
        let value = loop {
            if prompts > 0 {
                let prompt = "?".repeat(prompts as usize) + " ";
                self.print_str(&prompt);
            }
            let text = match self.read_input() {
                Some(text) => text,
                None => return Ok(()),
            };
            let value = match var.kind() {
                Kind::Number => parse_input_number(&text).map(Val::Number),
                Kind::String => {
                    parse_input_string(&text).map(|s| Val::String(self.strings.alloc(s)))
                }
            };
            match value {
                Some(value) => break value,
                None => self.redo(),
            }
        };
        self.var.store(var, value)?;
        self.push_number(number::from_int(prompts))
    }

    /// The file name for LOAD and SAVE. The number zero means the name
    /// used last time.
    fn program_file_name(&mut self) -> Result<Vec<u8>> {
        let name = match self.expression.pop()? {
            Val::Number(n) if n == number::from_int(0) => self.prog_file_name.clone(),
            Val::String(s) => {
                let name = self.strings.terminate(&s).to_vec();
                self.prog_file_name = Some(name.clone());
                Some(name)
            }
            _ => None,
        };
        name.ok_or_else(|| error!(FileNotFound).into())
    }

    /// LOAD replaces the program and then reads lines from the file as
    /// if they were typed at the console.
    pub(super) fn load_program(&mut self) -> Result<()> {
        let name = self.program_file_name()?;
        let file = match self.host.open_file(&name, Mode::Read) {
            Some(file) => file,
            None => return Err(error!(FileNotFound).into()),
        };
        debug!("loading {}", String::from_utf8_lossy(&name));
        self.listing.clear();
        self.strings.invalidate_statics();
        self.var.clear(&self.strings.empty());
        self.data = None;
        self.cons_file = file;
        self.prog_file = Some(file);
        self.direct_mode(0);
        Ok(())
    }

    pub(super) fn save_program(&mut self) -> Result<()> {
        let name = self.program_file_name()?;
        let file = match self.host.open_file(&name, Mode::Write) {
            Some(file) => file,
            None => return Err(error!(FileNotFound).into()),
        };
        debug!("saving {}", String::from_utf8_lossy(&name));
        let column = self.cons_column;
        self.cons_file = file;
        self.cons_column = 0;
        let listed = self.list(0, 0);
        self.cons_file = FileHandle::CONSOLE;
        self.cons_column = column;
        self.host.close_file(file);
        listed?;
        self.direct_mode(0);
        Ok(())
    }

    /// Finish a LOAD and go back to the console.
    pub(super) fn prog_file_fini(&mut self) {
        if let Some(file) = self.prog_file.take() {
            debug!("closing program file");
            self.host.close_file(file);
        }
        self.cons_file = FileHandle::CONSOLE;
        self.suppress_prompt = false;
        self.direct_mode(0);
    }
}

fn skip_whitespace(text: &[u8], mut pos: usize) -> usize {
    while matches!(text.get(pos), Some(b' ') | Some(b'\t')) {
        pos += 1;
    }
    pos
}

/// A signed number with nothing else on the line.
fn parse_input_number(text: &[u8]) -> Option<number::Number> {
    let pos = skip_whitespace(text, 0);
    if matches!(text.get(pos), Some(b'+') | Some(b'-'))
        && !text.get(pos + 1).map_or(false, |c| c.is_ascii_digit())
    {
        return None;
    }
    let (n, len) = number::parse(&text[pos..], true).ok()??;
    if skip_whitespace(text, pos + len) != text.len() {
        return None;
    }
    Some(n)
}

/// Leading blanks are dropped. A quoted answer may only be followed by
/// blanks; an unquoted one runs to the end of the line.
fn parse_input_string(text: &[u8]) -> Option<&[u8]> {
    let pos = skip_whitespace(text, 0);
    if text.get(pos) != Some(&b'"') {
        return Some(&text[pos..]);
    }
    let start = pos + 1;
    let end = start + text[start..].iter().position(|&c| c == b'"')?;
    if skip_whitespace(text, end + 1) != text.len() {
        return None;
    }
    Some(&text[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mach::number::from_int;

    #[test]
    fn test_input_number() {
        assert_eq!(parse_input_number(b"  42  "), Some(from_int(42)));
        assert_eq!(parse_input_number(b"-7"), Some(from_int(-7)));
        assert_eq!(parse_input_number(b"- 7"), None);
        assert_eq!(parse_input_number(b"42X"), None);
        assert_eq!(parse_input_number(b""), None);
    }

    #[test]
    fn test_input_string() {
        assert_eq!(parse_input_string(b"  HELLO, WORLD "), Some(&b"HELLO, WORLD "[..]));
        assert_eq!(parse_input_string(b" \"A, B\"  "), Some(&b"A, B"[..]));
        assert_eq!(parse_input_string(b"\"A\" B"), None);
        assert_eq!(parse_input_string(b"\"A"), None);
        assert_eq!(parse_input_string(b""), Some(&b""[..]));
    }
}
