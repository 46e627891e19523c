use crate::mach::{Fault, Image, Opcode, Operand};
use std::collections::HashMap;

/// ## Bytecode assembler
///
/// Source is one instruction per line:
///
/// ```text
/// LABEL:  MNEMONIC OPERAND   ; comment
/// ```
///
/// A label names the address of the next instruction. Operands are a
/// literal byte (`LIT 12`), a label (`JMP LOOP`) or a label and a
/// quoted token (`TST NEXT,'PRINT'`). The labels `CO` and `XEC` mark
/// the line collector and the statement executor.

pub const COLLECTOR: &str = "CO";
pub const EXECUTOR: &str = "XEC";

const MAX_CODE: usize = 0x10000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AsmError {
    #[error("line {0}: unknown mnemonic `{1}`")]
    UnknownMnemonic(usize, String),
    #[error("line {0}: wrong operand for {1}")]
    Operand(usize, Opcode),
    #[error("line {0}: invalid number")]
    Literal(usize),
    #[error("line {0}: invalid string")]
    Token(usize),
    #[error("line {0}: duplicate label `{1}`")]
    DuplicateLabel(usize, String),
    #[error("line {0}: undefined label `{1}`")]
    UndefinedLabel(usize, String),
    #[error("missing label `{0}`")]
    MissingEntry(&'static str),
    #[error("program too large")]
    TooLarge,
    #[error("{0}")]
    Image(Fault),
}

struct Fixup {
    name: String,
    at: usize,
    line: usize,
}

#[derive(Default)]
struct Assembler {
    code: Vec<u8>,
    labels: HashMap<String, usize>,
    fixups: Vec<Fixup>,
    errors: Vec<AsmError>,
}

pub fn assemble(source: &str) -> Result<Image, Vec<AsmError>> {
    let mut asm = Assembler::default();
    for (index, text) in source.lines().enumerate() {
        if let Err(error) = asm.add_line(index + 1, text) {
            asm.errors.push(error);
        }
    }
    asm.finish()
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// Cut the comment, but not a `;` inside a quoted token.
fn strip_comment(text: &str) -> &str {
    let mut quoted = false;
    for (i, c) in text.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            ';' if !quoted => return &text[..i],
            _ => {}
        }
    }
    text
}

impl Assembler {
    fn add_line(&mut self, line: usize, text: &str) -> Result<(), AsmError> {
        let mut rest = strip_comment(text).trim();
        while let Some((label, after)) = rest.split_once(':') {
            if !is_identifier(label) {
                break;
            }
            if self.labels.contains_key(label) {
                return Err(AsmError::DuplicateLabel(line, label.to_string()));
            }
            self.labels.insert(label.to_string(), self.code.len());
            rest = after.trim();
        }
        if rest.is_empty() {
            return Ok(());
        }
        let (mnemonic, operand) = match rest.split_once(|c: char| c == ' ' || c == '\t') {
            Some((mnemonic, operand)) => (mnemonic, operand.trim()),
            None => (rest, ""),
        };
        let opcode = Opcode::from_mnemonic(mnemonic)
            .ok_or_else(|| AsmError::UnknownMnemonic(line, mnemonic.to_string()))?;
        let start = self.code.len();
        self.code.push(opcode as u8);
        let result = self.operand(line, opcode, operand);
        if result.is_err() {
            self.code.truncate(start);
            self.fixups.retain(|fixup| fixup.at < start);
        }
        result
    }

    fn operand(&mut self, line: usize, opcode: Opcode, operand: &str) -> Result<(), AsmError> {
        match opcode.operand() {
            Operand::None if operand.is_empty() => Ok(()),
            Operand::Number => {
                if operand.is_empty() || !operand.bytes().all(|c| c.is_ascii_digit()) {
                    return Err(AsmError::Operand(line, opcode));
                }
                let n: u8 = operand.parse().map_err(|_| AsmError::Literal(line))?;
                self.code.push(n);
                Ok(())
            }
            Operand::Label => self.label(line, opcode, operand),
            Operand::LabelString => {
                let (label, token) = operand
                    .split_once(',')
                    .ok_or(AsmError::Operand(line, opcode))?;
                self.label(line, opcode, label.trim())?;
                self.token(line, token.trim())
            }
            Operand::None => Err(AsmError::Operand(line, opcode)),
        }
    }

    fn label(&mut self, line: usize, opcode: Opcode, name: &str) -> Result<(), AsmError> {
        if !is_identifier(name) {
            return Err(AsmError::Operand(line, opcode));
        }
        self.fixups.push(Fixup {
            name: name.to_string(),
            at: self.code.len(),
            line,
        });
        self.code.extend_from_slice(&[0, 0]);
        Ok(())
    }

    fn token(&mut self, line: usize, quoted: &str) -> Result<(), AsmError> {
        let token = quoted
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .ok_or(AsmError::Token(line))?;
        if token.is_empty() || !token.bytes().all(|c| c.is_ascii() && c != b'\'') {
            return Err(AsmError::Token(line));
        }
        self.code.extend_from_slice(token.as_bytes());
        if let Some(last) = self.code.last_mut() {
            *last |= 0x80;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Image, Vec<AsmError>> {
        if self.code.len() > MAX_CODE {
            self.errors.push(AsmError::TooLarge);
        }
        for fixup in self.fixups.iter() {
            match self.labels.get(&fixup.name) {
                Some(&addr) => {
                    let bytes = (addr as u16).to_le_bytes();
                    self.code[fixup.at..fixup.at + 2].copy_from_slice(&bytes);
                }
                None => self
                    .errors
                    .push(AsmError::UndefinedLabel(fixup.line, fixup.name.clone())),
            }
        }
        let collector = self.labels.get(COLLECTOR).copied();
        let executor = self.labels.get(EXECUTOR).copied();
        if collector.is_none() {
            self.errors.push(AsmError::MissingEntry(COLLECTOR));
        }
        if executor.is_none() {
            self.errors.push(AsmError::MissingEntry(EXECUTOR));
        }
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        match (collector, executor) {
            (Some(collector), Some(executor)) => {
                Image::new(self.code, collector, executor).map_err(|f| vec![AsmError::Image(f)])
            }
            _ => Err(self.errors),
        }
    }
}
