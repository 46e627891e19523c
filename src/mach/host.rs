use std::collections::{HashMap, VecDeque};

/// ## Host callbacks
///
/// Everything the machine needs from the outside world goes through
/// this trait: character I/O, break polling, the clock and floating
/// point exception status.

pub trait Host {
    fn open_file(&mut self, name: &[u8], mode: Mode) -> Option<FileHandle>;
    fn close_file(&mut self, file: FileHandle);
    fn getchar(&mut self, file: FileHandle) -> Input;
    fn putchar(&mut self, file: FileHandle, ch: u8);

    /// Has an interrupt been requested? Only the console is ever
    /// interrupted.
    fn check_break(&mut self, file: FileHandle) -> bool;

    /// Seconds since the epoch.
    fn wall_clock(&mut self) -> Option<u64> {
        None
    }

    /// Exceptions raised since the last call. Reading clears them.
    fn math_exception(&mut self) -> MathException {
        MathException::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileHandle(pub u32);

impl FileHandle {
    pub const CONSOLE: FileHandle = FileHandle(0);

    pub fn is_console(self) -> bool {
        self == FileHandle::CONSOLE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Byte(u8),
    Eof,
    Break,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MathException {
    pub divide_by_zero: bool,
    pub arithmetic: bool,
}

/// ## In-memory host
///
/// Console input is a queue of bytes, console output is captured, and
/// files live in a map. Handy for embedding and for tests.

#[derive(Debug, Default)]
pub struct MemoryHost {
    input: VecDeque<u8>,
    output: Vec<u8>,
    files: HashMap<Vec<u8>, Vec<u8>>,
    open: HashMap<u32, OpenFile>,
    next_handle: u32,
    break_after: Option<u64>,
    polls: u64,
    clock: Option<u64>,
}

#[derive(Debug)]
struct OpenFile {
    name: Vec<u8>,
    mode: Mode,
    cursor: usize,
}

impl MemoryHost {
    pub fn new() -> MemoryHost {
        MemoryHost::default()
    }

    /// Queue a line of console input. The newline is added.
    pub fn type_line(&mut self, line: &str) {
        self.input.extend(line.bytes());
        self.input.push_back(b'\n');
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn take_output(&mut self) -> String {
        let s = self.output();
        self.output.clear();
        s
    }

    pub fn file(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name.as_bytes()).map(|f| f.as_slice())
    }

    pub fn set_file(&mut self, name: &str, contents: &str) {
        self.files
            .insert(name.as_bytes().to_vec(), contents.as_bytes().to_vec());
    }

    /// Deliver one interrupt on the given console poll.
    pub fn interrupt_after(&mut self, polls: u64) {
        self.break_after = Some(self.polls + polls);
    }

    pub fn set_clock(&mut self, seconds: u64) {
        self.clock = Some(seconds);
    }
}

impl Host for MemoryHost {
    fn open_file(&mut self, name: &[u8], mode: Mode) -> Option<FileHandle> {
        match mode {
            Mode::Read if !self.files.contains_key(name) => return None,
            Mode::Write => {
                self.files.insert(name.to_vec(), vec![]);
            }
            Mode::Read => {}
        }
        self.next_handle += 1;
        let handle = self.next_handle;
        self.open.insert(
            handle,
            OpenFile {
                name: name.to_vec(),
                mode,
                cursor: 0,
            },
        );
        Some(FileHandle(handle))
    }

    fn close_file(&mut self, file: FileHandle) {
        self.open.remove(&file.0);
    }

    fn getchar(&mut self, file: FileHandle) -> Input {
        if file.is_console() {
            return match self.input.pop_front() {
                Some(ch) => Input::Byte(ch),
                None => Input::Eof,
            };
        }
        let open = match self.open.get_mut(&file.0) {
            Some(open) if open.mode == Mode::Read => open,
            _ => return Input::Eof,
        };
        match self.files.get(&open.name).and_then(|f| f.get(open.cursor)) {
            Some(&ch) => {
                open.cursor += 1;
                Input::Byte(ch)
            }
            None => Input::Eof,
        }
    }

    fn putchar(&mut self, file: FileHandle, ch: u8) {
        if file.is_console() {
            self.output.push(ch);
            return;
        }
        if let Some(open) = self.open.get(&file.0) {
            if open.mode == Mode::Write {
                if let Some(contents) = self.files.get_mut(&open.name) {
                    contents.push(ch);
                }
            }
        }
    }

    fn check_break(&mut self, file: FileHandle) -> bool {
        if !file.is_console() {
            return false;
        }
        self.polls += 1;
        if self.break_after == Some(self.polls) {
            self.break_after = None;
            return true;
        }
        false
    }

    fn wall_clock(&mut self) -> Option<u64> {
        self.clock
    }
}
