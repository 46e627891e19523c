extern crate ansi_term;
extern crate chrono;
extern crate ctrlc;
extern crate linefeed;
use ansi_term::Style;
use basic::mach::{FileHandle, Host, Input, Mode, Runtime};
use linefeed::{DefaultTerminal, Interface, ReadResult, Signal};
use log::{debug, warn};
use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn main() {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");
    if let Err(error) = main_loop(interrupted) {
        eprintln!("{}", error);
    }
}

fn main_loop(interrupted: Arc<AtomicBool>) -> std::io::Result<()> {
    let interface = Interface::new("BASIC")?;
    interface.set_report_signal(Signal::Interrupt, true);
    interface.write_fmt(format_args!(
        "{}\n",
        Style::new()
            .bold()
            .paint(format!("TINY BASIC VM, VERSION {}", env!("CARGO_PKG_VERSION")))
    ))?;
    let mut terminal = Terminal::new(interface, interrupted);
    if let Some(filename) = std::env::args().nth(1) {
        terminal.queue(format!("LOAD \"{}\"", filename));
        terminal.queue("RUN".to_string());
    }
    let mut runtime = match Runtime::basic(terminal) {
        Ok(runtime) => runtime,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            return Ok(());
        }
    };
    let result = runtime.exec();
    let terminal = runtime.host_mut();
    terminal.flush();
    if result.is_err() {
        terminal.interface.write_fmt(format_args!(
            "{}\n",
            Style::new()
                .bold()
                .paint("VIRTUAL MACHINE STOPPED.")
        ))?;
    }
    Ok(())
}

enum OpenFile {
    Read(BufReader<File>),
    Write(BufWriter<File>),
}

/// ## Terminal host
///
/// Console output is held until a newline so that whatever is pending
/// when input is wanted (`OK`, `? `, an INPUT prompt) becomes the
/// line editor's prompt.
struct Terminal {
    interface: Interface<DefaultTerminal>,
    interrupted: Arc<AtomicBool>,
    pending: Vec<u8>,
    input: VecDeque<u8>,
    queued: VecDeque<String>,
    files: HashMap<u32, OpenFile>,
    next_handle: u32,
}

impl Terminal {
    fn new(interface: Interface<DefaultTerminal>, interrupted: Arc<AtomicBool>) -> Terminal {
        Terminal {
            interface,
            interrupted,
            pending: vec![],
            input: VecDeque::new(),
            queued: VecDeque::new(),
            files: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Lines typed on the user's behalf before the keyboard is read.
    fn queue(&mut self, line: String) {
        self.queued.push_back(line);
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        if let Err(error) = self.interface.write_fmt(format_args!("{}", text)) {
            warn!("console: {}", error);
        }
    }

    fn read_console_line(&mut self) -> Input {
        let prompt = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        if let Some(line) = self.queued.pop_front() {
            if let Err(error) = self.interface.write_fmt(format_args!("{}{}\n", prompt, line)) {
                warn!("console: {}", error);
            }
            self.input.extend(line.bytes());
            self.input.push_back(b'\n');
            return Input::Byte(self.input.pop_front().unwrap_or(b'\n'));
        }
        if let Err(error) = self.interface.set_prompt(&prompt) {
            warn!("console: {}", error);
        }
        match self.interface.read_line() {
            Ok(ReadResult::Input(line)) => {
                if !line.trim().is_empty() {
                    self.interface.add_history_unique(line.clone());
                }
                self.input.extend(line.bytes());
                self.input.push_back(b'\n');
                Input::Byte(self.input.pop_front().unwrap_or(b'\n'))
            }
            Ok(ReadResult::Signal(Signal::Interrupt)) => {
                self.interrupted.store(true, Ordering::SeqCst);
                Input::Break
            }
            Ok(_) => Input::Eof,
            Err(error) => {
                warn!("console: {}", error);
                Input::Eof
            }
        }
    }
}

impl Host for Terminal {
    fn open_file(&mut self, name: &[u8], mode: Mode) -> Option<FileHandle> {
        let path = String::from_utf8_lossy(name).into_owned();
        let file = match mode {
            Mode::Read => File::open(&path).map(|f| OpenFile::Read(BufReader::new(f))),
            Mode::Write => File::create(&path).map(|f| OpenFile::Write(BufWriter::new(f))),
        };
        match file {
            Ok(file) => {
                self.next_handle += 1;
                self.files.insert(self.next_handle, file);
                debug!("opened {} as {}", path, self.next_handle);
                Some(FileHandle(self.next_handle))
            }
            Err(error) => {
                debug!("{}: {}", path, error);
                None
            }
        }
    }

    fn close_file(&mut self, file: FileHandle) {
        if let Some(OpenFile::Write(mut writer)) = self.files.remove(&file.0) {
            if let Err(error) = writer.flush() {
                warn!("close: {}", error);
            }
        }
    }

    fn getchar(&mut self, file: FileHandle) -> Input {
        if file.is_console() {
            return match self.input.pop_front() {
                Some(ch) => Input::Byte(ch),
                None => self.read_console_line(),
            };
        }
        let reader = match self.files.get_mut(&file.0) {
            Some(OpenFile::Read(reader)) => reader,
            _ => return Input::Eof,
        };
        let mut byte = [0u8; 1];
        loop {
            match reader.read(&mut byte) {
                Ok(0) => return Input::Eof,
                Ok(_) if byte[0] == b'\r' => continue,
                Ok(_) => return Input::Byte(byte[0]),
                Err(error) => {
                    warn!("read: {}", error);
                    return Input::Eof;
                }
            }
        }
    }

    fn putchar(&mut self, file: FileHandle, ch: u8) {
        if file.is_console() {
            self.pending.push(ch);
            if ch == b'\n' {
                self.flush();
            }
            return;
        }
        if let Some(OpenFile::Write(writer)) = self.files.get_mut(&file.0) {
            if let Err(error) = writer.write_all(&[ch]) {
                warn!("write: {}", error);
            }
        }
    }

    fn check_break(&mut self, file: FileHandle) -> bool {
        file.is_console() && self.interrupted.swap(false, Ordering::SeqCst)
    }

    fn wall_clock(&mut self) -> Option<u64> {
        u64::try_from(chrono::Utc::now().timestamp()).ok()
    }
}
