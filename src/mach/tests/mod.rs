use crate::lang::assemble;
use crate::mach::{MemoryHost, Runtime};


const GOODBYE: &str = "\nINPUT DISCONNECTED. GOODBYE.\n";

/// A machine running a hand-written bytecode program.
fn machine(source: &str, input: &[&str]) -> Runtime<MemoryHost> {
    let image = assemble(source).unwrap();
    Runtime::new(host(input), image)
}

fn basic(input: &[&str]) -> Runtime<MemoryHost> {
    Runtime::basic(host(input)).unwrap()
}

fn host(input: &[&str]) -> MemoryHost {
    let mut host = MemoryHost::new();
    for line in input {
        host.type_line(line);
    }
    host
}

/// Run to the end of input. `OK` prompts and the goodbye are dropped.
fn run(runtime: &mut Runtime<MemoryHost>) -> String {
    runtime.exec().unwrap();
    let s = runtime.host_mut().take_output();
    let s = s.strip_suffix(GOODBYE).unwrap_or(&s);
    s.lines()
        .filter(|line| *line != "OK")
        .map(|line| format!("{}\n", line))
        .collect()
}
