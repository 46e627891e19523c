#![allow(dead_code)]
use basic::mach::{MemoryHost, Runtime};

pub const GOODBYE: &str = "\nINPUT DISCONNECTED. GOODBYE.\n";

pub fn runtime(lines: &[&str]) -> Runtime<MemoryHost> {
    runtime_with(MemoryHost::new(), lines)
}

pub fn runtime_with(mut host: MemoryHost, lines: &[&str]) -> Runtime<MemoryHost> {
    for line in lines {
        host.type_line(line);
    }
    Runtime::basic(host).unwrap()
}

/// Everything printed, with `OK` prompts and the goodbye removed.
pub fn exec(lines: &[&str]) -> String {
    let mut r = runtime(lines);
    run(&mut r)
}

pub fn run(r: &mut Runtime<MemoryHost>) -> String {
    r.exec().unwrap();
    tidy(&r.host_mut().take_output())
}

pub fn tidy(output: &str) -> String {
    let output = output.strip_suffix(GOODBYE).unwrap_or(output);
    output
        .lines()
        .filter(|line| *line != "OK")
        .map(|line| format!("{}\n", line))
        .collect()
}
