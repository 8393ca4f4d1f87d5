//! ANSI color helpers for terminal output, matching the small set of
//! wrapper functions the rest of the workspace's CLI uses instead of
//! pulling in a styling crate.

pub fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}

pub fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}

pub fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

pub fn gray(s: &str) -> String {
    format!("\x1b[90m{s}\x1b[0m")
}

pub fn status_label(label: &str) -> String {
    format!("\x1b[1;32m{label:>12}\x1b[0m")
}
