use std::io::{self, Write};

use console::style;

pub fn info(message: &str) {
    let _ = writeln!(io::stderr(), "{}", message);
}

pub fn warn(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).yellow());
}

pub fn error(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).red());
}

pub fn status(label: &str, message: &str) {
    let _ = writeln!(io::stderr(), "{} {}", style(label).cyan(), message);
}

pub fn disable_colors() {
    console::set_colors_enabled(false);
    console::set_colors_enabled_stderr(false);
}

/// How chatty stderr reporting should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verbosity {
    pub quiet: bool,
    pub verbose: u8,
}

impl Verbosity {
    pub fn shows_info(&self) -> bool {
        !self.quiet
    }

    pub fn shows_detail(&self) -> bool {
        !self.quiet && self.verbose > 0
    }
}
