//! Console I/O used for user-facing output and the debug prompt

use std::io::{self, BufRead, Write};

pub trait Console: Send + Sync {
    /// Write one line to standard output
    fn write_line(&self, line: &str);

    /// Read one line from standard input, line terminator included
    fn read_line(&self) -> io::Result<String>;
}

#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write_line(&self, line: &str) {
        // A closed stdout (e.g. `appget search x | head -1`) is not an error
        let _ = writeln!(io::stdout().lock(), "{}", line);
    }

    fn read_line(&self) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}
