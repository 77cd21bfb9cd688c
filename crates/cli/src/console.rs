//! Line-oriented console I/O
//!
//! Generic over reader/writer so menus can be driven from tests.

use safebank_core::OtpChannel;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Prompting console over any buffered reader and writer
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a full line
    pub fn say(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    /// Show a prompt and read one trimmed line. EOF is an `UnexpectedEof` error.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    /// Read until `accept` returns a value, re-prompting with `retry_prompt`
    pub fn read_until<T, F>(&mut self, prompt: &str, retry_prompt: &str, accept: F) -> io::Result<T>
    where
        F: Fn(&str) -> Option<T>,
    {
        let mut line = self.read_line(prompt)?;
        loop {
            if let Some(value) = accept(&line) {
                return Ok(value);
            }
            line = self.read_line(retry_prompt)?;
        }
    }

    /// Read a value parsed with `FromStr`, re-prompting on malformed input
    pub fn read_parsed<T: FromStr>(&mut self, prompt: &str) -> io::Result<T> {
        self.read_until(prompt, "Invalid input! Re-enter: ", |s| s.parse().ok())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> OtpChannel for Console<R, W> {
    fn deliver(&mut self, code: u16) {
        if let Err(e) = self.say(format!("OTP sent: {}", code)) {
            tracing::error!(error = %e, "Failed to display OTP");
        }
    }

    fn response(&mut self) -> Option<u16> {
        self.read_line("Enter OTP: ").ok()?.parse().ok()
    }
}
