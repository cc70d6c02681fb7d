//! Terminal stand-ins for the bubble display and the board delay

use std::io::Write;
use std::thread;
use std::time::Duration;

use cg35_core::traits::{Readout, ReadoutError};
use cg35_core::DisplayText;
use embedded_hal::delay::DelayNs;
use tracing::error;

/// Prints every display frame as `[<15 chars>]  <status>`
pub struct TerminalReadout<W: Write> {
    out: W,
    text: DisplayText,
    status: String,
}

impl<W: Write> TerminalReadout<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            text: DisplayText::blank(),
            status: String::new(),
        }
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self) -> Result<(), ReadoutError> {
        let result = if self.status.is_empty() {
            writeln!(self.out, "[{}]", self.text)
        } else {
            writeln!(self.out, "[{}]  {}", self.text, self.status)
        };
        result.and_then(|_| self.out.flush()).map_err(|err| {
            error!(%err, "terminal write failed");
            ReadoutError::Write
        })
    }
}

impl<W: Write> Readout for TerminalReadout<W> {
    fn show(&mut self, text: &DisplayText) -> Result<(), ReadoutError> {
        self.text = text.clone();
        self.print()
    }

    fn status(&mut self, text: &str, _hold: bool) -> Result<(), ReadoutError> {
        self.status.clear();
        self.status.push_str(text);
        self.print()
    }

    /// Takes effect with the next frame
    fn clear_status(&mut self) -> Result<(), ReadoutError> {
        self.status.clear();
        Ok(())
    }
}

/// Sleeping delay, or none at all in fast mode
pub struct HostDelay {
    enabled: bool,
}

impl HostDelay {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl DelayNs for HostDelay {
    fn delay_ns(&mut self, ns: u32) {
        if self.enabled {
            thread::sleep(Duration::from_nanos(u64::from(ns)));
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        if self.enabled {
            thread::sleep(Duration::from_millis(u64::from(ms)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(readout: TerminalReadout<Vec<u8>>) -> Vec<String> {
        String::from_utf8(readout.into_inner())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_frame_format() {
        let mut readout = TerminalReadout::new(Vec::new());
        readout.show(&DisplayText::compose(" 42.", "")).unwrap();
        readout.status("DivisionByZero", true).unwrap();
        readout.clear_status().unwrap();
        readout.show(&DisplayText::compose(" 43.", "")).unwrap();

        assert_eq!(
            lines(readout),
            [
                "[ 42.           ]",
                "[ 42.           ]  DivisionByZero",
                "[ 43.           ]",
            ]
        );
    }

    #[test]
    fn test_exponent_field() {
        let mut readout = TerminalReadout::new(Vec::new());
        readout.show(&DisplayText::compose("-1.5", " 10")).unwrap();
        readout.clear_status().unwrap();

        assert_eq!(lines(readout), ["[-1.5         10]"]);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure() {
        let mut readout = TerminalReadout::new(BrokenPipe);
        assert_eq!(
            readout.show(&DisplayText::blank()),
            Err(ReadoutError::Write)
        );
    }

    #[test]
    fn test_disabled_delay_returns_immediately() {
        let mut delay = HostDelay::new(false);
        let start = std::time::Instant::now();
        delay.delay_ms(5_000);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
