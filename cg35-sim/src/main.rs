//! CG-35 host simulator
//!
//! Runs the calculator engine behind a terminal: key tokens come from
//! `--keys` or stdin, every display frame is printed as a line.
//!
//! ```text
//! cg35-sim --keys "3 ENTER 4 + 5 ENTER 6 + *" --no-delay
//! echo "2 sqrt" | cg35-sim --stack
//! ```

mod config;
mod keypad;
mod terminal;

use std::io::{self, BufRead, Cursor, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use cg35_core::traits::Keypad;
use cg35_core::{Calculator, Presenter, Timing};
use clap::Parser;
use embedded_hal::delay::DelayNs;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use keypad::TokenKeypad;
use terminal::{HostDelay, TerminalReadout};

#[derive(Parser, Debug)]
#[command(name = "cg35-sim")]
#[command(about = "Terminal simulator for the CG-35 RPN calculator")]
struct Args {
    /// Configuration file (defaults to the built-in calculator.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Key tokens to press instead of reading stdin, e.g. "2 ENTER 3 +"
    #[arg(long)]
    keys: Option<String>,

    /// Log key handling and state transitions
    #[arg(short, long)]
    verbose: bool,

    /// Skip blink, status and banner delays
    #[arg(long)]
    no_delay: bool,

    /// Print the register dump after every key
    #[arg(long)]
    stack: bool,
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = config::load(args.config.as_deref())?;
    let mut calc = Calculator::new(&config).context("building calculator")?;

    let stdout = io::stdout();
    let mut presenter = Presenter::new(
        TerminalReadout::new(stdout.lock()),
        HostDelay::new(!args.no_delay),
        Timing::from(&config),
    );
    presenter
        .ready(calc.display())
        .context("showing startup banner")?;
    info!("calculator ready");

    let pressed = match args.keys {
        Some(keys) => run(
            &mut calc,
            &mut presenter,
            TokenKeypad::new(Cursor::new(keys)),
            args.stack,
        )?,
        None => run(
            &mut calc,
            &mut presenter,
            TokenKeypad::new(io::stdin().lock()),
            args.stack,
        )?,
    };
    debug!(pressed, "key source exhausted");
    Ok(())
}

/// Press keys until the keypad runs dry; returns the number pressed
fn run<B, W, D>(
    calc: &mut Calculator,
    presenter: &mut Presenter<TerminalReadout<W>, D>,
    mut keypad: TokenKeypad<B>,
    dump_stack: bool,
) -> Result<usize>
where
    B: BufRead,
    W: Write,
    D: DelayNs,
{
    let mut pressed = 0;
    while let Some(key) = keypad.next_key().context("reading keys")? {
        let response = calc.press(key);
        presenter.render(&response).context("updating display")?;
        if dump_stack {
            println!("{}", calc.registers());
        }
        pressed += 1;
    }
    Ok(pressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulate(keys: &str, dump_stack: bool) -> (usize, Vec<String>) {
        let mut calc = Calculator::default();
        let mut presenter = Presenter::new(
            TerminalReadout::new(Vec::new()),
            HostDelay::new(false),
            Timing::from(&cg35_core::CalculatorConfig::default()),
        );
        let pressed = run(
            &mut calc,
            &mut presenter,
            TokenKeypad::new(Cursor::new(keys)),
            dump_stack,
        )
        .unwrap();
        let (readout, _) = presenter.release();
        let lines = String::from_utf8(readout.into_inner())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect();
        (pressed, lines)
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["cg35-sim", "--keys", "1 2 +", "-v", "--no-delay"]);
        assert_eq!(args.keys.as_deref(), Some("1 2 +"));
        assert!(args.verbose);
        assert!(args.no_delay);
        assert!(!args.stack);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_one_frame_per_key() {
        let (pressed, lines) = simulate("3 ENTER 4 +", false);
        assert_eq!(pressed, 4);
        assert_eq!(
            lines,
            [
                "[ 3.            ]",
                "[ 3.            ]",
                "[ 4.            ]",
                "[ 7.            ]",
            ]
        );
    }

    #[test]
    fn test_error_blinks_then_latches() {
        let (_, lines) = simulate("1 ENTER 0 ÷ 5", false);
        assert_eq!(
            lines[3..],
            [
                "[...............]",
                "[               ]",
                "[...............]",
                "[...............]  DivisionByZero",
                "[ 5.            ]",
            ]
        );
    }
}
