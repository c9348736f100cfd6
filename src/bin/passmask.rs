//! Passmask CLI - read a secret from the terminal without echoing it
//!
//! The masked prompt is drawn on stderr and the captured text is printed on
//! stdout, so the tool can be used in command substitutions.

use std::io::{self, IsTerminal, Write};
use std::process;

use clap::Parser;
use log::debug;

use passmask::terminal;
use passmask::{AcceptancePolicy, DEFAULT_MASK, SessionConfig, SessionResult};

/// Exit status when the user cancels with Escape.
const EXIT_CANCELLED: i32 = 2;
/// Exit status when the user presses Ctrl+C.
const EXIT_INTERRUPTED: i32 = 130;

#[derive(Parser)]
#[command(name = "passmask")]
#[command(version)]
#[command(about = "Read a secret from the terminal, echoing a mask character.", long_about = None)]
struct Cli {
    /// Character drawn for every typed character
    #[arg(short, long, default_value_t = DEFAULT_MASK)]
    mask: char,

    /// Text shown in front of the masked input
    #[arg(short, long, value_name = "TEXT")]
    label: Option<String>,

    /// Ring the terminal bell on every keystroke
    #[arg(long)]
    beep: bool,

    /// Cancel the input when Escape is pressed
    #[arg(short = 'e', long)]
    cancel_on_escape: bool,

    /// Accept only the digits 0-9
    #[arg(long)]
    digits_only: bool,

    /// Read keystrokes from stdin instead of from the terminal
    #[arg(long)]
    keys_stdin: bool,

    /// Log session activity to stderr (never the secret itself)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::new()
            .mask(self.mask)
            .beep(self.beep)
            .cancel_on_escape(self.cancel_on_escape);
        if let Some(label) = &self.label {
            config = config.label(label.clone());
        }
        if self.digits_only {
            config = config.policy(AcceptancePolicy::custom(|e| {
                e.ch().is_some_and(|c| c.is_ascii_digit())
            }));
        }
        config
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = cli.session_config();
    let result = if cli.keys_stdin {
        debug!("[main] reading keys from stdin");
        let stdin = io::stdin();
        let from_terminal = stdin.is_terminal();
        terminal::prompt_stream(config, stdin.lock(), io::stderr(), from_terminal)
    } else {
        terminal::prompt(config)
    };

    let code = match result {
        Ok(result) => report(&result),
        Err(e) if e.io_error_kind() == Some(io::ErrorKind::Interrupted) => EXIT_INTERRUPTED,
        Err(e) => {
            eprintln!("Error: {:#}", anyhow::Error::new(e));
            1
        }
    };
    process::exit(code);
}

fn report(result: &SessionResult) -> i32 {
    if result.is_cancelled() {
        eprintln!("Input cancelled.");
        return EXIT_CANCELLED;
    }

    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", result.text()).and_then(|()| stdout.flush()) {
        eprintln!("Error: failed to write result: {}", e);
        return 1;
    }
    0
}
