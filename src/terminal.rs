//! Terminal-backed key source and render sink

use std::io::{self, IsTerminal, Read, Write};

use crossterm::{
    QueueableCommand,
    cursor::MoveToColumn,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    style::Print,
    terminal::{self, Clear, ClearType},
};
use log::debug;

use crate::error::{ErrorCategory, ErrorKind, PassmaskError, Result};
use crate::key::{Key, KeyEvent, KeySource, ReaderKeySource};
use crate::render::RenderSink;
use crate::session::{MaskedInput, SessionConfig, SessionResult};

/// Puts the terminal in raw mode for as long as it is alive.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        debug!("[terminal] raw mode enabled");
        Ok(Self { _private: () })
    }

    /// Enables raw mode only when `needed`; `None` leaves the terminal as is.
    pub fn enable_if(needed: bool) -> io::Result<Option<Self>> {
        if needed { Self::enable().map(Some) } else { Ok(None) }
    }
}

fn raw_mode_error(e: io::Error) -> PassmaskError {
    PassmaskError::with_kind_and_source(
        ErrorCategory::Internal,
        ErrorKind::TerminalUnavailable,
        "failed to enable raw mode",
        e,
    )
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Nothing useful can be done with a failure while unwinding.
        let _ = terminal::disable_raw_mode();
        debug!("[terminal] raw mode disabled");
    }
}

/// Reads key presses from the terminal. Requires raw mode.
#[derive(Debug, Default)]
pub struct TerminalKeySource;

impl TerminalKeySource {
    pub fn new() -> Self {
        Self
    }
}

impl KeySource for TerminalKeySource {
    /// Blocks until a key press arrives. Mouse, focus, resize and paste
    /// events as well as key releases are skipped. Ctrl+C is reported as an
    /// `Interrupted` error since raw mode swallows the signal.
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            let Event::Key(ke) = event::read()? else {
                continue;
            };
            if ke.kind == KeyEventKind::Release {
                continue;
            }
            if ke.code == KeyCode::Char('c') && is_chord(ke.modifiers) {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
            }
            return Ok(map_key_event(ke));
        }
    }
}

/// Ctrl or Alt alone. Both together is AltGr on Windows, which types a
/// regular character.
fn is_chord(modifiers: KeyModifiers) -> bool {
    let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
    modifiers.intersects(altgr) && !modifiers.contains(altgr)
}

/// Converts a crossterm key event into the session's key model.
pub fn map_key_event(ke: event::KeyEvent) -> KeyEvent {
    let key = match (ke.code, ke.modifiers) {
        (KeyCode::Enter, _) => Key::Enter,
        (KeyCode::Esc, _) => Key::Escape,
        (KeyCode::Backspace, _) => Key::Backspace,
        (KeyCode::Char(c), m) if is_chord(m) => Key::Control(c),
        (KeyCode::Char(c), _) => Key::Char(c),
        _ => Key::Other,
    };
    KeyEvent::new(key)
}

/// Draws the prompt on a terminal stream (stderr for [`prompt`]).
pub struct TerminalSink<W: Write> {
    out: W,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn clear_line(&mut self) -> io::Result<()> {
        self.out
            .queue(Clear(ClearType::CurrentLine))?
            .queue(MoveToColumn(0))?;
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.queue(Print(text))?.flush()
    }

    fn newline(&mut self) -> io::Result<()> {
        // Raw mode does not translate \n into a carriage return.
        self.out.write_all(b"\r\n")?;
        self.out.flush()
    }

    fn beep(&mut self) -> io::Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()
    }
}

/// Read a masked secret from the controlling terminal.
///
/// The prompt is drawn on stderr so stdout stays free for the caller.
pub fn prompt(config: SessionConfig) -> Result<SessionResult> {
    if !io::stdin().is_terminal() {
        return Err(PassmaskError::with_kind(
            ErrorCategory::User,
            ErrorKind::TerminalUnavailable,
            "cannot read masked input - stdin is not a terminal",
        ));
    }

    // Validate before touching the terminal mode.
    let session = MaskedInput::new(
        config,
        TerminalKeySource::new(),
        TerminalSink::new(io::stderr()),
    )?;

    let _raw = RawModeGuard::enable()
        .map_err(|e| raw_mode_error(e).with_context("masked terminal input failed"))?;

    session
        .run()
        .map_err(|e| e.with_context("masked terminal input failed"))
}

/// Read a masked secret from keystroke bytes, drawing the prompt on `out`.
///
/// When `keys_from_terminal` is set the terminal is put in raw mode for the
/// duration of the session so typed characters are not echoed.
pub fn prompt_stream<R: Read, W: Write>(
    config: SessionConfig,
    keys: R,
    out: W,
    keys_from_terminal: bool,
) -> Result<SessionResult> {
    let session = MaskedInput::new(config, ReaderKeySource::new(keys), TerminalSink::new(out))?;

    let raw = RawModeGuard::enable_if(keys_from_terminal)
        .map_err(|e| raw_mode_error(e).with_context("masked stream input failed"))?;
    if raw.is_some() {
        debug!("[terminal] key stream is a terminal, echo suppressed");
    }

    session.run()
}
