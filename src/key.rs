//! Key events and the sources that produce them

use std::collections::VecDeque;
use std::io::{self, Read};

/// Logical identity of a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter/Return. Submits the input.
    Enter,
    /// Escape. Cancels the input when the session allows it.
    Escape,
    /// Backspace. Removes the last buffered character.
    Backspace,
    /// A key that produced a character.
    Char(char),
    /// A character typed together with Ctrl.
    Control(char),
    /// Any key without a character value (arrows, function keys, ...).
    Other,
}

/// A single observed keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
}

impl KeyEvent {
    pub const ENTER: KeyEvent = KeyEvent::new(Key::Enter);
    pub const ESCAPE: KeyEvent = KeyEvent::new(Key::Escape);
    pub const BACKSPACE: KeyEvent = KeyEvent::new(Key::Backspace);

    pub const fn new(key: Key) -> Self {
        Self { key }
    }

    pub const fn char(c: char) -> Self {
        Self::new(Key::Char(c))
    }

    /// The literal character carried by this event, if it is printable input.
    pub fn ch(&self) -> Option<char> {
        match self.key {
            Key::Char(c) => Some(c),
            _ => None,
        }
    }

    /// Returns true for Enter, Escape and Backspace, which are always
    /// handled by the session and never offered to an acceptance policy.
    pub fn is_reserved(&self) -> bool {
        matches!(self.key, Key::Enter | Key::Escape | Key::Backspace)
    }

    /// Short name of the key kind, safe to log (never the character itself).
    pub fn kind_name(&self) -> &'static str {
        match self.key {
            Key::Enter => "enter",
            Key::Escape => "escape",
            Key::Backspace => "backspace",
            Key::Char(_) => "char",
            Key::Control(_) => "control",
            Key::Other => "other",
        }
    }

    /// Maps a single decoded character from a byte stream to a key event.
    pub fn from_stream_char(c: char) -> Self {
        match c {
            '\r' | '\n' => Self::ENTER,
            '\u{1b}' => Self::ESCAPE,
            '\u{7f}' | '\u{08}' => Self::BACKSPACE,
            // Ctrl+A..Ctrl+Z arrive as 0x01..0x1a.
            '\u{01}'..='\u{1a}' => {
                Self::new(Key::Control((b'a' + (c as u8 - 1)) as char))
            }
            c if c.is_control() => Self::new(Key::Other),
            c => Self::char(c),
        }
    }
}

impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        Self::char(c)
    }
}

/// Trait for obtaining key events one at a time
pub trait KeySource {
    /// Block until the next key event is available.
    ///
    /// Exactly one event is consumed per call. Implementations must not echo
    /// the key themselves.
    fn next_key(&mut self) -> io::Result<KeyEvent>;
}

impl<T: KeySource + ?Sized> KeySource for &mut T {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        (**self).next_key()
    }
}

impl<T: KeySource + ?Sized> KeySource for Box<T> {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        (**self).next_key()
    }
}

/// Yields a fixed sequence of events (for testing and embedding)
///
/// Once the sequence is exhausted every further call fails with
/// `UnexpectedEof`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeySource {
    events: VecDeque<KeyEvent>,
    consumed: usize,
}

impl ScriptedKeySource {
    pub fn new(events: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Number of events handed out so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Number of events not yet handed out.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl KeySource for ScriptedKeySource {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        let event = self.events.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted")
        })?;
        self.consumed += 1;
        Ok(event)
    }
}

/// Decodes keystrokes from any io::Read source
///
/// Input is read as UTF-8, one character per event. Carriage return and line
/// feed map to Enter, ESC to Escape, DEL and BS to Backspace.
pub struct ReaderKeySource<R: Read> {
    reader: R,
}

impl<R: Read> ReaderKeySource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn read_char(&mut self) -> io::Result<char> {
        let first = self.read_byte()?.ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "key stream ended")
        })?;
        let width = utf8_width(first).ok_or_else(|| invalid_utf8(first))?;

        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = self.read_byte()?.ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "key stream ended mid-character")
            })?;
        }

        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| invalid_utf8(first))
    }
}

impl<R: Read> KeySource for ReaderKeySource<R> {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        self.read_char().map(KeyEvent::from_stream_char)
    }
}

fn utf8_width(first: u8) -> Option<usize> {
    match first {
        0x00..=0x7f => Some(1),
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

fn invalid_utf8(first: u8) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("key stream is not valid UTF-8 (lead byte {:#04x})", first),
    )
}
