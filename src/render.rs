//! Render sinks the session draws its masked prompt onto

use std::io;

/// Trait for displaying the masked prompt line
pub trait RenderSink {
    /// Erase the line previously drawn by this sink.
    fn clear_line(&mut self) -> io::Result<()>;

    /// Write text at the current position of the line.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Finish the line so subsequent output starts below it.
    fn newline(&mut self) -> io::Result<()>;

    /// Emit an audible alert.
    fn beep(&mut self) -> io::Result<()>;
}

impl<T: RenderSink + ?Sized> RenderSink for &mut T {
    fn clear_line(&mut self) -> io::Result<()> {
        (**self).clear_line()
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }

    fn newline(&mut self) -> io::Result<()> {
        (**self).newline()
    }

    fn beep(&mut self) -> io::Result<()> {
        (**self).beep()
    }
}

impl<T: RenderSink + ?Sized> RenderSink for Box<T> {
    fn clear_line(&mut self) -> io::Result<()> {
        (**self).clear_line()
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }

    fn newline(&mut self) -> io::Result<()> {
        (**self).newline()
    }

    fn beep(&mut self) -> io::Result<()> {
        (**self).beep()
    }
}

/// Keeps every drawn frame in memory (for testing)
///
/// Each `clear_line` starts a new frame; `write` appends to the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    frames: Vec<String>,
    beeps: usize,
    newlines: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames in drawing order.
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// The line as it is currently displayed.
    pub fn current_line(&self) -> &str {
        self.frames.last().map(String::as_str).unwrap_or("")
    }

    pub fn beeps(&self) -> usize {
        self.beeps
    }

    pub fn newlines(&self) -> usize {
        self.newlines
    }
}

impl RenderSink for RecordingSink {
    fn clear_line(&mut self) -> io::Result<()> {
        self.frames.push(String::new());
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        match self.frames.last_mut() {
            Some(frame) => frame.push_str(text),
            None => self.frames.push(text.to_string()),
        }
        Ok(())
    }

    fn newline(&mut self) -> io::Result<()> {
        self.newlines += 1;
        Ok(())
    }

    fn beep(&mut self) -> io::Result<()> {
        self.beeps += 1;
        Ok(())
    }
}
