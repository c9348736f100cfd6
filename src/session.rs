//! Masked input sessions
//!
//! A session reads key events one at a time, keeps the accepted characters in
//! a zeroizing buffer and redraws the prompt with one mask character per
//! buffered character after every event, until the input is submitted with
//! Enter or cancelled with Escape.

use log::{debug, trace};
use zeroize::Zeroizing;

use crate::error::{PassmaskError, Result};
use crate::key::{Key, KeyEvent, KeySource};
use crate::policy::{AcceptancePolicy, Checker};
use crate::render::RenderSink;

pub const DEFAULT_MASK: char = '*';

#[derive(Clone, Debug)]
enum PolicyChoice {
    Policy(AcceptancePolicy),
    /// The custom-checker option was selected without a checker.
    MissingChecker,
}

/// Options for one masked input session
///
/// ```
/// use passmask::SessionConfig;
///
/// let config = SessionConfig::new()
///     .mask('#')
///     .cancel_on_escape(true)
///     .label("Password: ");
/// assert_eq!(config.mask_char(), '#');
/// ```
#[derive(Clone, Debug)]
pub struct SessionConfig {
    mask: char,
    beep: bool,
    cancel_on_escape: bool,
    label: Option<String>,
    policy: PolicyChoice,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mask: DEFAULT_MASK,
            beep: false,
            cancel_on_escape: false,
            label: None,
            policy: PolicyChoice::Policy(AcceptancePolicy::Standard),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Character drawn in place of every typed character.
    pub fn mask(mut self, mask: char) -> Self {
        self.mask = mask;
        self
    }

    /// Ring the bell on every keystroke.
    pub fn beep(mut self, beep: bool) -> Self {
        self.beep = beep;
        self
    }

    /// Let Escape cancel the input. When off, Escape is ignored.
    pub fn cancel_on_escape(mut self, cancel: bool) -> Self {
        self.cancel_on_escape = cancel;
        self
    }

    /// Text drawn in front of the masks. Must not be empty.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn policy(mut self, policy: AcceptancePolicy) -> Self {
        self.policy = PolicyChoice::Policy(policy);
        self
    }

    /// Use a custom checker instead of the allow-set.
    ///
    /// Passing `None` makes session construction fail; omit this call to
    /// keep the default policy.
    pub fn custom_checker(mut self, checker: Option<Checker>) -> Self {
        self.policy = match checker {
            Some(checker) => PolicyChoice::Policy(AcceptancePolicy::Custom(checker)),
            None => PolicyChoice::MissingChecker,
        };
        self
    }

    pub fn mask_char(&self) -> char {
        self.mask
    }

    pub fn beeps(&self) -> bool {
        self.beep
    }

    pub fn cancels_on_escape(&self) -> bool {
        self.cancel_on_escape
    }

    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The label is checked before the policy, so a config with both
    /// problems reports the empty label.
    fn validate(self) -> Result<ValidConfig> {
        if self.label.as_deref() == Some("") {
            return Err(PassmaskError::invalid_configuration(
                "label cannot be empty",
            ));
        }
        let policy = match self.policy {
            PolicyChoice::Policy(policy) => policy,
            PolicyChoice::MissingChecker => {
                return Err(PassmaskError::invalid_configuration(
                    "custom checker cannot be null",
                ));
            }
        };
        Ok(ValidConfig {
            mask: self.mask,
            beep: self.beep,
            cancel_on_escape: self.cancel_on_escape,
            label: self.label.unwrap_or_default(),
            policy,
        })
    }
}

struct ValidConfig {
    mask: char,
    beep: bool,
    cancel_on_escape: bool,
    label: String,
    policy: AcceptancePolicy,
}

/// The characters typed so far, wiped from memory when dropped.
#[derive(Default)]
pub struct EditBuffer {
    chars: Zeroizing<String>,
    len: usize,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char) {
        self.chars.push(c);
        self.len += 1;
    }

    /// Removes the last character. Returns false if the buffer was empty.
    pub fn pop(&mut self) -> bool {
        if self.chars.pop().is_some() {
            self.len -= 1;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.len = 0;
    }

    /// Number of characters (not bytes).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_str(&self) -> &str {
        &self.chars
    }

    fn into_inner(self) -> Zeroizing<String> {
        self.chars
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Reading,
    Submitted,
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        self != Self::Reading
    }
}

/// Outcome of a finished session.
pub struct SessionResult {
    text: Zeroizing<String>,
    cancelled: bool,
}

impl SessionResult {
    /// The captured text; empty when cancelled.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn into_text(self) -> Zeroizing<String> {
        self.text
    }
}

impl std::fmt::Debug for SessionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionResult")
            .field("len", &self.text.chars().count())
            .field("cancelled", &self.cancelled)
            .finish()
    }
}

/// A single masked input run over a key source and a render sink.
pub struct MaskedInput<K, S> {
    config: ValidConfig,
    keys: K,
    sink: S,
    buffer: EditBuffer,
    state: SessionState,
}

impl<K: KeySource, S: RenderSink> MaskedInput<K, S> {
    /// Validate `config` and prepare a session. No key is read here.
    pub fn new(config: SessionConfig, keys: K, sink: S) -> Result<Self> {
        let config = config.validate()?;
        Ok(Self {
            config,
            keys,
            sink,
            buffer: EditBuffer::new(),
            state: SessionState::Reading,
        })
    }

    /// Read keys until the input is submitted or cancelled.
    pub fn run(mut self) -> Result<SessionResult> {
        debug!(
            "[session] start (cancel_on_escape: {}, beep: {}, policy: {:?})",
            self.config.cancel_on_escape, self.config.beep, self.config.policy
        );

        self.render()?;

        while !self.state.is_terminal() {
            let event = self
                .keys
                .next_key()
                .map_err(|e| PassmaskError::io("failed to read key", e))?;

            if self.config.beep {
                self.sink
                    .beep()
                    .map_err(|e| PassmaskError::io("failed to beep", e))?;
            }

            self.state = self.handle(&event);
            trace!(
                "[session] {} key, buffer length {}",
                event.kind_name(),
                self.buffer.len()
            );

            self.render()?;
        }

        self.sink
            .newline()
            .map_err(|e| PassmaskError::io("failed to finish prompt line", e))?;

        let cancelled = self.state == SessionState::Cancelled;
        debug!(
            "[session] {} with {} characters",
            if cancelled { "cancelled" } else { "submitted" },
            self.buffer.len()
        );

        Ok(SessionResult {
            text: self.buffer.into_inner(),
            cancelled,
        })
    }

    fn handle(&mut self, event: &KeyEvent) -> SessionState {
        match event.key {
            Key::Enter => SessionState::Submitted,
            Key::Escape if self.config.cancel_on_escape => {
                self.buffer.clear();
                SessionState::Cancelled
            }
            Key::Escape => SessionState::Reading,
            Key::Backspace => {
                self.buffer.pop();
                SessionState::Reading
            }
            _ => {
                if self.config.policy.accepts(event) {
                    if let Some(c) = event.ch() {
                        self.buffer.push(c);
                    }
                }
                SessionState::Reading
            }
        }
    }

    fn render(&mut self) -> Result<()> {
        let masks: String = std::iter::repeat_n(self.config.mask, self.buffer.len()).collect();
        let line = format!("{}{}", self.config.label, masks);
        self.sink
            .clear_line()
            .and_then(|()| self.sink.write(&line))
            .map_err(|e| PassmaskError::io("failed to draw prompt", e))
    }
}
