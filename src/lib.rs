//! Passmask - masked terminal input for passwords and other secrets
//!
//! Characters are read one key at a time and echoed as a mask character
//! until the input is submitted with Enter or cancelled with Escape.

#![forbid(unsafe_code)]

pub mod error;
pub mod key;
pub mod policy;
pub mod render;
pub mod session;
pub mod terminal;

pub use error::{ErrorCategory, ErrorKind, PassmaskError, Result};
pub use key::{Key, KeyEvent, KeySource, ReaderKeySource, ScriptedKeySource};
pub use policy::{AcceptancePolicy, Checker, DEFAULT_ALLOWED_CHARS};
pub use render::{RecordingSink, RenderSink};
pub use session::{
    DEFAULT_MASK, EditBuffer, MaskedInput, SessionConfig, SessionResult, SessionState,
};
pub use terminal::{prompt, prompt_stream};
