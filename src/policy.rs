//! Acceptance policies deciding which characters enter the buffer

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::key::KeyEvent;

/// Standard printable keyboard characters accepted by default.
pub const DEFAULT_ALLOWED_CHARS: &[char] = &[
    '~', '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '+', '-', '=', '`',
    '1', '2', '3', '4', '5', '6', '7', '8', '9', '0',
    'Q', 'q', 'W', 'w', 'E', 'e', 'R', 'r', 'T', 't', 'Y', 'y', 'U', 'u', 'I', 'i', 'O', 'o',
    'P', 'p', '[', '{', ']', '}',
    'A', 'a', 'S', 's', 'D', 'd', 'F', 'f', 'G', 'g', 'H', 'h', 'J', 'j', 'K', 'k', 'L', 'l',
    ';', ':', '\'', '"', '\\',
    'Z', 'z', 'X', 'x', 'C', 'c', 'V', 'v', 'B', 'b', 'N', 'n', 'M', 'm', ',', '<', '.', '>',
    '/', '?', ' ',
];

/// Caller-supplied acceptance predicate.
pub type Checker = Arc<dyn Fn(&KeyEvent) -> bool + Send + Sync>;

/// Decides, per key event, whether its character is appended to the buffer.
///
/// Reserved keys are handled by the session before a policy is consulted.
#[derive(Clone, Default)]
pub enum AcceptancePolicy {
    /// Membership in [`DEFAULT_ALLOWED_CHARS`].
    #[default]
    Standard,
    /// Membership in a caller-provided set.
    AllowSet(BTreeSet<char>),
    /// A caller-provided predicate; replaces any allow-set check.
    Custom(Checker),
}

impl AcceptancePolicy {
    /// The default allow-set, for inspection or as a base to extend.
    pub fn default_chars() -> &'static [char] {
        DEFAULT_ALLOWED_CHARS
    }

    pub fn allow_set(chars: impl IntoIterator<Item = char>) -> Self {
        Self::AllowSet(chars.into_iter().collect())
    }

    pub fn custom<F>(checker: F) -> Self
    where
        F: Fn(&KeyEvent) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(checker))
    }

    pub fn accepts(&self, event: &KeyEvent) -> bool {
        match self {
            Self::Standard => event
                .ch()
                .is_some_and(|c| DEFAULT_ALLOWED_CHARS.contains(&c)),
            Self::AllowSet(set) => event.ch().is_some_and(|c| set.contains(&c)),
            Self::Custom(checker) => checker(event),
        }
    }
}

impl fmt::Debug for AcceptancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("Standard"),
            Self::AllowSet(set) => f.debug_tuple("AllowSet").field(&set.len()).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
