//! Condition parsing and evaluation.

use std::fmt;
use std::str::FromStr;

use crate::vars::RequestVars;

/// Error returned for condition text that cannot be split.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    /// No `=` between key and value.
    #[error("condition `{0}` has no `=` separator")]
    MissingSeparator(String),
}

/// A parsed `key=value` or `key!=value` test.
///
/// # Example
///
/// ```
/// use variants_markup::{Condition, Vars};
///
/// let condition = Condition::parse(" lang != en ").unwrap();
/// assert_eq!(condition.key, "lang");
/// assert_eq!(condition.value, "en");
/// assert!(condition.negated);
///
/// assert!(condition.evaluate(&Vars::from_iter([("lang", "de")])));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Condition {
    pub key: String,
    pub value: String,
    /// Whether the if-branch is chosen when the comparison fails.
    pub negated: bool,
}

impl Condition {
    /// Split condition text on the first `=`.
    ///
    /// A trailing `!` on the key negates the test. Key and value are trimmed;
    /// whitespace between the key and its `!` is allowed.
    pub fn parse(raw: &str) -> Result<Self, ConditionError> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| ConditionError::MissingSeparator(raw.to_owned()))?;

        // Trimmed before the `!` check: `a! =1` and `a ! = 1` both negate `a`.
        let key = key.trim_end();
        let (key, negated) = match key.strip_suffix('!') {
            Some(key) => (key, true),
            None => (key, false),
        };

        Ok(Self {
            key: key.trim().to_owned(),
            value: value.trim().to_owned(),
            negated,
        })
    }

    /// Whether the if-branch should be chosen.
    ///
    /// An absent key never compares equal, whatever the expected value.
    pub fn evaluate(&self, vars: &(impl RequestVars + ?Sized)) -> bool {
        let matched =
            vars.has(&self.key) && vars.get(&self.key).unwrap_or_default() == self.value;
        matched != self.negated
    }
}

impl FromStr for Condition {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bang = if self.negated { "!" } else { "" };
        write!(f, "{}{bang}={}", self.key, self.value)
    }
}
