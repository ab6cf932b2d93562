//! Request variables that conditionals are evaluated against.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read-only access to request-scoped key/value state.
pub trait RequestVars {
    fn get(&self, key: &str) -> Option<&str>;

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<S: BuildHasher> RequestVars for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

impl RequestVars for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}

/// Error for a `key=value` assignment without `=`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("variable assignment `{0}` must have the form KEY=VALUE")]
pub struct AssignmentError(pub String);

/// An ordered set of request variables.
///
/// # Example
///
/// ```
/// use variants_markup::{RequestVars, Vars};
///
/// let vars = Vars::from_assignments(["lang=de", "audience = admin"]).unwrap();
/// assert_eq!(vars.get("audience"), Some("admin"));
/// assert!(!vars.has("missing"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Vars(BTreeMap<String, String>);

impl Vars {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `key=value` strings. Keys and values are trimmed.
    pub fn from_assignments<I, S>(assignments: I) -> Result<Self, AssignmentError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vars = Self::new();
        for assignment in assignments {
            let (key, value) = parse_assignment(assignment.as_ref())?;
            vars.insert(key, value);
        }
        Ok(vars)
    }

    /// Set `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Add `key` to a copy of the set.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Values of `other` override values already present.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Split a `key=value` assignment on the first `=`.
pub fn parse_assignment(assignment: &str) -> Result<(String, String), AssignmentError> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| AssignmentError(assignment.to_owned()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(AssignmentError(assignment.to_owned()));
    }
    Ok((key.to_owned(), value.trim().to_owned()))
}

impl RequestVars for Vars {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Vars {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Vars {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl From<BTreeMap<String, String>> for Vars {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_is_present() {
        let vars = Vars::new().with("a", "");
        assert!(vars.has("a"));
        assert_eq!(vars.get("a"), Some(""));
        assert!(!vars.has("b"));
    }

    #[test]
    fn test_from_assignments() {
        let vars = Vars::from_assignments(["a=1", " b = x=y "]).unwrap();
        assert_eq!(vars.get("a"), Some("1"));
        assert_eq!(vars.get("b"), Some("x=y"));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_from_assignments_rejects_missing_separator() {
        assert_eq!(
            Vars::from_assignments(["a=1", "oops"]),
            Err(AssignmentError("oops".to_owned()))
        );
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn test_merge_overrides() {
        let mut vars = Vars::from_iter([("a", "1"), ("b", "2")]);
        vars.merge(Vars::from_iter([("b", "3")]));
        assert_eq!(vars.iter().collect::<Vec<_>>(), vec![("a", "1"), ("b", "3")]);
    }

    #[test]
    fn test_std_maps_are_request_vars() {
        let mut map = HashMap::new();
        map.insert("k".to_owned(), "v".to_owned());
        assert!(RequestVars::has(&map, "k"));
        assert_eq!(RequestVars::get(&map, "k"), Some("v"));
    }
}
