//! Navigation parameters and path template expansion.

use std::collections::BTreeMap;

use shared::error::DomainError;

/// Keyed string parameters taken from the current navigation context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Empty values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Like [`Params::get`], but an absent value is an error. Used for
    /// identity parameters whose segment must never be dropped.
    pub fn require(&self, key: &str) -> Result<&str, DomainError> {
        self.get(key)
            .ok_or_else(|| DomainError::MissingParameter(key.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a copy of `self` with every entry of `overrides` applied on top.
    pub fn merged(&self, overrides: &Params) -> Params {
        let mut merged = self.clone();
        for (key, value) in overrides.iter() {
            merged.insert(key, value);
        }
        merged
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Expands a path template such as `/api/v1/jobs/{job}/{scope}` into path
/// segments. Later layers override earlier ones. A placeholder without a
/// value drops its whole segment.
pub fn expand_segments(template: &str, layers: &[&Params]) -> Vec<String> {
    template
        .split('/')
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| {
            match segment
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
            {
                Some(name) => lookup(name, layers).map(str::to_string),
                None => Some(segment.to_string()),
            }
        })
        .collect()
}

fn lookup<'a>(name: &str, layers: &[&'a Params]) -> Option<&'a str> {
    layers.iter().rev().find_map(|layer| layer.get(name))
}
