//! Canonical attribute record shared by every facility provider encoding

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AttributeValue {
    /// Convert a JSON scalar; arrays, objects and null have no scalar form.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::String(s) => Some(Self::Text(s.trim().to_string())),
            _ => None,
        }
    }

    /// Permissive numeric reading: numbers as-is, strings by their leading
    /// numeric token (`"4.5 miles"`, `"1,200 ft"`). Anything else is `None`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => parse_leading_number(text),
            Self::Bool(_) => None,
        }
    }

    /// `true` for boolean true and for "yes"/"true"/"y" text
    #[must_use]
    pub fn is_affirmative(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(text) => matches!(text.to_lowercase().as_str(), "yes" | "y" | "true"),
            Self::Number(_) => false,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Longest numeric prefix of the first token: optional sign, digits and at
/// most one decimal point, thousands separators ignored
fn parse_leading_number(text: &str) -> Option<f64> {
    let token = text.split_whitespace().next()?;
    let mut number = String::with_capacity(token.len());
    let mut seen_point = false;
    for (i, c) in token.chars().enumerate() {
        match c {
            '+' | '-' if i == 0 => number.push(c),
            '0'..='9' => number.push(c),
            '.' if !seen_point => {
                seen_point = true;
                number.push(c);
            }
            ',' => {}
            _ => break,
        }
    }
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Normalised attributes and capabilities of one facility
///
/// Attributes keep the first value seen for a name. Capabilities are a set
/// that remembers first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeSet {
    attributes: Vec<(String, AttributeValue)>,
    capabilities: Vec<String>,
}

impl AttributeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an attribute unless one with the same name is already present
    pub fn insert_attribute(&mut self, name: &str, value: AttributeValue) {
        let name = name.trim();
        if name.is_empty() || self.get(name).is_some() {
            return;
        }
        self.attributes.push((name.to_string(), value));
    }

    /// Add a capability, ignoring blanks and case-insensitive duplicates
    pub fn insert_capability(&mut self, capability: &str) {
        let capability = capability.trim();
        if capability.is_empty() || self.has_capability(capability) {
            return;
        }
        self.capabilities.push(capability.to_string());
    }

    /// Union `other` into `self`, keeping existing entries first
    pub fn merge(&mut self, other: Self) {
        for (name, value) in other.attributes {
            self.insert_attribute(&name, value);
        }
        for capability in other.capabilities {
            self.insert_capability(&capability);
        }
    }

    /// Exact-name attribute lookup
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// First attribute present among `names`, tried in order
    #[must_use]
    pub fn first_of(&self, names: &[&str]) -> Option<&AttributeValue> {
        names.iter().find_map(|name| self.get(name))
    }

    #[must_use]
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities
            .iter()
            .any(|c| c.eq_ignore_ascii_case(capability))
    }

    #[must_use]
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.capabilities.is_empty()
    }
}
