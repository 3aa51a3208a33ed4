//! Core contact types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One person, as read from a card or from the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, rename = "organisation")]
    pub organization: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub email: String,
    /// Revision timestamp, unset when the card carried none (or an unreadable one)
    #[serde(default)]
    pub revision: Option<DateTime<Utc>>,
    /// Phone entries in card order
    #[serde(default, rename = "tel")]
    pub phones: Vec<Phone>,
}

impl Contact {
    /// Create a contact with only its name set
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Identity equality: same first and last name, compared exactly.
    ///
    /// Organization, email and phones play no part in identity.
    pub fn is_same_person(&self, other: &Contact) -> bool {
        self.first_name == other.first_name && self.last_name == other.last_name
    }

    /// True if this contact's revision is later than `other`'s.
    /// An unset revision sorts before any timestamp.
    pub fn is_newer_than(&self, other: &Contact) -> bool {
        self.revision > other.revision
    }

    /// Check whether a phone with this exact value is already present
    pub fn has_phone_value(&self, value: &str) -> bool {
        self.phones.iter().any(|p| p.value == value)
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())?;
        if !self.organization.is_empty() {
            write!(f, " ({})", self.organization)?;
        }
        Ok(())
    }
}

/// A phone entry: the number plus its named parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub value: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<PhoneParam, String>,
}

impl Phone {
    /// Create a phone entry without parameters
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            params: BTreeMap::new(),
        }
    }

    /// Attach a parameter, replacing any earlier value for the same name
    pub fn with_param(mut self, param: PhoneParam, value: impl Into<String>) -> Self {
        self.params.insert(param, value.into());
        self
    }

    /// Get a parameter's value
    pub fn param(&self, param: PhoneParam) -> Option<&str> {
        self.params.get(&param).map(String::as_str)
    }
}

/// Parameter names accepted on a `TEL` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PhoneParam {
    Type,
    Value,
}

impl PhoneParam {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhoneParam::Type => "TYPE",
            PhoneParam::Value => "VALUE",
        }
    }
}

impl FromStr for PhoneParam {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "TYPE" => Ok(PhoneParam::Type),
            "VALUE" => Ok(PhoneParam::Value),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PhoneParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
