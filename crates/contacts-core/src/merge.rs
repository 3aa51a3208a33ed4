//! Resolution of two records describing the same person

use crate::contact::Contact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How to reconcile a stored record (A) with an incoming duplicate (B)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Keep A unchanged
    KeepA,
    /// Keep B unchanged
    KeepB,
    /// B's fields, phones of both, revision stamped at merge time
    FieldMerge,
    /// Keep both records side by side
    Coexist,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::KeepA,
        Strategy::KeepB,
        Strategy::FieldMerge,
        Strategy::Coexist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::KeepA => "keep-a",
            Strategy::KeepB => "keep-b",
            Strategy::FieldMerge => "merge",
            Strategy::Coexist => "both",
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| format!("unknown merge strategy '{}'", s))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving two records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A single record replaces both
    Resolved(Contact),
    /// Both records are kept, A first
    Coexisting(Contact, Contact),
}

impl MergeOutcome {
    /// Records in the order they should appear in a list
    pub fn into_contacts(self) -> Vec<Contact> {
        match self {
            MergeOutcome::Resolved(contact) => vec![contact],
            MergeOutcome::Coexisting(a, b) => vec![a, b],
        }
    }
}

/// Resolve `a` against `b` with the given strategy, using the current time
/// for field merges.
pub fn resolve(a: &Contact, b: &Contact, strategy: Strategy) -> MergeOutcome {
    resolve_at(a, b, strategy, Utc::now())
}

/// Resolve `a` against `b`, stamping field merges with `now`
pub fn resolve_at(
    a: &Contact,
    b: &Contact,
    strategy: Strategy,
    now: DateTime<Utc>,
) -> MergeOutcome {
    match strategy {
        Strategy::KeepA => MergeOutcome::Resolved(a.clone()),
        Strategy::KeepB => MergeOutcome::Resolved(b.clone()),
        Strategy::FieldMerge => MergeOutcome::Resolved(field_merge(a, b, now)),
        Strategy::Coexist => MergeOutcome::Coexisting(a.clone(), b.clone()),
    }
}

/// B's scalar fields, B's phones followed by A's phones whose value B lacks
fn field_merge(a: &Contact, b: &Contact, now: DateTime<Utc>) -> Contact {
    let mut merged = Contact {
        revision: Some(now),
        ..b.clone()
    };

    for phone in &a.phones {
        if !b.has_phone_value(&phone.value) {
            merged.phones.push(phone.clone());
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{Phone, PhoneParam};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn contact(org: &str, phones: &[&str]) -> Contact {
        let mut c = Contact::new("John", "Doe");
        c.organization = org.to_string();
        c.phones = phones.iter().map(|p| Phone::new(*p)).collect();
        c.revision = Some(Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap());
        c
    }

    #[test]
    fn test_keep_a() {
        let a = contact("A", &["a", "b"]);
        let b = contact("B", &["c", "d"]);

        assert_eq!(resolve(&a, &b, Strategy::KeepA), MergeOutcome::Resolved(a));
    }

    #[test]
    fn test_keep_b() {
        let a = contact("A", &["a", "b"]);
        let b = contact("B", &["c", "d"]);

        assert_eq!(resolve(&a, &b, Strategy::KeepB), MergeOutcome::Resolved(b));
    }

    #[test]
    fn test_field_merge_unions_phones() {
        let a = contact("A", &["a", "b"]);
        let b = contact("B", &["c", "d"]);

        let MergeOutcome::Resolved(merged) = resolve(&a, &b, Strategy::FieldMerge) else {
            panic!("field merge must resolve to one record");
        };

        assert_eq!(merged.first_name, "John");
        assert_eq!(merged.organization, "B");
        let values: Vec<&str> = merged.phones.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(values, vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn test_field_merge_dedups_by_value_only() {
        let mut a = contact("A", &[]);
        a.phones
            .push(Phone::new("555").with_param(PhoneParam::Type, "HOME"));
        a.phones.push(Phone::new("777"));
        let mut b = contact("B", &[]);
        b.phones
            .push(Phone::new("555").with_param(PhoneParam::Type, "WORK"));

        let MergeOutcome::Resolved(merged) = resolve(&a, &b, Strategy::FieldMerge) else {
            panic!("field merge must resolve to one record");
        };

        assert_eq!(
            merged.phones,
            vec![
                Phone::new("555").with_param(PhoneParam::Type, "WORK"),
                Phone::new("777"),
            ]
        );
    }

    #[test]
    fn test_field_merge_stamps_revision() {
        let a = contact("A", &[]);
        let b = contact("B", &[]);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();

        let MergeOutcome::Resolved(merged) = resolve_at(&a, &b, Strategy::FieldMerge, now) else {
            panic!("field merge must resolve to one record");
        };
        assert_eq!(merged.revision, Some(now));

        let MergeOutcome::Resolved(merged) = resolve(&a, &b, Strategy::FieldMerge) else {
            panic!("field merge must resolve to one record");
        };
        assert!(merged.is_newer_than(&a));
        assert!(merged.is_newer_than(&b));
    }

    #[test]
    fn test_coexist_keeps_both_unchanged() {
        let a = contact("A", &["a"]);
        let b = contact("B", &["b"]);

        let outcome = resolve(&a, &b, Strategy::Coexist);

        assert_eq!(outcome, MergeOutcome::Coexisting(a.clone(), b.clone()));
        assert_eq!(outcome.into_contacts(), vec![a, b]);
    }

    #[test]
    fn test_strategy_from_str() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.as_str().parse::<Strategy>(), Ok(strategy));
        }
        assert!("fuse".parse::<Strategy>().is_err());
    }
}
