//! Delimited text export of a contact list

use crate::collection::ContactList;
use crate::contact::Contact;
use crate::error::{Error, Result};
use chrono::SecondsFormat;
use std::cmp::Ordering;
use std::str::FromStr;

/// Default field separator
pub const DEFAULT_SEPARATOR: &str = ";";

/// Render the list as delimited text.
///
/// One line per contact: first name, last name, organization, title, email,
/// revision, then every phone value (one empty field when there are no
/// phones). Lines are joined by the separator followed by a newline, with
/// no trailing newline. Fields containing the
/// separator or quotes are quoted.
pub fn to_csv(list: &ContactList, separator: &str) -> Result<String> {
    let delimiter = match separator.as_bytes() {
        [b] if b.is_ascii() => *b,
        _ => return Err(Error::InvalidSeparator(separator.to_string())),
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let last = list.len().saturating_sub(1);
    for (i, contact) in list.iter().enumerate() {
        let mut fields = contact_fields(contact);
        if i < last {
            // Empty trailing field leaves the separator before the newline
            fields.push(String::new());
        }
        writer.write_record(&fields)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    let mut out = String::from_utf8_lossy(&bytes).into_owned();
    if out.ends_with('\n') {
        out.pop();
    }

    Ok(out)
}

fn contact_fields(contact: &Contact) -> Vec<String> {
    let revision = contact
        .revision
        .map(|r| r.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default();

    let mut fields = vec![
        contact.first_name.clone(),
        contact.last_name.clone(),
        contact.organization.clone(),
        contact.title.clone(),
        contact.email.clone(),
        revision,
    ];
    if contact.phones.is_empty() {
        // Phone column is always present, even when empty
        fields.push(String::new());
    }
    fields.extend(contact.phones.iter().map(|p| p.value.clone()));
    fields
}

/// Field used to order an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    LastName,
    FirstName,
    Organization,
}

impl SortKey {
    fn field<'a>(&self, contact: &'a Contact) -> &'a str {
        match self {
            SortKey::LastName => &contact.last_name,
            SortKey::FirstName => &contact.first_name,
            SortKey::Organization => &contact.organization,
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "last-name" => Ok(SortKey::LastName),
            "first-name" => Ok(SortKey::FirstName),
            "organization" => Ok(SortKey::Organization),
            _ => Err(format!("unknown sort key '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(format!("unknown sort order '{}'", s)),
        }
    }
}

/// Three-way comparator for [`ContactList::sort_by`].
///
/// Compares case-insensitively, then exactly to keep the order total.
pub fn comparator(key: SortKey, order: SortOrder) -> impl Fn(&Contact, &Contact) -> Ordering {
    move |a: &Contact, b: &Contact| {
        let (a, b) = (key.field(a), key.field(b));
        let ordering = a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b));

        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::Phone;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn sample() -> ContactList {
        let mut john = Contact::new("John", "Doe");
        john.organization = "Acme".to_string();
        john.title = "CEO".to_string();
        john.email = "john@acme.com".to_string();
        john.revision = Some(Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap());
        john.phones = vec![Phone::new("555"), Phone::new("777")];

        let mut ann = Contact::new("Ann", "lee");
        ann.organization = "Globex".to_string();

        vec![john, ann].into()
    }

    #[test]
    fn test_to_csv_layout() {
        let out = to_csv(&sample(), ";").unwrap();

        assert_eq!(
            out,
            "John;Doe;Acme;CEO;john@acme.com;2020-01-01T12:00:00Z;555;777;\nAnn;lee;Globex;;;;"
        );
    }

    #[test]
    fn test_to_csv_other_separator() {
        let list: ContactList = vec![Contact::new("John", "Doe")].into();

        assert_eq!(to_csv(&list, ",").unwrap(), "John,Doe,,,,,");
    }

    #[test]
    fn test_to_csv_quotes_separator() {
        let mut contact = Contact::new("John", "Doe");
        contact.organization = "Acme; Inc".to_string();
        let list: ContactList = vec![contact].into();

        assert_eq!(to_csv(&list, ";").unwrap(), "John;Doe;\"Acme; Inc\";;;;");
    }

    #[test]
    fn test_to_csv_phoneless_rows_keep_phone_column() {
        let list: ContactList = vec![Contact::new("John", "Doe"), Contact::new("Ann", "Lee")].into();

        let out = to_csv(&list, ";").unwrap();

        assert_eq!(out, "John;Doe;;;;;;\nAnn;Lee;;;;;");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1].matches(';').count(), 6);
    }

    #[test]
    fn test_to_csv_empty_list() {
        assert_eq!(to_csv(&ContactList::new(), ";").unwrap(), "");
    }

    #[test]
    fn test_to_csv_invalid_separator() {
        assert!(matches!(
            to_csv(&sample(), ";;"),
            Err(Error::InvalidSeparator(_))
        ));
        assert!(matches!(to_csv(&sample(), ""), Err(Error::InvalidSeparator(_))));
    }

    #[test]
    fn test_sort_by_last_name() {
        let mut list = sample();
        list.sort_by(comparator(SortKey::LastName, SortOrder::Ascending));
        let names: Vec<&str> = list.iter().map(|c| c.last_name.as_str()).collect();
        assert_eq!(names, vec!["Doe", "lee"]);

        list.sort_by(comparator(SortKey::LastName, SortOrder::Descending));
        let names: Vec<&str> = list.iter().map(|c| c.last_name.as_str()).collect();
        assert_eq!(names, vec!["lee", "Doe"]);
    }

    #[test]
    fn test_sort_by_organization_desc() {
        let mut list = sample();
        list.sort_by(comparator(SortKey::Organization, SortOrder::Descending));

        assert_eq!(list.get(0).map(|c| c.organization.as_str()), Some("Globex"));
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("first-name".parse::<SortKey>(), Ok(SortKey::FirstName));
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Descending));
        assert!("age".parse::<SortKey>().is_err());
    }
}
