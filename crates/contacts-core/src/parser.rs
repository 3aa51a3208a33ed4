//! Parser for vCard 4.0 contact cards
//!
//! The card grammar is strict and ordered:
//!
//! ```text
//! BEGIN:VCARD
//! VERSION:4.0
//! N:<lastName>;<firstName>
//! FN:<ignored>
//! [ORG:<org>] [TITLE:<title>] [EMAIL:<email>] [TEL;TYPE=<t>;VALUE=<v>:<number>]*
//! REV:<YYYYMMDDThhmmssZ>
//! END:VCARD
//! ```
//!
//! Parsing is a fold over the non-empty lines through [`State::next`]. The
//! `REV` line is located by position: once the third-from-last line has been
//! consumed, the next line must be `REV` whatever the current state.

use crate::contact::{Contact, Phone, PhoneParam};
use crate::error::{Error, ParseError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// The only supported card version
pub const VERSION: &str = "4.0";

const CARD_TAG: &str = "VCARD";
const END_OF_INPUT: &str = "end of input";

static REV_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})T(\d{2})(\d{2})(\d{2})Z$")
        .expect("Failed to compile REV timestamp regex")
});

/// A card under construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Card {
    /// Version tag, checked against [`VERSION`]
    pub version: String,
    pub revision: Option<DateTime<Utc>>,
    /// Record built so far
    pub contact: Contact,
}

impl Card {
    /// Parse card text into a card
    pub fn parse(text: &str) -> std::result::Result<Self, ParseError> {
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        let rev_trigger = lines.len().checked_sub(3);

        let mut card = Card::default();
        let mut state = State::Begin;

        for (i, raw) in lines.iter().enumerate() {
            let line = Line::split(raw, i + 1)?;
            state = state.next(&line, &mut card)?;

            if Some(i) == rev_trigger && state != State::Done {
                state = State::Rev;
            }
        }

        if state != State::Done {
            return Err(ParseError::Sequence {
                line: lines.len() + 1,
                expected: state.expected().to_string(),
                found: END_OF_INPUT.to_string(),
            });
        }

        Ok(card)
    }

    /// The finished record, stamped with the card's revision
    pub fn into_contact(self) -> Contact {
        Contact {
            revision: self.revision,
            ..self.contact
        }
    }
}

/// Parse card text into a contact
pub fn parse_card(text: &str) -> std::result::Result<Contact, ParseError> {
    Card::parse(text).map(Card::into_contact)
}

/// Parse a card file into a contact
pub fn parse_card_file<P: AsRef<Path>>(path: P) -> Result<Contact> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_card(&text).map_err(|e| Error::CardFile {
        path: path.to_path_buf(),
        source: e,
    })
}

/// One non-empty card line split at its first `:`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number
    pub number: usize,
    pub keyword: &'a str,
    pub value: &'a str,
}

impl<'a> Line<'a> {
    /// Split a raw line into keyword and value
    pub fn split(raw: &'a str, number: usize) -> std::result::Result<Self, ParseError> {
        let (keyword, value) = raw
            .split_once(':')
            .ok_or(ParseError::Grammar { line: number })?;

        Ok(Self {
            number,
            keyword,
            value,
        })
    }

    fn expect_keyword(&self, expected: &str) -> std::result::Result<(), ParseError> {
        if self.keyword == expected {
            Ok(())
        } else {
            Err(self.mismatch(expected, self.keyword))
        }
    }

    fn expect_value(&self, expected: &str) -> std::result::Result<(), ParseError> {
        if self.value == expected {
            Ok(())
        } else {
            Err(self.mismatch(expected, self.value))
        }
    }

    fn mismatch(&self, expected: &str, found: &str) -> ParseError {
        ParseError::Sequence {
            line: self.number,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Parser states, named after the line they expect next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Begin,
    Version,
    /// `N:<last>;<first>`; a value without `;` is read as a last name only
    Name,
    FullName,
    /// Any number of ORG, TITLE, EMAIL and TEL lines
    Fields,
    Rev,
    End,
    Done,
}

impl State {
    /// Keyword this state expects; `Fields` accepts several
    pub fn expected(&self) -> &'static str {
        match self {
            State::Begin => "BEGIN",
            State::Version => "VERSION",
            State::Name => "N",
            State::FullName => "FN",
            State::Fields => "ORG, TITLE, EMAIL or TEL",
            State::Rev => "REV",
            State::End => "END",
            State::Done => END_OF_INPUT,
        }
    }

    /// Consume one line, updating the card, and return the following state
    pub fn next(self, line: &Line<'_>, card: &mut Card) -> std::result::Result<State, ParseError> {
        debug!(line = line.number, state = ?self, keyword = line.keyword, "card line");

        match self {
            State::Begin => {
                line.expect_keyword("BEGIN")?;
                line.expect_value(CARD_TAG)?;
                Ok(State::Version)
            }
            State::Version => {
                line.expect_keyword("VERSION")?;
                line.expect_value(VERSION)?;
                card.version = line.value.to_string();
                Ok(State::Name)
            }
            State::Name => {
                line.expect_keyword("N")?;
                let mut parts = line.value.split(';');
                let last_name = parts.next().unwrap_or_default();
                let first_name = parts.next().unwrap_or_default();
                card.contact = Contact::new(first_name, last_name);
                Ok(State::FullName)
            }
            State::FullName => {
                // Derived from N; consumed without checks
                line.expect_keyword("FN")?;
                Ok(State::Fields)
            }
            State::Fields => {
                apply_field(line, &mut card.contact)?;
                Ok(State::Fields)
            }
            State::Rev => {
                line.expect_keyword("REV")?;
                card.revision = parse_revision(line.value);
                if card.revision.is_none() {
                    warn!(
                        line = line.number,
                        value = line.value,
                        "unrecognized REV timestamp, leaving revision unset"
                    );
                }
                Ok(State::End)
            }
            State::End => {
                line.expect_keyword("END")?;
                line.expect_value(CARD_TAG)?;
                Ok(State::Done)
            }
            State::Done => Err(line.mismatch(END_OF_INPUT, line.keyword)),
        }
    }
}

/// Apply an ORG, TITLE, EMAIL or TEL line to the contact
fn apply_field(line: &Line<'_>, contact: &mut Contact) -> std::result::Result<(), ParseError> {
    match line.keyword {
        "ORG" => contact.organization = line.value.to_string(),
        "TITLE" => contact.title = line.value.to_string(),
        "EMAIL" => contact.email = line.value.to_string(),
        compound => {
            let unknown = |field: &str| ParseError::UnknownField {
                line: line.number,
                field: field.to_string(),
            };

            let (primary, params) = compound.split_once(';').ok_or_else(|| unknown(compound))?;
            if primary != "TEL" {
                return Err(unknown(primary));
            }

            contact.phones.push(parse_phone(line, params)?);
        }
    }

    Ok(())
}

/// Build a phone entry from the `;`-separated parameters of a TEL line
fn parse_phone(line: &Line<'_>, params: &str) -> std::result::Result<Phone, ParseError> {
    let mut phone = Phone::new(line.value);

    for param in params.split(';') {
        let unknown = |name: &str| ParseError::UnknownParam {
            line: line.number,
            param: name.to_string(),
        };

        let (name, value) = param.split_once('=').ok_or_else(|| unknown(param))?;
        let name = name.parse::<PhoneParam>().map_err(|()| unknown(name))?;
        phone = phone.with_param(name, value);
    }

    Ok(phone)
}

/// Parse a `YYYYMMDDThhmmssZ` timestamp; anything else yields `None`
pub fn parse_revision(value: &str) -> Option<DateTime<Utc>> {
    let caps = REV_PATTERN.captures(value)?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)?
        .and_hms_opt(field(4)?, field(5)?, field(6)?)
        .map(|dt| dt.and_utc())
}
