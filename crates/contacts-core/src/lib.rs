//! contacts-core: Core library for importing vCard contacts
//!
//! This library provides functionality to:
//! - Parse strict vCard 4.0 cards into contact records
//! - Detect duplicate contacts by name
//! - Reconcile duplicates with a chosen merge strategy
//! - Persist contacts in a JSON store and export them as delimited text

pub mod collection;
pub mod contact;
pub mod error;
pub mod export;
pub mod import;
pub mod merge;
pub mod parser;
pub mod scanner;
pub mod store;

pub use collection::ContactList;
pub use contact::{Contact, Phone, PhoneParam};
pub use error::{Error, ParseError, Result};
pub use export::{comparator, to_csv, SortKey, SortOrder, DEFAULT_SEPARATOR};
pub use import::{import_card, import_contact, ImportOutcome};
pub use merge::{resolve, MergeOutcome, Strategy};
pub use parser::{parse_card, parse_card_file, Card, VERSION};
pub use scanner::find_cards;
pub use store::{Store, USERS_TABLE};
