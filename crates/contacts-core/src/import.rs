//! Import of parsed cards into a contact list

use crate::collection::ContactList;
use crate::contact::Contact;
use crate::error::Result;
use crate::merge::Strategy;
use crate::parser::parse_card;
use tracing::info;

/// What happened to an imported contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// No duplicate existed; the contact was appended
    Inserted,
    /// The contact was reconciled with `existing` earlier records
    Merged { strategy: Strategy, existing: usize },
}

/// Add `contact` to the list, reconciling it with any duplicate.
///
/// When the list already holds the same person, `choose` is called with the
/// first stored duplicate (A) and the incoming contact (B) and returns the
/// strategy to apply. The contact is then appended and every duplicate is
/// merged.
pub fn import_contact<F>(list: &mut ContactList, contact: Contact, choose: F) -> Result<ImportOutcome>
where
    F: FnOnce(&Contact, &Contact) -> Strategy,
{
    let indexes = list.find_indexes(&contact);
    let Some(existing) = indexes.first().and_then(|&i| list.get(i)) else {
        info!(name = %contact.full_name(), "importing new contact");
        list.add(contact);
        return Ok(ImportOutcome::Inserted);
    };

    let strategy = choose(existing, &contact);
    list.add(contact.clone());
    list.merge(&contact, strategy)?;

    Ok(ImportOutcome::Merged {
        strategy,
        existing: indexes.len(),
    })
}

/// Parse card text and import the resulting contact
pub fn import_card<F>(list: &mut ContactList, text: &str, choose: F) -> Result<ImportOutcome>
where
    F: FnOnce(&Contact, &Contact) -> Strategy,
{
    let contact = parse_card(text)?;
    import_contact(list, contact, choose)
}
