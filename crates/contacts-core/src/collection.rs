//! Ordered contact list with duplicate detection and reconciliation

use crate::contact::Contact;
use crate::error::{Error, Result};
use crate::merge::{resolve_at, MergeOutcome, Strategy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Contacts in insertion order. Duplicates may coexist until merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactList {
    contacts: Vec<Contact>,
}

impl ContactList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of contacts
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Check if the list holds no contacts
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Get a contact by position
    pub fn get(&self, index: usize) -> Option<&Contact> {
        self.contacts.get(index)
    }

    /// Iterate in list order
    pub fn iter(&self) -> std::slice::Iter<'_, Contact> {
        self.contacts.iter()
    }

    /// Contacts as a slice, in list order
    pub fn as_slice(&self) -> &[Contact] {
        &self.contacts
    }

    /// Consume the list into its contacts
    pub fn into_vec(self) -> Vec<Contact> {
        self.contacts
    }

    /// Append a contact, duplicate or not
    pub fn add(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    /// Remove the contact at `index`, if any
    pub fn remove(&mut self, index: usize) -> Option<Contact> {
        (index < self.contacts.len()).then(|| self.contacts.remove(index))
    }

    /// Check whether some contact is the same person as `candidate`
    pub fn verify(&self, candidate: &Contact) -> bool {
        self.contacts.iter().any(|c| c.is_same_person(candidate))
    }

    /// Positions of every contact that is the same person as `candidate`, ascending
    pub fn find_indexes(&self, candidate: &Contact) -> Vec<usize> {
        self.contacts
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_same_person(candidate))
            .map(|(i, _)| i)
            .collect()
    }

    /// Collapse every duplicate of `candidate` into one outcome.
    ///
    /// Duplicates are folded pairwise in list order: the running result
    /// is A, the next duplicate is B. The outcome takes the slot of the
    /// first duplicate (followed by any records kept by [`Strategy::Coexist`])
    /// and the other duplicate slots are removed.
    ///
    /// Fails with [`Error::Singleton`] and leaves the list untouched when
    /// `candidate` has no duplicate here.
    pub fn merge(&mut self, candidate: &Contact, strategy: Strategy) -> Result<&mut Self> {
        self.merge_at(candidate, strategy, Utc::now())
    }

    /// [`ContactList::merge`] with an explicit reconciliation time
    pub fn merge_at(
        &mut self,
        candidate: &Contact,
        strategy: Strategy,
        now: DateTime<Utc>,
    ) -> Result<&mut Self> {
        let indexes = self.find_indexes(candidate);
        let Some((&first, rest)) = indexes.split_first() else {
            return Err(Error::Singleton {
                name: candidate.full_name(),
            });
        };

        let mut kept = self.contacts[first].clone();
        let mut siblings = Vec::new();

        for &index in rest {
            debug!(a = first, b = index, %strategy, "merging duplicate");
            match resolve_at(&kept, &self.contacts[index], strategy, now) {
                MergeOutcome::Resolved(contact) => kept = contact,
                MergeOutcome::Coexisting(a, b) => {
                    kept = a;
                    siblings.push(b);
                }
            }
        }

        let mut run = Some(std::iter::once(kept).chain(siblings));
        let previous = std::mem::take(&mut self.contacts);
        for (index, contact) in previous.into_iter().enumerate() {
            if index == first {
                self.contacts.extend(run.take().into_iter().flatten());
            } else if rest.binary_search(&index).is_err() {
                self.contacts.push(contact);
            }
        }

        info!(
            name = %candidate.full_name(),
            duplicates = indexes.len(),
            %strategy,
            len = self.contacts.len(),
            "merged duplicates"
        );

        Ok(self)
    }

    /// Stable in-place sort by a three-way comparator
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Contact, &Contact) -> Ordering,
    {
        self.contacts.sort_by(compare);
    }
}

impl From<Vec<Contact>> for ContactList {
    fn from(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }
}

impl FromIterator<Contact> for ContactList {
    fn from_iter<I: IntoIterator<Item = Contact>>(iter: I) -> Self {
        Self {
            contacts: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ContactList {
    type Item = &'a Contact;
    type IntoIter = std::slice::Iter<'a, Contact>;

    fn into_iter(self) -> Self::IntoIter {
        self.contacts.iter()
    }
}
