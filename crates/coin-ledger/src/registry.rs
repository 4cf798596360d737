use std::collections::BTreeMap;

use tracing::debug;

use crate::error::HistoryError;
use crate::identity::{AccountKey, Identity};

/// Every author seen in history, one display spelling per account.
///
/// Authorship feeds arrive most recent first, so when an account was spelled
/// with different casings over time the most recent spelling is kept. Users
/// are ordered by display string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserRegistry {
    users: Vec<Identity>,
}

impl UserRegistry {
    /// Build from identities in history order, most recent first.
    pub fn build<I>(identities: I) -> Self
    where
        I: IntoIterator<Item = Identity>,
    {
        let mut by_key = BTreeMap::new();
        for identity in identities {
            retain(&mut by_key, identity);
        }
        Self::from_map(by_key)
    }

    /// Build from a raw authorship feed in a single pass, stopping at the
    /// first read error.
    pub fn from_lines<I>(lines: I) -> Result<Self, HistoryError>
    where
        I: IntoIterator<Item = Result<String, HistoryError>>,
    {
        let mut by_key = BTreeMap::new();
        for line in lines {
            retain(&mut by_key, Identity::new(line?));
        }
        Ok(Self::from_map(by_key))
    }

    fn from_map(by_key: BTreeMap<AccountKey, Identity>) -> Self {
        let mut users: Vec<Identity> = by_key.into_values().collect();
        users.sort();
        debug!(users = users.len(), "user registry built");
        Self { users }
    }

    pub fn users(&self) -> &[Identity] {
        &self.users
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Identity> {
        self.users.iter()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// The retained spelling for `key`, if the account is known.
    pub fn find(&self, key: &AccountKey) -> Option<&Identity> {
        self.users.iter().find(|user| &user.key() == key)
    }
}

fn retain(by_key: &mut BTreeMap<AccountKey, Identity>, identity: Identity) {
    if !identity.is_empty() {
        by_key.entry(identity.key()).or_insert(identity);
    }
}

impl<'a> IntoIterator for &'a UserRegistry {
    type Item = &'a Identity;
    type IntoIter = std::slice::Iter<'a, Identity>;

    fn into_iter(self) -> Self::IntoIter {
        self.users.iter()
    }
}
