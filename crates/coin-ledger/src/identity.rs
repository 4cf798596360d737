//! Author identities and their case-insensitive account keys.
//!
//! An [`Identity`] is the display string git prints for an author,
//! `Name <email>`. Two identities name the same account when their
//! [`normalize`]d forms are byte-equal, so `Alice <a@x.com>` and
//! `ALICE <A@X.COM>` share one [`AccountKey`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical, case-folded key for an account.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountKey(String);

impl AccountKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountKey({})", self.0)
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize a raw author identity into its account key.
///
/// Surrounding whitespace left over from text extraction is trimmed and the
/// rest is uppercased with Unicode case mapping, which does not depend on the
/// process locale. Every input, including the empty string, has a key.
///
/// ```
/// use coin_ledger::normalize;
///
/// assert_eq!(normalize("alice <A@X.COM>"), normalize(" Alice <a@x.com> "));
/// ```
pub fn normalize(identity: &str) -> AccountKey {
    AccountKey(identity.trim().to_uppercase())
}

/// Display form of an author, e.g. `Alice <alice@example.com>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap a display string, trimming surrounding whitespace.
    pub fn new(display: impl AsRef<str>) -> Self {
        Self(display.as_ref().trim().to_string())
    }

    /// Build the `Name <email>` form git uses for authors.
    pub fn from_parts(name: &str, email: &str) -> Self {
        Self(format!("{} <{}>", name.trim(), email.trim()))
    }

    pub fn key(&self) -> AccountKey {
        normalize(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(display: &str) -> Self {
        Self::new(display)
    }
}

impl From<String> for Identity {
    fn from(display: String) -> Self {
        Self::new(display)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn case_variants_share_a_key() {
        let a = normalize("Alice <a@x.com>");
        let b = normalize("ALICE <a@x.com>");
        let c = normalize("alice <A@X.COM>");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_str(), "ALICE <A@X.COM>");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(normalize("  Bob <b@x.com>\t"), normalize("Bob <b@x.com>"));
    }

    #[test]
    fn empty_identity_has_empty_key() {
        assert!(normalize("").is_empty());
        assert!(normalize("   ").is_empty());
    }

    #[test]
    fn unicode_names_fold() {
        assert_eq!(normalize("Zoë <z@x.com>"), normalize("ZOË <Z@X.COM>"));
    }

    #[test]
    fn identity_from_parts() {
        let id = Identity::from_parts(" Alice ", "a@x.com\n");
        assert_eq!(id.as_str(), "Alice <a@x.com>");
        assert_eq!(id.key(), normalize("alice <a@x.com>"));
    }

    #[test]
    fn identity_orders_by_display() {
        let mut ids = vec![
            Identity::new("bob <b>"),
            Identity::new("Bob <b>"),
            Identity::new("Alice <a>"),
        ];
        ids.sort();
        let shown: Vec<_> = ids.iter().map(Identity::as_str).collect();
        assert_eq!(shown, vec!["Alice <a>", "Bob <b>", "bob <b>"]);
    }

    #[test]
    fn serde_is_transparent() {
        let id = Identity::new("Alice <a@x.com>");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Alice <a@x.com>\"");
        assert_eq!(serde_json::to_string(&id.key()).unwrap(), "\"ALICE <A@X.COM>\"");
    }

    proptest! {
        #[test]
        fn normalize_ignores_ascii_case(s in "[ -~]{0,40}") {
            prop_assert_eq!(normalize(&s.to_ascii_lowercase()), normalize(&s.to_ascii_uppercase()));
        }

        #[test]
        fn normalize_is_idempotent(s in "[ -~]{0,40}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(once.as_str()), once.clone());
        }
    }
}
