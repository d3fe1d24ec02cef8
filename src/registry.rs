//! In-process key registry.
//!
//! The registry is the only mutable state in the crate: two independent
//! identifier namespaces, one for recipient (KEM) keypairs and one for
//! sender (signature) keypairs. It is an explicit object: construct one per
//! process (or per test) and pass it by reference into the engines.
//!
//! Re-registering an identifier replaces the previous entry wholesale; the
//! old secret key becomes unrecoverable. Last write wins.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;
use zeroize::Zeroizing;

use crate::keys::{RecipientPublic, RecipientSecret, SenderPublic, SenderSecret};
use crate::suite;

struct RecipientEntry {
    public: Vec<u8>,
    secret: Zeroizing<Vec<u8>>,
}

struct SenderEntry {
    public: Vec<u8>,
    secret: Zeroizing<Vec<u8>>,
}

/// Registry mapping opaque identifiers to generated keypairs.
///
/// The recipient and sender namespaces are independent: the same identifier
/// string may exist in both without conflict.
#[derive(Default)]
pub struct KeyRegistry {
    recipients: RwLock<HashMap<String, RecipientEntry>>,
    senders: RwLock<HashMap<String, SenderEntry>>,
}

impl KeyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate and store a recipient (ML-KEM) keypair under `id`,
    /// replacing any previous entry. Returns the public half.
    pub fn generate_recipient(&self, id: &str) -> RecipientPublic {
        let (public, secret) = suite::kem_generate();
        let entry = RecipientEntry {
            public: public.clone(),
            secret,
        };
        // Keypair generation happens outside the lock; the write section is
        // a single whole-value insert, so a same-id race has one winner.
        let replaced = self
            .recipients
            .write()
            .expect("recipient registry lock poisoned")
            .insert(id.to_string(), entry)
            .is_some();
        debug!(id, replaced, "registered recipient keypair");

        RecipientPublic {
            id: id.to_string(),
            key: public,
        }
    }

    /// Generate and store a sender (Dilithium) keypair under `id`,
    /// replacing any previous entry. Returns the public half.
    pub fn generate_sender(&self, id: &str) -> SenderPublic {
        let (public, secret) = suite::sign_generate();
        let entry = SenderEntry {
            public: public.clone(),
            secret,
        };
        let replaced = self
            .senders
            .write()
            .expect("sender registry lock poisoned")
            .insert(id.to_string(), entry)
            .is_some();
        debug!(id, replaced, "registered sender keypair");

        SenderPublic {
            id: id.to_string(),
            key: public,
        }
    }

    /// Public half of a registered recipient keypair, if present.
    pub fn recipient_public(&self, id: &str) -> Option<RecipientPublic> {
        let map = self
            .recipients
            .read()
            .expect("recipient registry lock poisoned");
        map.get(id).map(|e| RecipientPublic {
            id: id.to_string(),
            key: e.public.clone(),
        })
    }

    /// Public half of a registered sender keypair, if present.
    pub fn sender_public(&self, id: &str) -> Option<SenderPublic> {
        let map = self.senders.read().expect("sender registry lock poisoned");
        map.get(id).map(|e| SenderPublic {
            id: id.to_string(),
            key: e.public.clone(),
        })
    }

    /// Remove a recipient entry. Returns whether it existed.
    pub fn remove_recipient(&self, id: &str) -> bool {
        self.recipients
            .write()
            .expect("recipient registry lock poisoned")
            .remove(id)
            .is_some()
    }

    /// Remove a sender entry. Returns whether it existed.
    pub fn remove_sender(&self, id: &str) -> bool {
        self.senders
            .write()
            .expect("sender registry lock poisoned")
            .remove(id)
            .is_some()
    }

    /// Identifiers currently registered in the recipient namespace.
    pub fn recipient_ids(&self) -> Vec<String> {
        self.recipients
            .read()
            .expect("recipient registry lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Identifiers currently registered in the sender namespace.
    pub fn sender_ids(&self) -> Vec<String> {
        self.senders
            .read()
            .expect("sender registry lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Secret half of a recipient keypair. Engine-internal only.
    pub(crate) fn recipient_secret(&self, id: &str) -> Option<RecipientSecret> {
        let map = self
            .recipients
            .read()
            .expect("recipient registry lock poisoned");
        map.get(id).map(|e| RecipientSecret(e.secret.clone()))
    }

    /// Secret half of a sender keypair. Engine-internal only.
    pub(crate) fn sender_secret(&self, id: &str) -> Option<SenderSecret> {
        let map = self.senders.read().expect("sender registry lock poisoned");
        map.get(id).map(|e| SenderSecret(e.secret.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn namespaces_are_independent() {
        let registry = KeyRegistry::new();
        let recipient = registry.generate_recipient("X");
        let sender = registry.generate_sender("X");

        assert_eq!(recipient.id, "X");
        assert_eq!(sender.id, "X");
        assert!(registry.recipient_secret("X").is_some());
        assert!(registry.sender_secret("X").is_some());
        assert_ne!(recipient.key.len(), sender.key.len());
    }

    #[test]
    fn distinct_ids_get_distinct_keys() {
        let registry = KeyRegistry::new();
        let a = registry.generate_recipient("A");
        let b = registry.generate_recipient("B");
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn reregistration_replaces_entry() {
        let registry = KeyRegistry::new();
        let first = registry.generate_recipient("A");
        let second = registry.generate_recipient("A");

        assert_ne!(first.key, second.key);
        assert_eq!(registry.recipient_public("A").unwrap().key, second.key);
        assert_eq!(registry.recipient_ids(), vec!["A".to_string()]);
    }

    #[test]
    fn removal_forgets_entry() {
        let registry = KeyRegistry::new();
        registry.generate_sender("S1");

        assert!(registry.remove_sender("S1"));
        assert!(!registry.remove_sender("S1"));
        assert!(registry.sender_secret("S1").is_none());
    }

    #[test]
    fn lookup_of_unknown_id_is_none() {
        let registry = KeyRegistry::new();
        assert!(registry.recipient_public("ghost").is_none());
        assert!(registry.sender_public("ghost").is_none());
    }

    #[test]
    fn concurrent_generation_under_distinct_ids() {
        let registry = Arc::new(KeyRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.generate_recipient(&format!("R{i}")))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut ids = registry.recipient_ids();
        ids.sort();
        let expected: Vec<String> = (0..8).map(|i| format!("R{i}")).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn concurrent_generation_under_same_id_has_one_winner() {
        let registry = Arc::new(KeyRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.generate_recipient("shared"))
            })
            .collect();
        let returned: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // The stored key is exactly one of the generated ones, not a mix.
        let stored = registry.recipient_public("shared").unwrap();
        assert!(returned.iter().any(|r| r.key == stored.key));
        assert_eq!(registry.recipient_ids().len(), 1);
    }
}
