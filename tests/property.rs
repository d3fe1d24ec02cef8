#![allow(clippy::unwrap_used)] // unwrap() is idiomatic in property tests

use pqseal::{decrypt, encrypt, Envelope, KeyRegistry, SealError, WIRE_VERSION};
use proptest::prelude::*;

// ============================================================================
// Property: Round-trip encryption/decryption
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_encrypt_decrypt_roundtrip(
        message in prop::collection::vec(any::<u8>(), 0..10000),
        recipient_id in "[A-Za-z0-9_]{1,20}",
        sender_id in "[A-Za-z0-9_]{1,20}",
    ) {
        let registry = KeyRegistry::new();
        let recipient = registry.generate_recipient(&recipient_id).to_bytes().unwrap();
        let sender = registry.generate_sender(&sender_id).to_bytes().unwrap();

        let wire = encrypt(&registry, &message, &sender_id, &[recipient])?;
        let decrypted = decrypt(&registry, &wire, &recipient_id, &[sender])?;

        prop_assert_eq!(decrypted, message);
    }

    #[test]
    fn prop_all_recipients_can_decrypt(
        message in prop::collection::vec(any::<u8>(), 0..1000),
        num_recipients in 1usize..8,
    ) {
        let registry = KeyRegistry::new();
        let sender = registry.generate_sender("SENDER").to_bytes().unwrap();

        let ids: Vec<String> = (0..num_recipients).map(|i| format!("R{i}")).collect();
        let recipients: Vec<Vec<u8>> = ids
            .iter()
            .map(|id| registry.generate_recipient(id).to_bytes().unwrap())
            .collect();

        // Encrypt once for all recipients
        let wire = encrypt(&registry, &message, "SENDER", &recipients)?;

        // All recipients should be able to decrypt
        for id in &ids {
            let decrypted = decrypt(&registry, &wire, id, &[sender.clone()])?;
            prop_assert_eq!(&decrypted, &message);
        }
    }

    #[test]
    fn prop_excluded_recipient_cannot_decrypt(
        message in prop::collection::vec(any::<u8>(), 1..1000),
        recipient_id in "[A-Za-z0-9_]{1,20}",
        excluded_id in "[A-Za-z0-9_]{1,20}",
        sender_id in "[A-Za-z0-9_]{1,20}",
    ) {
        prop_assume!(recipient_id != excluded_id);

        let registry = KeyRegistry::new();
        let recipient = registry.generate_recipient(&recipient_id).to_bytes().unwrap();
        registry.generate_recipient(&excluded_id);
        let sender = registry.generate_sender(&sender_id).to_bytes().unwrap();

        // Encrypt for recipient_id only
        let wire = encrypt(&registry, &message, &sender_id, &[recipient])?;

        let result = decrypt(&registry, &wire, &excluded_id, &[sender]);
        prop_assert_eq!(result, Err(SealError::DecryptionFailed));
    }

    #[test]
    fn prop_disallowed_sender_rejected(
        message in prop::collection::vec(any::<u8>(), 1..1000),
        recipient_id in "[A-Za-z0-9_]{1,20}",
        sender_id in "[A-Za-z0-9_]{1,20}",
        other_sender_id in "[A-Za-z0-9_]{1,20}",
    ) {
        prop_assume!(sender_id != other_sender_id);

        let registry = KeyRegistry::new();
        let recipient = registry.generate_recipient(&recipient_id).to_bytes().unwrap();
        registry.generate_sender(&sender_id);
        let other_sender = registry.generate_sender(&other_sender_id).to_bytes().unwrap();

        // Only other_sender is allowed; encrypt as sender_id
        let wire = encrypt(&registry, &message, &sender_id, &[recipient])?;

        let result = decrypt(&registry, &wire, &recipient_id, &[other_sender]);
        prop_assert_eq!(result, Err(SealError::DecryptionFailed));
    }

    #[test]
    fn prop_different_encryptions_different_wire(
        message in prop::collection::vec(any::<u8>(), 1..1000),
        recipient_id in "[A-Za-z0-9_]{1,20}",
        sender_id in "[A-Za-z0-9_]{1,20}",
    ) {
        let registry = KeyRegistry::new();
        let recipient = registry.generate_recipient(&recipient_id).to_bytes().unwrap();
        let sender = registry.generate_sender(&sender_id).to_bytes().unwrap();

        let wire1 = encrypt(&registry, &message, &sender_id, &[recipient.clone()])?;
        let wire2 = encrypt(&registry, &message, &sender_id, &[recipient])?;

        // Fresh content key and nonces every call
        prop_assert_ne!(&wire1, &wire2);

        // Both still decrypt to the same plaintext
        let pt1 = decrypt(&registry, &wire1, &recipient_id, &[sender.clone()])?;
        let pt2 = decrypt(&registry, &wire2, &recipient_id, &[sender])?;
        prop_assert_eq!(&pt1, &message);
        prop_assert_eq!(&pt2, &message);
    }

    #[test]
    fn prop_wire_decodes_to_well_formed_envelope(
        message in prop::collection::vec(any::<u8>(), 0..1000),
        recipient_id in "[A-Za-z0-9_]{1,20}",
        sender_id in "[A-Za-z0-9_]{1,20}",
    ) {
        let registry = KeyRegistry::new();
        let recipient = registry.generate_recipient(&recipient_id).to_bytes().unwrap();
        registry.generate_sender(&sender_id);

        let wire = encrypt(&registry, &message, &sender_id, &[recipient])?;
        let envelope = Envelope::decode(&wire).unwrap();

        prop_assert_eq!(envelope.version, WIRE_VERSION);
        prop_assert_eq!(envelope.entries.len(), 1);
        prop_assert_eq!(&envelope.entries[0].hint, &recipient_id);
        prop_assert!(!envelope.signature.is_empty());
        // Re-encoding reproduces the wire bytes exactly (canonical form)
        prop_assert_eq!(envelope.encode(), wire);
    }

    #[test]
    fn prop_corrupted_wire_fails(
        message in prop::collection::vec(any::<u8>(), 1..1000),
        recipient_id in "[A-Za-z0-9_]{1,20}",
        sender_id in "[A-Za-z0-9_]{1,20}",
        corruption_pos in 0usize..10000,
        corruption_mask in 1u8..=255,
    ) {
        let registry = KeyRegistry::new();
        let recipient = registry.generate_recipient(&recipient_id).to_bytes().unwrap();
        let sender = registry.generate_sender(&sender_id).to_bytes().unwrap();

        let wire = encrypt(&registry, &message, &sender_id, &[recipient])?;

        if corruption_pos < wire.len() {
            let mut corrupted = wire.clone();
            corrupted[corruption_pos] ^= corruption_mask;

            let result = decrypt(&registry, &corrupted, &recipient_id, &[sender]);
            prop_assert!(result.is_err());
        }
    }

    #[test]
    fn prop_key_generation_unique(
        id1 in "[A-Za-z0-9_]{1,20}",
        id2 in "[A-Za-z0-9_]{1,20}",
    ) {
        let registry = KeyRegistry::new();
        let pub1 = registry.generate_recipient(&id1);
        let pub2 = registry.generate_recipient(&id2);

        // Even under the same identifier, generation is random
        prop_assert_ne!(pub1.key, pub2.key);
    }
}
