//! Encryption and decryption engines.
//!
//! Both are stateless orchestrations over the primitive suite: the only
//! shared state they touch is the [`KeyRegistry`] they are handed, and the
//! only side effect is randomness consumption. Calls may run fully in
//! parallel.

use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::errors::SealError;
use crate::keys::{RecipientPublic, SenderPublic};
use crate::registry::KeyRegistry;
use crate::suite;
use crate::suite::SYM_KEY_LEN;
use crate::wire::{Envelope, RecipientEntry, MAX_HINT_LEN, MAX_RECIPIENTS, WIRE_VERSION};

/// Associated data binding wrapped content keys to wire version 1.
const WRAP_AAD: &[u8] = b"pqseal/1/wrap";

/// Associated data binding the payload to wire version 1.
const PAYLOAD_AAD: &[u8] = b"pqseal/1/payload";

/// Encrypt `plaintext` once for every key in `recipient_keys` and sign the
/// envelope as `sender_id`.
///
/// `recipient_keys` are self-contained blobs as produced by
/// [`RecipientPublic::to_bytes`]. Entry order in the envelope is input
/// order. A fresh content key and fresh nonces are drawn on every call, so
/// repeated calls with identical inputs yield different ciphertext.
pub fn encrypt<B: AsRef<[u8]>>(
    registry: &KeyRegistry,
    plaintext: &[u8],
    sender_id: &str,
    recipient_keys: &[B],
) -> Result<Vec<u8>, SealError> {
    let sender = registry
        .sender_secret(sender_id)
        .ok_or_else(|| SealError::UnknownSender(sender_id.to_string()))?;
    if recipient_keys.is_empty() {
        return Err(SealError::EmptyRecipientList);
    }
    // The decoder caps entry counts; refuse up front anything it would
    // reject, before any KEM work is done.
    if recipient_keys.len() > MAX_RECIPIENTS {
        return Err(SealError::TooManyRecipients);
    }

    // Single-use content key: encapsulated per recipient, then discarded.
    let content_key = suite::random_key32();

    let mut entries = Vec::with_capacity(recipient_keys.len());
    for (index, blob) in recipient_keys.iter().enumerate() {
        let public = RecipientPublic::from_bytes(blob.as_ref())
            .map_err(|_| SealError::InvalidRecipientKey { index })?;
        let (kem_ciphertext, shared) = suite::kem_encapsulate(&public.key)
            .map_err(|_| SealError::InvalidRecipientKey { index })?;

        let wrap_key = suite::derive_wrap_key(shared.as_slice());
        let wrap_nonce = suite::random_nonce24();
        let wrapped_key = suite::aead_seal(&wrap_key, &wrap_nonce, WRAP_AAD, content_key.as_slice())?;

        // Hints are advisory; an identifier the wire format cannot carry is
        // omitted rather than failing the call or truncating mid-character.
        let hint = if public.id.len() <= MAX_HINT_LEN {
            public.id
        } else {
            String::new()
        };

        entries.push(RecipientEntry {
            hint,
            kem_ciphertext,
            wrap_nonce,
            wrapped_key,
        });
    }

    let payload_nonce = suite::random_nonce24();
    let payload = suite::aead_seal(&content_key, &payload_nonce, PAYLOAD_AAD, plaintext)?;

    let mut envelope = Envelope {
        version: WIRE_VERSION,
        entries,
        payload_nonce,
        payload,
        signature: Vec::new(),
    };
    envelope.signature = suite::sign(sender.as_bytes(), &envelope.signed_bytes())?;

    debug!(
        sender = sender_id,
        recipients = envelope.entries.len(),
        payload_len = plaintext.len(),
        "sealed envelope"
    );
    Ok(envelope.encode())
}

/// Decrypt `envelope_bytes` as `recipient_id`, accepting only envelopes
/// signed by a key in `allowed_sender_keys`.
///
/// `allowed_sender_keys` are blobs as produced by
/// [`SenderPublic::to_bytes`]; an empty allow-list fails unconditionally.
/// Recipient entries are tried in envelope order without trusting the
/// identifier hint, and payload authentication is the only oracle for
/// which entry was ours. Signature and payload checks are both evaluated
/// and their failures are indistinguishable.
pub fn decrypt<B: AsRef<[u8]>>(
    registry: &KeyRegistry,
    envelope_bytes: &[u8],
    recipient_id: &str,
    allowed_sender_keys: &[B],
) -> Result<Vec<u8>, SealError> {
    let envelope = Envelope::decode(envelope_bytes)?;
    let secret = registry
        .recipient_secret(recipient_id)
        .ok_or_else(|| SealError::UnknownRecipient(recipient_id.to_string()))?;

    let allowed = allowed_sender_keys
        .iter()
        .map(|blob| SenderPublic::from_bytes(blob.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    // Trial decapsulation over every entry. Decapsulation itself cannot
    // fail observably (ML-KEM rejects implicitly), so an entry is ours only
    // if both the key unwrap and the payload authenticate.
    let mut plaintext = None;
    for (index, entry) in envelope.entries.iter().enumerate() {
        let Ok(shared) = suite::kem_decapsulate(secret.as_bytes(), &entry.kem_ciphertext) else {
            continue;
        };
        let wrap_key = suite::derive_wrap_key(shared.as_slice());
        let Ok(key_bytes) = suite::aead_open(&wrap_key, &entry.wrap_nonce, WRAP_AAD, &entry.wrapped_key)
        else {
            continue;
        };
        let key_bytes = Zeroizing::new(key_bytes);
        if key_bytes.len() != SYM_KEY_LEN {
            continue;
        }
        let mut content_key = Zeroizing::new([0u8; SYM_KEY_LEN]);
        content_key.copy_from_slice(&key_bytes);

        if let Ok(opened) = suite::aead_open(
            &content_key,
            &envelope.payload_nonce,
            PAYLOAD_AAD,
            &envelope.payload,
        ) {
            trace!(recipient = recipient_id, entry = index, "payload authenticated");
            plaintext = Some(opened);
            break;
        }
    }

    // Always evaluated, independent of whether the payload opened.
    let signed = envelope.signed_bytes();
    let signature_ok = allowed
        .iter()
        .any(|sender| suite::verify(&sender.key, &signed, &envelope.signature));

    match (plaintext, signature_ok) {
        (Some(plaintext), true) => Ok(plaintext),
        _ => Err(SealError::DecryptionFailed),
    }
}
