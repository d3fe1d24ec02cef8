//! # pqseal
//!
//! Post-quantum multi-recipient encryption with sender authentication and
//! a stable, versioned wire format.
//!
//! ## Algorithm Suite
//!
//! - **Key Encapsulation:** ML-KEM-1024 for per-recipient key wrapping
//! - **Symmetric Encryption:** XChaCha20-Poly1305 for payload and content-key wrap
//! - **Digital Signatures:** Dilithium-3 for sender authentication
//! - **Wire Format:** canonical length-prefixed binary, version 1
//!
//! ## Design
//!
//! One `encrypt` call draws a fresh 32-byte content key, seals the payload
//! under it, encapsulates it once per recipient via ML-KEM, and signs the
//! whole construction with the sender's Dilithium key. Every recipient
//! independently recovers the payload from the same envelope; decryption
//! verifies the signature against a caller-supplied allow-list of sender
//! keys. Keypairs live in an explicit [`KeyRegistry`]; secret keys never
//! leave it.
//!
//! ## Example
//!
//! ```rust
//! use pqseal::{decrypt, encrypt, KeyRegistry};
//!
//! # fn main() -> Result<(), pqseal::SealError> {
//! let registry = KeyRegistry::new();
//!
//! // Generate recipient and sender keypairs.
//! let alice = registry.generate_recipient("alice");
//! let bob = registry.generate_recipient("bob");
//! let sender = registry.generate_sender("S1");
//!
//! // Encrypt once for both recipients.
//! let recipients = vec![alice.to_bytes()?, bob.to_bytes()?];
//! let wire = encrypt(&registry, b"hello, post-quantum world", "S1", &recipients)?;
//!
//! // Each recipient decrypts independently, checking the sender allow-list.
//! let allowed = vec![sender.to_bytes()?];
//! assert_eq!(decrypt(&registry, &wire, "alice", &allowed)?, b"hello, post-quantum world");
//! assert_eq!(decrypt(&registry, &wire, "bob", &allowed)?, b"hello, post-quantum world");
//! # Ok(())
//! # }
//! ```
//!
//! ## Security Considerations
//!
//! - The allow-list is the trust decision: any presented sender key is
//!   treated as trusted input, so manage that list carefully.
//! - Decryption failures are deliberately undifferentiated; callers cannot
//!   (and attackers must not) learn which check failed.
//! - Envelope bytes are parsed defensively and may come from anywhere;
//!   secret keys must come from this process's registry.
//!
//! ## License
//!
//! Licensed under the Apache License, Version 2.0.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod engine;
mod errors;
mod keys;
mod registry;
mod suite;
mod wire;

pub use engine::{decrypt, encrypt};
pub use errors::SealError;
pub use keys::{RecipientPublic, RecipientSecret, SenderPublic, SenderSecret};
pub use registry::KeyRegistry;
pub use suite::{
    KEM_CIPHERTEXT_LEN, KEM_PUBLIC_LEN, KEM_SECRET_LEN, NONCE_LEN, SIG_PUBLIC_LEN, SIG_SECRET_LEN,
    SYM_KEY_LEN, TAG_LEN,
};
pub use wire::{Envelope, RecipientEntry, MAX_HINT_LEN, MAX_RECIPIENTS, WIRE_VERSION, WRAPPED_KEY_LEN};
