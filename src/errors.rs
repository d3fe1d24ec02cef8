//! Error types for pqseal operations.

use thiserror::Error;

/// Errors that can occur during key handling, envelope coding, encryption,
/// or decryption.
///
/// Authentication failures on the decrypt path are deliberately collapsed
/// into [`SealError::DecryptionFailed`]: callers cannot tell a wrong
/// recipient key from a forged signature from a tampered payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SealError {
    /// A key blob is malformed, has the wrong length for its role, or was
    /// presented for a role it does not belong to.
    #[error("invalid key material")]
    InvalidKey,

    /// No sender keypair is registered under this identifier.
    #[error("unknown sender {0:?}")]
    UnknownSender(String),

    /// No recipient keypair is registered under this identifier.
    #[error("unknown recipient {0:?}")]
    UnknownRecipient(String),

    /// Encryption was requested with an empty recipient list.
    #[error("recipient list is empty")]
    EmptyRecipientList,

    /// Encryption was requested for more recipients than an envelope can
    /// carry ([`MAX_RECIPIENTS`](crate::MAX_RECIPIENTS)).
    #[error("recipient list exceeds envelope capacity")]
    TooManyRecipients,

    /// A recipient public key in the encryption input could not be decoded
    /// or used for encapsulation.
    #[error("invalid recipient key at index {index}")]
    InvalidRecipientKey {
        /// Zero-based position in the caller-supplied recipient list.
        index: usize,
    },

    /// The envelope bytes are truncated, carry an inconsistent length
    /// field, or are otherwise not a well-formed envelope.
    #[error("malformed envelope: {0}")]
    Format(&'static str),

    /// The envelope declares a format version this build cannot interpret.
    #[error("unsupported envelope version {0}")]
    UnsupportedVersion(u16),

    /// No recipient entry yielded an authenticating payload, or the sender
    /// signature did not verify against the allow-list. The two cases are
    /// intentionally indistinguishable.
    #[error("decryption failed")]
    DecryptionFailed,
}
