//! Versioned binary envelope format.
//!
//! The envelope is the complete output of one encryption call: the format
//! version, one entry per recipient, the sealed payload, and the sender
//! signature. The encoding is canonical: fixed field order, big-endian
//! integers, explicit or fixed lengths, no delimiters. Every logical
//! envelope has exactly one byte representation, and that injectivity is
//! what makes the detached signature meaningful: the signed byte string
//! can be re-derived exactly by any decoder.
//!
//! Layout (version 1):
//!
//! ```text
//! u16   version
//! u32   recipient entry count
//! entry × count:
//!   u16    hint length, then hint bytes (UTF-8, may be empty)
//!   [1568] KEM ciphertext
//!   [24]   wrap nonce
//!   u32    wrapped key length (always 48), then wrapped content key
//! [24]  payload nonce
//! u64   payload length, then payload ciphertext
//! u32   signature length, then signature
//! ```
//!
//! Everything up to (not including) the signature length is the signed
//! byte string. Decoding is defensive: every declared length is checked
//! against the remaining input before anything is allocated, entry counts
//! are capped, and trailing bytes are rejected.

use crate::errors::SealError;
use crate::suite::{KEM_CIPHERTEXT_LEN, NONCE_LEN, SYM_KEY_LEN, TAG_LEN};

/// The only wire version this build can produce or interpret.
pub const WIRE_VERSION: u16 = 1;

/// Upper bound on per-envelope recipient entries.
pub const MAX_RECIPIENTS: usize = 4096;

/// Upper bound on the per-entry identifier hint, in bytes.
pub const MAX_HINT_LEN: usize = 255;

/// Length of an AEAD-wrapped 32-byte content key (key + tag).
pub const WRAPPED_KEY_LEN: usize = SYM_KEY_LEN + TAG_LEN;

/// Smallest possible encoded recipient entry (empty hint).
const MIN_ENTRY_LEN: usize = 2 + KEM_CIPHERTEXT_LEN + NONCE_LEN + 4 + WRAPPED_KEY_LEN;

/// One recipient's share of the envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientEntry {
    /// Recipient identifier hint. Advisory only: decryption never trusts it
    /// for entry selection. Empty means "no hint". Hints longer than
    /// [`MAX_HINT_LEN`] are not encodable (the decoder rejects them), so
    /// the encryption engine omits hints for identifiers that size.
    pub hint: String,
    /// ML-KEM ciphertext encapsulating this entry's shared secret.
    pub kem_ciphertext: Vec<u8>,
    /// Nonce under which the content key was wrapped.
    pub wrap_nonce: [u8; NONCE_LEN],
    /// Content key sealed under the KDF of the shared secret.
    pub wrapped_key: Vec<u8>,
}

/// Decoded wire envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// Format version (always [`WIRE_VERSION`] after a successful decode).
    pub version: u16,
    /// Recipient entries in the order the encryptor supplied them.
    pub entries: Vec<RecipientEntry>,
    /// Nonce under which the payload was sealed.
    pub payload_nonce: [u8; NONCE_LEN],
    /// Sealed payload (ciphertext + tag).
    pub payload: Vec<u8>,
    /// Detached sender signature over the signed byte string.
    pub signature: Vec<u8>,
}

impl Envelope {
    /// The canonical byte string covered by the signature: the full
    /// encoding minus the trailing signature field.
    pub fn signed_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.version.to_be_bytes());
        buf.extend_from_slice(&(self.entries.len() as u32).to_be_bytes());
        for entry in &self.entries {
            buf.extend_from_slice(&(entry.hint.len() as u16).to_be_bytes());
            buf.extend_from_slice(entry.hint.as_bytes());
            buf.extend_from_slice(&entry.kem_ciphertext);
            buf.extend_from_slice(&entry.wrap_nonce);
            buf.extend_from_slice(&(entry.wrapped_key.len() as u32).to_be_bytes());
            buf.extend_from_slice(&entry.wrapped_key);
        }
        buf.extend_from_slice(&self.payload_nonce);
        buf.extend_from_slice(&(self.payload.len() as u64).to_be_bytes());
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Serialize to canonical wire bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = self.signed_bytes();
        buf.extend_from_slice(&(self.signature.len() as u32).to_be_bytes());
        buf.extend_from_slice(&self.signature);
        buf
    }

    /// Parse wire bytes, rejecting anything that is not a well-formed
    /// version-1 envelope.
    pub fn decode(bytes: &[u8]) -> Result<Self, SealError> {
        let mut r = Reader::new(bytes);

        let version = r.u16("version")?;
        if version != WIRE_VERSION {
            return Err(SealError::UnsupportedVersion(version));
        }

        let count = r.u32("recipient count")? as usize;
        if count == 0 || count > MAX_RECIPIENTS {
            return Err(SealError::Format("recipient count out of range"));
        }
        // Each declared entry needs at least MIN_ENTRY_LEN bytes of input,
        // so a forged count cannot drive allocation past the input size.
        if count.saturating_mul(MIN_ENTRY_LEN) > r.remaining() {
            return Err(SealError::Format("recipient count exceeds input"));
        }

        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let hint_len = r.u16("hint length")? as usize;
            if hint_len > MAX_HINT_LEN {
                return Err(SealError::Format("hint too long"));
            }
            let hint = std::str::from_utf8(r.take(hint_len, "hint")?)
                .map_err(|_| SealError::Format("hint is not UTF-8"))?
                .to_string();

            let kem_ciphertext = r.take(KEM_CIPHERTEXT_LEN, "kem ciphertext")?.to_vec();
            let wrap_nonce = r.nonce("wrap nonce")?;

            let wrapped_len = r.u32("wrapped key length")? as usize;
            if wrapped_len != WRAPPED_KEY_LEN {
                return Err(SealError::Format("wrapped key length"));
            }
            let wrapped_key = r.take(wrapped_len, "wrapped key")?.to_vec();

            entries.push(RecipientEntry {
                hint,
                kem_ciphertext,
                wrap_nonce,
                wrapped_key,
            });
        }

        let payload_nonce = r.nonce("payload nonce")?;
        let payload_len = r.u64("payload length")?;
        let payload_len =
            usize::try_from(payload_len).map_err(|_| SealError::Format("payload length"))?;
        if payload_len > r.remaining() {
            return Err(SealError::Format("payload length exceeds input"));
        }
        let payload = r.take(payload_len, "payload")?.to_vec();

        let sig_len = r.u32("signature length")? as usize;
        if sig_len > r.remaining() {
            return Err(SealError::Format("signature length exceeds input"));
        }
        let signature = r.take(sig_len, "signature")?.to_vec();

        if r.remaining() != 0 {
            return Err(SealError::Format("trailing bytes"));
        }

        Ok(Self {
            version,
            entries,
            payload_nonce,
            payload,
            signature,
        })
    }
}

/// Cursor over untrusted input. Every read names the field it was parsing
/// so truncation errors stay diagnosable.
struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn remaining(&self) -> usize {
        self.buf.len()
    }

    fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], SealError> {
        if n > self.buf.len() {
            return Err(SealError::Format(field));
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn u16(&mut self, field: &'static str) -> Result<u16, SealError> {
        let b = self.take(2, field)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self, field: &'static str) -> Result<u32, SealError> {
        let b = self.take(4, field)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u64(&mut self, field: &'static str) -> Result<u64, SealError> {
        let b = self.take(8, field)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn nonce(&mut self, field: &'static str) -> Result<[u8; NONCE_LEN], SealError> {
        let b = self.take(NONCE_LEN, field)?;
        let mut out = [0u8; NONCE_LEN];
        out.copy_from_slice(b);
        Ok(out)
    }
}
