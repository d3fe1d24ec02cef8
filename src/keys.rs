//! Typed key material and the self-contained key blob codec.
//!
//! Keys cross the engine boundary as CBOR blobs tagged with their role, so a
//! signature verification key can never be smuggled in where a KEM key is
//! expected. Only public roles are ever serialized; secret material stays
//! inside the [`KeyRegistry`](crate::registry::KeyRegistry) as zeroizing
//! byte buffers.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::errors::SealError;
use crate::suite::{KEM_PUBLIC_LEN, SIG_PUBLIC_LEN};

/// Role-tagged wire form of a key blob.
///
/// The secret variants exist so that a blob of the wrong role decodes
/// cleanly and is rejected by the role check, rather than failing as
/// arbitrary garbage.
#[derive(Serialize, Deserialize)]
enum KeyBlob {
    KemPublic {
        id: String,
        #[serde(with = "serde_bytes")]
        key: Vec<u8>,
    },
    KemSecret {
        id: String,
        #[serde(with = "serde_bytes")]
        key: Vec<u8>,
    },
    SigPublic {
        id: String,
        #[serde(with = "serde_bytes")]
        key: Vec<u8>,
    },
    SigSecret {
        id: String,
        #[serde(with = "serde_bytes")]
        key: Vec<u8>,
    },
}

/// A recipient's public (ML-KEM-1024 encapsulation) key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientPublic {
    /// Opaque identifier chosen by the caller at registration.
    pub id: String,
    /// Raw encoded encapsulation key (1568 bytes).
    pub key: Vec<u8>,
}

impl RecipientPublic {
    /// Encode as a self-contained role-tagged blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SealError> {
        let blob = KeyBlob::KemPublic {
            id: self.id.clone(),
            key: self.key.clone(),
        };
        serde_cbor::to_vec(&blob).map_err(|_| SealError::InvalidKey)
    }

    /// Decode a role-tagged blob, rejecting wrong roles and wrong lengths.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SealError> {
        match serde_cbor::from_slice(bytes) {
            Ok(KeyBlob::KemPublic { id, key }) if key.len() == KEM_PUBLIC_LEN => {
                Ok(Self { id, key })
            }
            _ => Err(SealError::InvalidKey),
        }
    }
}

/// A sender's public (Dilithium-3 verification) key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SenderPublic {
    /// Opaque identifier chosen by the caller at registration.
    pub id: String,
    /// Raw encoded verification key (1952 bytes).
    pub key: Vec<u8>,
}

impl SenderPublic {
    /// Encode as a self-contained role-tagged blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SealError> {
        let blob = KeyBlob::SigPublic {
            id: self.id.clone(),
            key: self.key.clone(),
        };
        serde_cbor::to_vec(&blob).map_err(|_| SealError::InvalidKey)
    }

    /// Decode a role-tagged blob, rejecting wrong roles and wrong lengths.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SealError> {
        match serde_cbor::from_slice(bytes) {
            Ok(KeyBlob::SigPublic { id, key }) if key.len() == SIG_PUBLIC_LEN => {
                Ok(Self { id, key })
            }
            _ => Err(SealError::InvalidKey),
        }
    }
}

/// A recipient's ML-KEM decapsulation key. Never serialized; wiped on drop.
#[derive(Clone)]
pub struct RecipientSecret(pub(crate) Zeroizing<Vec<u8>>);

impl RecipientSecret {
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A sender's Dilithium signing key. Never serialized; wiped on drop.
#[derive(Clone)]
pub struct SenderSecret(pub(crate) Zeroizing<Vec<u8>>);

impl SenderSecret {
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
