//! The fixed primitive suite behind wire version 1.
//!
//! - ML-KEM-1024 for per-recipient key encapsulation
//! - Dilithium-3 for detached sender signatures
//! - XChaCha20-Poly1305 for payload and key-wrap AEAD
//! - HKDF-SHA256 to turn a KEM shared secret into a wrap key
//!
//! Everything here is a pure function over raw encoded key bytes; no state
//! is kept beyond the operating-system randomness consumed.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use hkdf::Hkdf;
use ml_kem::kem::{Decapsulate, Encapsulate};
use ml_kem::{Ciphertext, EncodedSizeUser, KemCore, MlKem1024};
use pqcrypto_dilithium::dilithium3 as dilithium;
use pqcrypto_traits::sign::{DetachedSignature, PublicKey as SigPublicKey, SecretKey as SigSecretKey};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::errors::SealError;

/// ML-KEM-1024 encapsulation (public) key length in bytes.
pub const KEM_PUBLIC_LEN: usize = 1568;
/// ML-KEM-1024 decapsulation (secret) key length in bytes.
pub const KEM_SECRET_LEN: usize = 3168;
/// ML-KEM-1024 ciphertext length in bytes.
pub const KEM_CIPHERTEXT_LEN: usize = 1568;
/// Dilithium-3 public key length in bytes.
pub const SIG_PUBLIC_LEN: usize = 1952;
/// Dilithium-3 secret key length in bytes.
pub const SIG_SECRET_LEN: usize = 4032;
/// Symmetric content/wrap key length in bytes.
pub const SYM_KEY_LEN: usize = 32;
/// XChaCha20-Poly1305 nonce length in bytes.
pub const NONCE_LEN: usize = 24;
/// Poly1305 authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// HKDF domain separation for deriving a wrap key from a KEM shared secret.
const WRAP_KEY_INFO: &[u8] = b"pqseal/1/wrap-key";

/* ---------------- KEM ---------------- */

/// Generate a fresh ML-KEM-1024 keypair as raw encoded bytes.
pub fn kem_generate() -> (Vec<u8>, Zeroizing<Vec<u8>>) {
    let mut rng = OsRng;
    let (dk, ek) = MlKem1024::generate(&mut rng);
    (
        ek.as_bytes().to_vec(),
        Zeroizing::new(dk.as_bytes().to_vec()),
    )
}

/// Encapsulate a fresh shared secret to the given raw public key.
///
/// Returns the KEM ciphertext and the 32-byte shared secret.
pub fn kem_encapsulate(public: &[u8]) -> Result<(Vec<u8>, Zeroizing<[u8; SYM_KEY_LEN]>), SealError> {
    let ek = <MlKem1024 as KemCore>::EncapsulationKey::from_bytes(
        &public.try_into().map_err(|_| SealError::InvalidKey)?,
    );
    let mut rng = OsRng;
    let (ct, shared) = ek.encapsulate(&mut rng).map_err(|_| SealError::InvalidKey)?;

    let mut out = Zeroizing::new([0u8; SYM_KEY_LEN]);
    out.copy_from_slice(shared.as_slice());
    Ok((ct.as_slice().to_vec(), out))
}

/// Decapsulate a KEM ciphertext with the given raw secret key.
///
/// ML-KEM rejects implicitly: a well-formed but wrong ciphertext yields a
/// pseudorandom shared secret rather than an error, so the only failure here
/// is a structurally impossible input length, reported with the same
/// undifferentiated error as every other decrypt-path failure.
pub fn kem_decapsulate(
    secret: &[u8],
    ciphertext: &[u8],
) -> Result<Zeroizing<[u8; SYM_KEY_LEN]>, SealError> {
    let dk = <MlKem1024 as KemCore>::DecapsulationKey::from_bytes(
        &secret.try_into().map_err(|_| SealError::InvalidKey)?,
    );
    let ct: Ciphertext<MlKem1024> = ciphertext
        .try_into()
        .map_err(|_| SealError::DecryptionFailed)?;
    let shared = dk.decapsulate(&ct).map_err(|_| SealError::DecryptionFailed)?;

    let mut out = Zeroizing::new([0u8; SYM_KEY_LEN]);
    out.copy_from_slice(shared.as_slice());
    Ok(out)
}

/* ---------------- Signatures ---------------- */

/// Generate a fresh Dilithium-3 keypair as raw encoded bytes.
pub fn sign_generate() -> (Vec<u8>, Zeroizing<Vec<u8>>) {
    let (pk, sk) = dilithium::keypair();
    (
        pk.as_bytes().to_vec(),
        Zeroizing::new(sk.as_bytes().to_vec()),
    )
}

/// Produce a detached Dilithium-3 signature over `message`.
pub fn sign(secret: &[u8], message: &[u8]) -> Result<Vec<u8>, SealError> {
    let sk = dilithium::SecretKey::from_bytes(secret).map_err(|_| SealError::InvalidKey)?;
    Ok(dilithium::detached_sign(message, &sk).as_bytes().to_vec())
}

/// Verify a detached Dilithium-3 signature. Malformed keys or signatures
/// verify as `false`, never as an error.
pub fn verify(public: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(pk) = dilithium::PublicKey::from_bytes(public) else {
        return false;
    };
    let Ok(sig) = dilithium::DetachedSignature::from_bytes(signature) else {
        return false;
    };
    dilithium::verify_detached_signature(&sig, message, &pk).is_ok()
}

/* ---------------- Symmetric ---------------- */

/// Derive the key-wrap key for one recipient entry from a KEM shared secret.
pub fn derive_wrap_key(shared: &[u8]) -> Zeroizing<[u8; SYM_KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(None, shared);
    let mut okm = Zeroizing::new([0u8; SYM_KEY_LEN]);
    hk.expand(WRAP_KEY_INFO, okm.as_mut_slice())
        .expect("HKDF expand");
    okm
}

/// AEAD-seal `plaintext` under `key` with the given nonce and associated
/// data. The cipher-level error is unreachable for inputs this crate can
/// construct; it is surfaced as `InvalidKey` rather than a decrypt-path kind.
pub fn aead_seal(
    key: &[u8; SYM_KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, SealError> {
    let cipher = XChaCha20Poly1305::new(key.into());
    cipher
        .encrypt(
            XNonce::from_slice(nonce),
            chacha20poly1305::aead::Payload { msg: plaintext, aad },
        )
        .map_err(|_| SealError::InvalidKey)
}

/// AEAD-open `ciphertext`; authentication failure is `DecryptionFailed`.
pub fn aead_open(
    key: &[u8; SYM_KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, SealError> {
    let cipher = XChaCha20Poly1305::new(key.into());
    cipher
        .decrypt(
            XNonce::from_slice(nonce),
            chacha20poly1305::aead::Payload { msg: ciphertext, aad },
        )
        .map_err(|_| SealError::DecryptionFailed)
}

/// Fresh random 32-byte symmetric key.
pub fn random_key32() -> Zeroizing<[u8; SYM_KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; SYM_KEY_LEN]);
    OsRng.fill_bytes(key.as_mut_slice());
    key
}

/// Fresh random 24-byte AEAD nonce.
pub fn random_nonce24() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}
