//! pqseal demo
//! Multi-recipient encryption walkthrough:
//! - ML-KEM-1024 per-recipient key encapsulation
//! - XChaCha20-Poly1305 payload encryption
//! - Dilithium-3 sender signatures over a canonical binary envelope

use pqseal::{decrypt, encrypt, KeyRegistry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = KeyRegistry::new();

    // --- 1. Register recipients (A, B, C) ---
    let pub_a = registry.generate_recipient("A");
    let pub_b = registry.generate_recipient("B");
    let pub_c = registry.generate_recipient("C");

    println!("Recipients:");
    for public in [&pub_a, &pub_b, &pub_c] {
        println!("  {}: {} bytes public key", public.id, public.key.len());
    }

    // --- 2. Register senders (S1, S2) ---
    let s1 = registry.generate_sender("S1");
    let s2 = registry.generate_sender("S2");
    println!("\nSenders: S1 + S2 generated (Dilithium-3)");

    // --- 3. Encrypt one message for A, B, and C ---
    let message = b"one envelope, three recipients";
    let recipients = vec![pub_a.to_bytes()?, pub_b.to_bytes()?, pub_c.to_bytes()?];
    let wire = encrypt(&registry, message, "S1", &recipients)?;
    println!("\nEnvelope size: {} bytes", wire.len());

    // --- 4. Each recipient decrypts with the S1 allow-list ---
    let allowed = vec![s1.to_bytes()?];
    for id in ["A", "B", "C"] {
        let plaintext = decrypt(&registry, &wire, id, &allowed)?;
        println!("Recipient {id} decrypted: {}", String::from_utf8_lossy(&plaintext));
        assert_eq!(plaintext, message);
    }

    // --- 5. A sender outside the allow-list is rejected ---
    println!("\nTesting sender allow-list rejection...");
    let wire_bad = encrypt(&registry, b"forbidden", "S1", &[pub_a.to_bytes()?])?;
    let only_s2 = vec![s2.to_bytes()?];
    let rejected = decrypt(&registry, &wire_bad, "A", &only_s2);
    assert!(rejected.is_err());
    println!("Disallowed sender rejected as expected: {:?}", rejected.unwrap_err());

    println!("\nAll steps completed.");
    Ok(())
}
