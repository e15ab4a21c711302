// ABOUTME: Inspects private key material without exposing it.
// ABOUTME: Yields the algorithm and SHA256 fingerprint of OpenSSH keys for logging.

use ssh_key::{HashAlg, PrivateKey};

/// Non-secret facts about a private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// SSH algorithm name (e.g., "ssh-ed25519")
    pub algorithm: String,
    /// Public key fingerprint in ssh-keygen form ("SHA256:...")
    pub fingerprint: String,
    /// Whether the key is protected by a passphrase
    pub encrypted: bool,
}

/// Inspect OpenSSH-format key material.
///
/// Encrypted keys are not decrypted; their public half is stored in clear.
/// Returns `None` for material that is not an OpenSSH private key, such as
/// PEM/PKCS#1 keys, which Jenkins also accepts.
pub fn inspect_private_key(material: &str) -> Option<KeyInfo> {
    let key = PrivateKey::from_openssh(material.trim()).ok()?;

    Some(KeyInfo {
        algorithm: key.algorithm().as_str().to_string(),
        fingerprint: key.public_key().fingerprint(HashAlg::Sha256).to_string(),
        encrypted: key.is_encrypted(),
    })
}
