// ABOUTME: SSH credential payload and the folder-scoped credentials manager trait.
// ABOUTME: Payload field names follow the Jenkins BasicSSHUserPrivateKey form.

use crate::error::{ClientError, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Jenkins class of an "SSH Username with private key" credential.
pub const SSH_CREDENTIALS_CLASS: &str =
    "com.cloudbees.jenkins.plugins.sshcredentials.impl.BasicSSHUserPrivateKey";

/// Jenkins class of a private key entered inline.
pub const KEY_SOURCE_DIRECT_ENTRY_CLASS: &str = "com.cloudbees.jenkins.plugins.sshcredentials.impl.BasicSSHUserPrivateKey$DirectEntryPrivateKeySource";

/// Where Jenkins takes the private key material from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawKeySource", into = "RawKeySource")]
pub enum PrivateKeySource {
    /// Key material supplied inline with the credential.
    DirectEntry(SecretString),
}

impl PrivateKeySource {
    pub fn direct_entry(key: impl Into<String>) -> Self {
        Self::DirectEntry(SecretString::from(key.into()))
    }

    /// The Jenkins `stapler-class` of this source.
    pub fn class(&self) -> &'static str {
        match self {
            Self::DirectEntry(_) => KEY_SOURCE_DIRECT_ENTRY_CLASS,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawKeySource {
    #[serde(rename = "stapler-class")]
    class: String,
    #[serde(rename = "privateKey", default)]
    private_key: String,
}

impl From<PrivateKeySource> for RawKeySource {
    fn from(source: PrivateKeySource) -> Self {
        let class = source.class().to_string();
        match source {
            PrivateKeySource::DirectEntry(key) => RawKeySource {
                class,
                private_key: key.expose_secret().to_string(),
            },
        }
    }
}

impl TryFrom<RawKeySource> for PrivateKeySource {
    type Error = ClientError;

    fn try_from(raw: RawKeySource) -> Result<Self> {
        if raw.class == KEY_SOURCE_DIRECT_ENTRY_CLASS {
            Ok(PrivateKeySource::direct_entry(raw.private_key))
        } else {
            Err(ClientError::InvalidResponse(format!(
                "unsupported private key source: {}",
                raw.class
            )))
        }
    }
}

/// An "SSH Username with private key" credential as exchanged with Jenkins.
///
/// Secrets are held as [`SecretString`] so `Debug` output never shows them.
/// When Jenkins returns a credential it replaces secret values with opaque
/// placeholders, so the secret fields of a fetched credential carry no
/// usable material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshCredentials {
    #[serde(rename = "stapler-class", default = "ssh_credentials_class")]
    pub class: String,
    pub id: String,
    pub scope: String,
    #[serde(default)]
    pub description: String,
    pub username: String,
    #[serde(rename = "privateKeySource")]
    pub private_key_source: PrivateKeySource,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_optional",
        deserialize_with = "protect_optional"
    )]
    pub passphrase: Option<SecretString>,
}

fn ssh_credentials_class() -> String {
    SSH_CREDENTIALS_CLASS.to_string()
}

impl SshCredentials {
    pub fn new(
        id: impl Into<String>,
        scope: impl Into<String>,
        username: impl Into<String>,
        private_key_source: PrivateKeySource,
    ) -> Self {
        Self {
            class: ssh_credentials_class(),
            id: id.into(),
            scope: scope.into(),
            description: String::new(),
            username: username.into(),
            private_key_source,
            passphrase: None,
        }
    }
}

fn expose_optional<S: Serializer>(
    value: &Option<SecretString>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(secret) => serializer.serialize_some(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

fn protect_optional<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<SecretString>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(SecretString::from))
}

/// Credential store operations, scoped to a folder.
///
/// `folder` is the Jenkins path of the owning folder as produced by
/// [`crate::format_folder_name`]; an empty string addresses the root store.
/// `domain` is the credential domain (`_` is the global domain).
#[async_trait]
pub trait CredentialsManager: Send + Sync {
    /// Create a new credential in `domain`.
    async fn add(&self, folder: &str, domain: &str, credential: &SshCredentials) -> Result<()>;

    /// Fetch one credential by id.
    async fn get_single(&self, folder: &str, domain: &str, id: &str) -> Result<SshCredentials>;

    /// Overwrite every field of an existing credential.
    async fn update(
        &self,
        folder: &str,
        domain: &str,
        id: &str,
        credential: &SshCredentials,
    ) -> Result<()>;

    /// Remove a credential.
    async fn delete(&self, folder: &str, domain: &str, id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SshCredentials {
        let mut cred = SshCredentials::new(
            "deploy-key",
            "GLOBAL",
            "git",
            PrivateKeySource::direct_entry("-----BEGIN KEY-----"),
        );
        cred.description = "Managed by Terraform".to_string();
        cred
    }

    #[test]
    fn test_serialize_uses_jenkins_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["stapler-class"], SSH_CREDENTIALS_CLASS);
        assert_eq!(json["id"], "deploy-key");
        assert_eq!(json["scope"], "GLOBAL");
        assert_eq!(json["username"], "git");
        assert_eq!(
            json["privateKeySource"]["stapler-class"],
            KEY_SOURCE_DIRECT_ENTRY_CLASS
        );
        assert_eq!(json["privateKeySource"]["privateKey"], "-----BEGIN KEY-----");
    }

    #[test]
    fn test_serialize_omits_missing_passphrase() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("passphrase").is_none());
    }

    #[test]
    fn test_serialize_includes_passphrase() {
        let mut cred = sample();
        cred.passphrase = Some(SecretString::from("hunter2".to_string()));
        let json = serde_json::to_value(cred).unwrap();
        assert_eq!(json["passphrase"], "hunter2");
    }

    #[test]
    fn test_deserialize_from_jenkins() {
        let json = r#"{
            "id": "deploy-key",
            "scope": "SYSTEM",
            "username": "git",
            "privateKeySource": {
                "stapler-class": "com.cloudbees.jenkins.plugins.sshcredentials.impl.BasicSSHUserPrivateKey$DirectEntryPrivateKeySource",
                "privateKey": "{AQAAABAAAA}"
            }
        }"#;
        let cred: SshCredentials = serde_json::from_str(json).unwrap();
        assert_eq!(cred.class, SSH_CREDENTIALS_CLASS);
        assert_eq!(cred.scope, "SYSTEM");
        assert_eq!(cred.description, "");
        assert!(cred.passphrase.is_none());
    }

    #[test]
    fn test_deserialize_rejects_unknown_key_source() {
        let json = r#"{
            "id": "k",
            "scope": "GLOBAL",
            "username": "git",
            "privateKeySource": { "stapler-class": "FileOnMasterKeySource" }
        }"#;
        let err = serde_json::from_str::<SshCredentials>(json).unwrap_err();
        assert!(err.to_string().contains("unsupported private key source"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut cred = sample();
        cred.passphrase = Some(SecretString::from("hunter2".to_string()));
        let debug = format!("{:?}", cred);
        assert!(!debug.contains("BEGIN KEY"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("deploy-key"));
    }
}
