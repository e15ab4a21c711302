// ABOUTME: Desired and observed state of an SSH credential resource.
// ABOUTME: Builds the remote payload; secret fields stay wrapped in SecretString.

use crate::error::{ResourceError, Result};
use crate::id::CredentialId;
use crate::schema::{CredentialScope, DEFAULT_DESCRIPTION, DEFAULT_DOMAIN};
use jenkins_client::{PrivateKeySource, SshCredentials, format_folder_name};
use secrecy::{ExposeSecret, SecretString};

/// State of one `jenkins_credential_ssh` resource.
///
/// `id` is `None` while the resource is absent. `private_key` and
/// `passphrase` always hold the caller's desired values; nothing read from
/// Jenkins is ever written into them.
#[derive(Debug, Clone)]
pub struct SshCredentialRecord {
    pub id: Option<CredentialId>,
    pub name: String,
    pub domain: String,
    pub folder: String,
    pub scope: CredentialScope,
    pub description: String,
    pub username: String,
    pub private_key: SecretString,
    pub passphrase: Option<SecretString>,
}

impl Default for SshCredentialRecord {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            domain: DEFAULT_DOMAIN.to_string(),
            folder: String::new(),
            scope: CredentialScope::default(),
            description: DEFAULT_DESCRIPTION.to_string(),
            username: String::new(),
            private_key: SecretString::from(String::new()),
            passphrase: None,
        }
    }
}

impl SshCredentialRecord {
    /// A record with the required fields set and every optional field at
    /// its schema default.
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            private_key: SecretString::from(private_key.into()),
            ..Default::default()
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn with_scope(mut self, scope: CredentialScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the key passphrase. An empty passphrase means none.
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        let passphrase = passphrase.into();
        self.passphrase = if passphrase.is_empty() {
            None
        } else {
            Some(SecretString::from(passphrase))
        };
        self
    }

    /// The identifier this record's identity fields compose to.
    pub fn compose_id(&self) -> CredentialId {
        CredentialId::new(self.folder.as_str(), self.domain.as_str(), self.name.as_str())
    }

    /// The folder in the path form the credentials API expects.
    pub fn jenkins_folder(&self) -> String {
        format_folder_name(&self.folder)
    }

    /// Check the desired configuration before any remote call.
    ///
    /// # Errors
    /// Returns `ResourceError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ResourceError::validation("name is required"));
        }
        if self.name.contains('/') {
            return Err(ResourceError::validation(format!(
                "name '{}' must not contain '/'",
                self.name
            )));
        }
        if self.domain.is_empty() || self.domain.contains('/') {
            return Err(ResourceError::validation(format!(
                "domain '{}' must be a single non-empty segment",
                self.domain
            )));
        }
        if self.username.is_empty() {
            return Err(ResourceError::validation("username is required"));
        }
        if self.private_key.expose_secret().is_empty() {
            return Err(ResourceError::validation("privatekey is required"));
        }
        Ok(())
    }

    /// Build the full remote payload from the desired state.
    ///
    /// The passphrase is attached only when set, so an unset passphrase is
    /// absent from the payload rather than sent as an empty value.
    pub fn to_payload(&self) -> SshCredentials {
        let mut payload = SshCredentials::new(
            self.name.as_str(),
            self.scope.as_str(),
            self.username.as_str(),
            PrivateKeySource::DirectEntry(self.private_key.clone()),
        );
        payload.description = self.description.clone();
        payload.passphrase = self
            .passphrase
            .as_ref()
            .filter(|p| !p.expose_secret().is_empty())
            .cloned();
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_schema_defaults() {
        let record = SshCredentialRecord::new("deploy-key", "git", "KEY");
        assert!(record.id.is_none());
        assert_eq!(record.domain, "_");
        assert_eq!(record.folder, "");
        assert_eq!(record.scope, CredentialScope::Global);
        assert_eq!(record.description, "Managed by Terraform");
        assert!(record.passphrase.is_none());
    }

    #[test]
    fn test_empty_passphrase_is_none() {
        let record = SshCredentialRecord::new("k", "git", "KEY").with_passphrase("");
        assert!(record.passphrase.is_none());

        let record = record.with_passphrase("pw");
        assert_eq!(record.passphrase.unwrap().expose_secret(), "pw");
    }

    #[test]
    fn test_compose_id() {
        let record = SshCredentialRecord::new("k", "git", "KEY").with_folder("teamA");
        assert_eq!(record.compose_id().to_string(), "teamA/_/k");
    }

    #[test]
    fn test_jenkins_folder() {
        let record = SshCredentialRecord::new("k", "git", "KEY").with_folder("teamA/infra");
        assert_eq!(record.jenkins_folder(), "job/teamA/job/infra");
        assert_eq!(SshCredentialRecord::new("k", "git", "KEY").jenkins_folder(), "");
    }

    #[test]
    fn test_validate_accepts_minimal_record() {
        assert!(SshCredentialRecord::new("k", "git", "KEY").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let cases = [
            (SshCredentialRecord::new("", "git", "KEY"), "name is required"),
            (SshCredentialRecord::new("a/b", "git", "KEY"), "must not contain '/'"),
            (SshCredentialRecord::new("k", "", "KEY"), "username is required"),
            (SshCredentialRecord::new("k", "git", ""), "privatekey is required"),
            (
                SshCredentialRecord::new("k", "git", "KEY").with_domain(""),
                "domain ''",
            ),
        ];
        for (record, expected) in cases {
            let err = record.validate().unwrap_err();
            assert!(matches!(err, ResourceError::Validation(_)));
            assert!(err.to_string().contains(expected), "{err}");
        }
    }

    #[test]
    fn test_payload_carries_desired_fields() {
        let record = SshCredentialRecord::new("deploy-key", "git", "KEY")
            .with_scope(CredentialScope::System)
            .with_description("deploys");
        let payload = record.to_payload();

        assert_eq!(payload.id, "deploy-key");
        assert_eq!(payload.scope, "SYSTEM");
        assert_eq!(payload.description, "deploys");
        assert_eq!(payload.username, "git");
        let PrivateKeySource::DirectEntry(key) = &payload.private_key_source;
        assert_eq!(key.expose_secret(), "KEY");
    }

    #[test]
    fn test_payload_passphrase_only_when_set() {
        let without = SshCredentialRecord::new("k", "git", "KEY").to_payload();
        assert!(without.passphrase.is_none());

        let with = SshCredentialRecord::new("k", "git", "KEY")
            .with_passphrase("pw")
            .to_payload();
        assert_eq!(with.passphrase.unwrap().expose_secret(), "pw");
    }

    #[test]
    fn test_payload_drops_empty_passphrase_set_directly() {
        let mut record = SshCredentialRecord::new("k", "git", "KEY");
        record.passphrase = Some(SecretString::from(String::new()));
        assert!(record.to_payload().passphrase.is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let record =
            SshCredentialRecord::new("k", "git", "TOP-SECRET-KEY").with_passphrase("pw-123");
        let debug = format!("{:?}", record);
        assert!(!debug.contains("TOP-SECRET-KEY"));
        assert!(!debug.contains("pw-123"));
    }
}
