// ABOUTME: Lifecycle of the jenkins_credential_ssh resource.
// ABOUTME: Create, read, update, delete and import against an injected Jenkins client.

use crate::error::{Operation, ResourceError, Result};
use crate::id::CredentialId;
use crate::key::inspect_private_key;
use crate::record::SshCredentialRecord;
use crate::schema::{Attribute, CredentialScope, SSH_CREDENTIAL_SCHEMA};
use jenkins_client::{ClientError, JenkinsClient};
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

/// Result of refreshing a record from Jenkins.
#[derive(Debug, Clone)]
pub enum ReadOutcome {
    /// The credential exists; non-secret fields were refreshed.
    Present(SshCredentialRecord),
    /// The credential no longer exists and should be dropped from state.
    Gone,
}

impl ReadOutcome {
    pub fn is_gone(&self) -> bool {
        matches!(self, ReadOutcome::Gone)
    }

    pub fn into_record(self) -> Option<SshCredentialRecord> {
        match self {
            ReadOutcome::Present(record) => Some(record),
            ReadOutcome::Gone => None,
        }
    }
}

/// The `jenkins_credential_ssh` resource.
///
/// Holds no state of its own: every operation is handed the client and the
/// record it works on, and returns the new record.
#[derive(Debug, Clone, Copy, Default)]
pub struct SshCredentialResource;

impl SshCredentialResource {
    pub const TYPE_NAME: &'static str = "jenkins_credential_ssh";

    pub fn schema(&self) -> &'static [Attribute] {
        SSH_CREDENTIAL_SCHEMA
    }

    /// Create the credential and read it back.
    ///
    /// A non-empty folder is probed first; nothing is written if it does not
    /// exist. The returned record carries its identifier only once the write
    /// has succeeded.
    ///
    /// # Errors
    /// - `ResourceError::Validation` if the record is incomplete.
    /// - `ResourceError::InvalidFolder` if the folder probe fails.
    /// - `ResourceError::Remote` if the write fails.
    /// - `ResourceError::ReadBack` if the write succeeded but the read-back
    ///   failed; it carries the record with its identifier set.
    #[tracing::instrument(skip_all, fields(credential = %desired.compose_id()))]
    pub async fn create<C>(
        &self,
        client: &C,
        desired: &SshCredentialRecord,
    ) -> Result<SshCredentialRecord>
    where
        C: JenkinsClient + ?Sized,
    {
        desired.validate()?;

        let folder = desired.jenkins_folder();
        if !folder.is_empty() {
            client
                .folder_exists(&folder)
                .await
                .map_err(|source| ResourceError::InvalidFolder {
                    folder: desired.folder.clone(),
                    source,
                })?;
        }

        log_key(desired);
        let payload = desired.to_payload();
        client
            .add(&folder, &desired.domain, &payload)
            .await
            .map_err(|e| ResourceError::remote(Operation::Create, desired.compose_id(), e))?;

        let mut created = desired.clone();
        created.id = Some(created.compose_id());
        info!("created ssh credentials");

        self.read_back(client, created).await
    }

    /// Refresh a record from Jenkins.
    ///
    /// Only `scope` and `description` are taken from the server. Secret
    /// fields come back as opaque placeholders, so the caller's values stay.
    ///
    /// # Errors
    /// Returns `ResourceError::Remote` for any failure other than the
    /// credential being absent, which yields `ReadOutcome::Gone`.
    #[tracing::instrument(skip_all, fields(credential = %record.compose_id()))]
    pub async fn read<C>(&self, client: &C, record: &SshCredentialRecord) -> Result<ReadOutcome>
    where
        C: JenkinsClient + ?Sized,
    {
        let folder = record.jenkins_folder();
        let remote = match client
            .get_single(&folder, &record.domain, &record.name)
            .await
        {
            Ok(remote) => remote,
            Err(e) if e.is_not_found() => {
                info!("ssh credentials no longer exist, removing from state");
                return Ok(ReadOutcome::Gone);
            }
            Err(e) => {
                return Err(ResourceError::remote(Operation::Read, record.compose_id(), e));
            }
        };

        let scope: CredentialScope = remote.scope.parse().map_err(|_| {
            ResourceError::remote(
                Operation::Read,
                record.compose_id(),
                ClientError::InvalidResponse(format!(
                    "unknown credential scope '{}'",
                    remote.scope
                )),
            )
        })?;

        let mut refreshed = record.clone();
        refreshed.scope = scope;
        refreshed.description = remote.description;
        refreshed.id = Some(refreshed.compose_id());
        debug!(scope = %refreshed.scope, "refreshed ssh credentials");

        Ok(ReadOutcome::Present(refreshed))
    }

    /// Overwrite the mutable fields of an existing credential.
    ///
    /// `name`, `domain` and `folder` must be unchanged from the stored state;
    /// a change to any of them is a replacement (see [`crate::plan`]) and is
    /// not checked here.
    ///
    /// # Errors
    /// - `ResourceError::Validation` if the record is incomplete.
    /// - `ResourceError::Remote` if the update fails.
    /// - `ResourceError::ReadBack` if the update succeeded but the read-back
    ///   failed; it carries the record with its identifier set.
    #[tracing::instrument(skip_all, fields(credential = %desired.compose_id()))]
    pub async fn update<C>(
        &self,
        client: &C,
        desired: &SshCredentialRecord,
    ) -> Result<SshCredentialRecord>
    where
        C: JenkinsClient + ?Sized,
    {
        desired.validate()?;

        log_key(desired);
        let folder = desired.jenkins_folder();
        let payload = desired.to_payload();
        client
            .update(&folder, &desired.domain, &desired.name, &payload)
            .await
            .map_err(|e| ResourceError::remote(Operation::Update, desired.compose_id(), e))?;

        let mut updated = desired.clone();
        updated.id = Some(updated.compose_id());
        info!("updated ssh credentials");

        self.read_back(client, updated).await
    }

    /// Delete the credential.
    ///
    /// # Errors
    /// Returns `ResourceError::Remote` for any failure, including the
    /// credential already being absent.
    #[tracing::instrument(skip_all, fields(credential = %record.compose_id()))]
    pub async fn delete<C>(&self, client: &C, record: &SshCredentialRecord) -> Result<()>
    where
        C: JenkinsClient + ?Sized,
    {
        let folder = record.jenkins_folder();
        client
            .delete(&folder, &record.domain, &record.name)
            .await
            .map_err(|e| ResourceError::remote(Operation::Delete, record.compose_id(), e))?;

        info!("deleted ssh credentials");
        Ok(())
    }

    /// Seed a record from an operator-supplied `[<folder>/]<domain>/<name>`.
    ///
    /// Only the identity fields are set; a following read fills in the rest.
    ///
    /// # Errors
    /// Returns `ResourceError::Format` if the identifier is malformed.
    pub fn import(&self, raw_id: &str) -> Result<SshCredentialRecord> {
        let id = CredentialId::parse(raw_id)?;
        debug!(credential = %id, "importing ssh credentials");

        Ok(SshCredentialRecord {
            name: id.name().to_string(),
            domain: id.domain().to_string(),
            folder: id.folder().to_string(),
            id: Some(id),
            ..Default::default()
        })
    }

    async fn read_back<C>(
        &self,
        client: &C,
        record: SshCredentialRecord,
    ) -> Result<SshCredentialRecord>
    where
        C: JenkinsClient + ?Sized,
    {
        match self.read(client, &record).await {
            Ok(ReadOutcome::Present(refreshed)) => Ok(refreshed),
            Ok(ReadOutcome::Gone) => {
                warn!("ssh credentials vanished right after being written");
                Ok(SshCredentialRecord { id: None, ..record })
            }
            Err(ResourceError::Remote { source, .. }) => {
                warn!(error = %source, "ssh credentials written but read-back failed");
                Err(ResourceError::ReadBack {
                    record: Box::new(record),
                    source,
                })
            }
            Err(e) => Err(e),
        }
    }
}

fn log_key(record: &SshCredentialRecord) {
    match inspect_private_key(record.private_key.expose_secret()) {
        Some(key) => debug!(
            algorithm = %key.algorithm,
            fingerprint = %key.fingerprint,
            encrypted = key.encrypted,
            "using private key"
        ),
        None => debug!("private key is not in OpenSSH format"),
    }
}
