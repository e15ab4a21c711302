// ABOUTME: Error types for credential resource operations using thiserror.
// ABOUTME: Remote failures carry the verb and credential they were raised for.

use crate::record::SshCredentialRecord;
use jenkins_client::ClientError;
use std::fmt;
use thiserror::Error;

/// Lifecycle verb that produced a remote error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Errors that can occur while managing a credential resource.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The configured folder does not exist on the server.
    ///
    /// `folder` is the operator form (`teamA/infra`); the probed Jenkins
    /// path (`job/teamA/job/infra`) appears in `source`.
    #[error("invalid folder name '{folder}' specified: {source}")]
    InvalidFolder {
        folder: String,
        #[source]
        source: ClientError,
    },

    /// The desired configuration is not acceptable.
    #[error("invalid configuration: {0}")]
    Validation(String),

    /// The remote credential store rejected or failed an operation.
    #[error("could not {op} ssh credentials {credential}: {source}")]
    Remote {
        op: Operation,
        credential: String,
        #[source]
        source: ClientError,
    },

    /// The write succeeded but reading the credential back failed.
    ///
    /// `record` is the written state with its identifier set, so the caller
    /// can keep it and let a later read reconcile.
    #[error(
        "ssh credentials {} were written but could not be read back: {source}",
        .record.compose_id()
    )]
    ReadBack {
        record: Box<SshCredentialRecord>,
        #[source]
        source: ClientError,
    },

    /// An import identifier could not be parsed.
    #[error("{0}")]
    Format(String),
}

/// Result type alias using ResourceError.
pub type Result<T> = std::result::Result<T, ResourceError>;

impl ResourceError {
    pub fn remote(op: Operation, credential: impl fmt::Display, source: ClientError) -> Self {
        Self::Remote {
            op,
            credential: credential.to_string(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The record that reached the server, when the error happened after a
    /// successful write.
    pub fn written_record(&self) -> Option<&SshCredentialRecord> {
        match self {
            Self::ReadBack { record, .. } => Some(record.as_ref()),
            _ => None,
        }
    }

    /// Consume the error, keeping the written record if there is one.
    pub fn into_written_record(self) -> Option<SshCredentialRecord> {
        match self {
            Self::ReadBack { record, .. } => Some(*record),
            _ => None,
        }
    }
}
