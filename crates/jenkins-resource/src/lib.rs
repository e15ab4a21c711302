// ABOUTME: Jenkins credential resources for a declarative provider
// ABOUTME: Schema, composite ids, plan classification and the SSH credential lifecycle

pub mod error;
pub mod id;
pub mod key;
pub mod plan;
pub mod record;
pub mod schema;
pub mod ssh;

pub use error::{Operation, ResourceError, Result};
pub use id::{CredentialId, compose};
pub use key::{KeyInfo, inspect_private_key};
pub use plan::{PlanAction, plan};
pub use record::SshCredentialRecord;
pub use schema::{
    Attribute, CredentialScope, DEFAULT_DESCRIPTION, DEFAULT_DOMAIN, Mutability,
    SSH_CREDENTIAL_SCHEMA,
};
pub use ssh::{ReadOutcome, SshCredentialResource};
