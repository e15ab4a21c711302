// ABOUTME: Classifies a desired change as no-op, in-place update or replacement.
// ABOUTME: Driven by the per-attribute mutability tags of the schema.

use crate::record::SshCredentialRecord;
use crate::schema::attribute;
use secrecy::{ExposeSecret, SecretString};

/// What the orchestration layer must do to reach the desired state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    /// Nothing exists yet.
    Create,
    /// Desired state matches prior state.
    NoOp,
    /// Only mutable attributes changed; a full-object update applies them.
    UpdateInPlace { changed: Vec<&'static str> },
    /// An identity attribute changed; delete the old credential, then create.
    Replace {
        changed: Vec<&'static str>,
        forced_by: Vec<&'static str>,
    },
}

impl PlanAction {
    pub fn requires_replace(&self) -> bool {
        matches!(self, PlanAction::Replace { .. })
    }
}

fn same_secret(a: &SecretString, b: &SecretString) -> bool {
    a.expose_secret() == b.expose_secret()
}

fn same_optional_secret(a: &Option<SecretString>, b: &Option<SecretString>) -> bool {
    let a = a.as_ref().map(|s| s.expose_secret()).unwrap_or_default();
    let b = b.as_ref().map(|s| s.expose_secret()).unwrap_or_default();
    a == b
}

/// Attributes whose values differ between `prior` and `desired`, in schema
/// order.
///
/// Secrets are compared against the prior desired values, which are the only
/// copies of them that exist.
pub fn changed_attributes(
    prior: &SshCredentialRecord,
    desired: &SshCredentialRecord,
) -> Vec<&'static str> {
    let checks = [
        ("name", prior.name == desired.name),
        ("domain", prior.domain == desired.domain),
        ("folder", prior.folder.trim_matches('/') == desired.folder.trim_matches('/')),
        ("scope", prior.scope == desired.scope),
        ("description", prior.description == desired.description),
        ("username", prior.username == desired.username),
        ("privatekey", same_secret(&prior.private_key, &desired.private_key)),
        (
            "passphrase",
            same_optional_secret(&prior.passphrase, &desired.passphrase),
        ),
    ];

    checks
        .into_iter()
        .filter(|(_, same)| !same)
        .map(|(name, _)| name)
        .collect()
}

/// Decide how to move from `prior` to `desired`.
pub fn plan(prior: Option<&SshCredentialRecord>, desired: &SshCredentialRecord) -> PlanAction {
    let Some(prior) = prior.filter(|p| p.id.is_some()) else {
        return PlanAction::Create;
    };

    let changed = changed_attributes(prior, desired);
    if changed.is_empty() {
        return PlanAction::NoOp;
    }

    let forced_by: Vec<&'static str> = changed
        .iter()
        .copied()
        .filter(|name| attribute(name).is_some_and(|a| a.forces_replace()))
        .collect();

    if forced_by.is_empty() {
        PlanAction::UpdateInPlace { changed }
    } else {
        PlanAction::Replace { changed, forced_by }
    }
}
