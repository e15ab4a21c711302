// ABOUTME: Declarative field surface of the SSH credential resource.
// ABOUTME: Each attribute carries an explicit mutability tag instead of a framework annotation.

use crate::error::{ResourceError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The global credential domain.
pub const DEFAULT_DOMAIN: &str = "_";

/// Description given to credentials that do not set one.
pub const DEFAULT_DESCRIPTION: &str = "Managed by Terraform";

/// How a change to an attribute is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// Changed in place by a full-object update.
    Mutable,
    /// The remote API cannot move or rename; a change destroys and recreates.
    ImmutableForcesReplace,
}

/// One field of the resource schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub sensitive: bool,
    pub mutability: Mutability,
    pub default: Option<&'static str>,
}

impl Attribute {
    pub fn forces_replace(&self) -> bool {
        self.mutability == Mutability::ImmutableForcesReplace
    }
}

pub const SSH_CREDENTIAL_SCHEMA: &[Attribute] = &[
    Attribute {
        name: "name",
        description: "The identifier assigned to the credentials.",
        required: true,
        sensitive: false,
        mutability: Mutability::ImmutableForcesReplace,
        default: None,
    },
    Attribute {
        name: "domain",
        description: "The domain namespace that the credentials will be added to.",
        required: false,
        sensitive: false,
        mutability: Mutability::ImmutableForcesReplace,
        default: Some(DEFAULT_DOMAIN),
    },
    Attribute {
        name: "folder",
        description: "The folder namespace that the credentials will be added to.",
        required: false,
        sensitive: false,
        mutability: Mutability::ImmutableForcesReplace,
        default: None,
    },
    Attribute {
        name: "scope",
        description: "The Jenkins scope assigned to the credentials.",
        required: false,
        sensitive: false,
        mutability: Mutability::Mutable,
        default: Some("GLOBAL"),
    },
    Attribute {
        name: "description",
        description: "The credentials descriptive text.",
        required: false,
        sensitive: false,
        mutability: Mutability::Mutable,
        default: Some(DEFAULT_DESCRIPTION),
    },
    Attribute {
        name: "username",
        description: "Username",
        required: true,
        sensitive: false,
        mutability: Mutability::Mutable,
        default: None,
    },
    Attribute {
        name: "privatekey",
        description: "The credentials private SSH key. This is mandatory.",
        required: true,
        sensitive: true,
        mutability: Mutability::Mutable,
        default: None,
    },
    Attribute {
        name: "passphrase",
        description: "Passphrase for SSH key.",
        required: false,
        sensitive: true,
        mutability: Mutability::Mutable,
        default: None,
    },
];

/// Look up an attribute of the SSH credential schema by name.
pub fn attribute(name: &str) -> Option<&'static Attribute> {
    SSH_CREDENTIAL_SCHEMA.iter().find(|a| a.name == name)
}

/// Visibility of a credential inside Jenkins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CredentialScope {
    #[default]
    Global,
    System,
}

impl CredentialScope {
    pub const ALL: [CredentialScope; 2] = [CredentialScope::Global, CredentialScope::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialScope::Global => "GLOBAL",
            CredentialScope::System => "SYSTEM",
        }
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialScope {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self> {
        CredentialScope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| {
                ResourceError::validation(format!(
                    "invalid scope '{s}', expected one of: GLOBAL, SYSTEM"
                ))
            })
    }
}
