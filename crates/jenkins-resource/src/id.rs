// ABOUTME: Composite credential identifiers of the form [folder/]domain/name.
// ABOUTME: Composition is deterministic; parsing is positional on '/'.

use crate::error::{ResourceError, Result};
use std::fmt;
use std::str::FromStr;

const IMPORT_FORMAT_HINT: &str = "import ID was improperly formatted. Imports need to be in the format \"[<folder>/]<domain>/<name>\"";

/// Render an identifier. An empty folder omits the leading segment.
pub fn compose(folder: &str, domain: &str, name: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        format!("{domain}/{name}")
    } else {
        format!("{folder}/{domain}/{name}")
    }
}

/// The durable handle of a credential resource.
///
/// Folder paths that contain `/` are accepted, but the parse is positional:
/// only the last two segments are taken as domain and name, and everything
/// before them becomes the folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialId {
    folder: String,
    domain: String,
    name: String,
}

impl CredentialId {
    pub fn new(
        folder: impl Into<String>,
        domain: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            folder: folder.into().trim_matches('/').to_string(),
            domain: domain.into(),
            name: name.into(),
        }
    }

    /// Parse `[<folder>/]<domain>/<name>`.
    ///
    /// # Errors
    /// Returns `ResourceError::Format` if there are fewer than two segments or
    /// the domain or name segment is empty.
    pub fn parse(raw: &str) -> Result<Self> {
        let segments: Vec<&str> = raw.split('/').collect();
        if segments.len() < 2 {
            return Err(ResourceError::Format(IMPORT_FORMAT_HINT.to_string()));
        }

        let name = segments[segments.len() - 1];
        let domain = segments[segments.len() - 2];
        if name.is_empty() || domain.is_empty() {
            return Err(ResourceError::Format(IMPORT_FORMAT_HINT.to_string()));
        }

        let folder = segments[..segments.len() - 2].join("/");
        Ok(Self::new(folder, domain, name))
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&compose(&self.folder, &self.domain, &self.name))
    }
}

impl FromStr for CredentialId {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_without_folder() {
        assert_eq!(compose("", "domain", "name"), "domain/name");
    }

    #[test]
    fn test_compose_with_folder() {
        assert_eq!(compose("teamA", "_", "my-key"), "teamA/_/my-key");
        assert_eq!(compose("/teamA/", "_", "my-key"), "teamA/_/my-key");
    }

    #[test]
    fn test_parse_three_segments() {
        let id = CredentialId::parse("teamA/_/my-key").unwrap();
        assert_eq!(id.folder(), "teamA");
        assert_eq!(id.domain(), "_");
        assert_eq!(id.name(), "my-key");
        assert_eq!(id.to_string(), "teamA/_/my-key");
    }

    #[test]
    fn test_parse_two_segments_has_no_folder() {
        let id = CredentialId::parse("_/my-key").unwrap();
        assert_eq!(id.folder(), "");
        assert_eq!(id.domain(), "_");
        assert_eq!(id.name(), "my-key");
        assert_eq!(id.to_string(), "_/my-key");
    }

    #[test]
    fn test_parse_nested_folder() {
        let id: CredentialId = "teamA/infra/deploy/my-key".parse().unwrap();
        assert_eq!(id.folder(), "teamA/infra");
        assert_eq!(id.domain(), "deploy");
        assert_eq!(id.name(), "my-key");
    }

    #[test]
    fn test_parse_trims_folder_slashes() {
        let id = CredentialId::parse("/teamA//_/my-key").unwrap();
        assert_eq!(id.folder(), "teamA");
        assert_eq!(id.to_string(), "teamA/_/my-key");
    }

    #[test]
    fn test_parse_single_segment_fails() {
        let err = CredentialId::parse("my-key").unwrap_err();
        assert!(matches!(err, ResourceError::Format(_)));
        assert!(err.to_string().contains("[<folder>/]<domain>/<name>"));
    }

    #[test]
    fn test_parse_empty_segments_fail() {
        assert!(CredentialId::parse("").is_err());
        assert!(CredentialId::parse("_/").is_err());
        assert!(CredentialId::parse("/my-key").is_err());
    }

    #[test]
    fn test_round_trip_without_slash_in_folder() {
        let cases = [
            ("", "_", "my-key"),
            ("teamA", "_", "my-key"),
            ("teamA", "deploy", "github"),
            ("", "internal", "key.with.dots"),
        ];
        for (folder, domain, name) in cases {
            let id = CredentialId::parse(&compose(folder, domain, name)).unwrap();
            assert_eq!(
                (id.folder(), id.domain(), id.name()),
                (folder, domain, name),
                "round trip of {folder:?}/{domain:?}/{name:?}"
            );
        }
    }
}
