// ABOUTME: In-memory Jenkins credential store for tests and dry runs.
// ABOUTME: Mirrors server behaviour for missing folders, duplicates and secret masking.

use crate::credentials::{CredentialsManager, PrivateKeySource, SshCredentials};
use crate::error::{ClientError, Result};
use crate::folder::{FolderProbe, format_folder_name};
use async_trait::async_trait;
use secrecy::SecretString;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Value Jenkins sends back in place of secret material.
pub const MASKED_SECRET: &str = "<redacted>";

/// Kind of call made against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    FolderExists,
    Add,
    GetSingle,
    Update,
    Delete,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub kind: CallKind,
    pub folder: String,
    pub domain: String,
    pub id: String,
}

type Key = (String, String, String);

#[derive(Default)]
struct State {
    folders: BTreeSet<String>,
    credentials: BTreeMap<Key, SshCredentials>,
    calls: Vec<Call>,
    failures: Vec<(CallKind, ClientError)>,
}

/// A Jenkins credential store held in memory.
///
/// Folder names given to [`MemoryJenkins::with_folder`] are in operator form
/// (`a/b`); every capability method receives the Jenkins path form, exactly
/// like a real server would.
#[derive(Default)]
pub struct MemoryJenkins {
    state: Mutex<State>,
}

impl MemoryJenkins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a folder and all of its parents.
    pub fn with_folder(self, folder: &str) -> Self {
        {
            let mut state = self.lock();
            let mut path = String::new();
            for segment in folder.split('/').filter(|s| !s.is_empty()) {
                if !path.is_empty() {
                    path.push('/');
                }
                path.push_str(segment);
                state.folders.insert(format_folder_name(&path));
            }
        }
        self
    }

    /// Make the next call of `kind` fail with `error`.
    pub fn fail_next(&self, kind: CallKind, error: ClientError) {
        self.lock().failures.push((kind, error));
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Kinds of every call made so far, oldest first.
    pub fn call_kinds(&self) -> Vec<CallKind> {
        self.lock().calls.iter().map(|c| c.kind).collect()
    }

    /// The credential exactly as last written, secrets included.
    ///
    /// `folder` is in operator form.
    pub fn stored(&self, folder: &str, domain: &str, id: &str) -> Option<SshCredentials> {
        let key = (format_folder_name(folder), domain.to_string(), id.to_string());
        self.lock().credentials.get(&key).cloned()
    }

    /// Number of credentials held.
    pub fn len(&self) -> usize {
        self.lock().credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Change the stored scope and description behind the caller's back,
    /// the way an edit in the Jenkins UI would.
    pub fn edit_remote(
        &self,
        folder: &str,
        domain: &str,
        id: &str,
        scope: &str,
        description: &str,
    ) {
        let key = (format_folder_name(folder), domain.to_string(), id.to_string());
        if let Some(cred) = self.lock().credentials.get_mut(&key) {
            cred.scope = scope.to_string();
            cred.description = description.to_string();
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and return any injected failure for it.
    fn begin(
        state: &mut State,
        kind: CallKind,
        folder: &str,
        domain: &str,
        id: &str,
    ) -> Result<()> {
        state.calls.push(Call {
            kind,
            folder: folder.to_string(),
            domain: domain.to_string(),
            id: id.to_string(),
        });
        match state.failures.iter().position(|(k, _)| *k == kind) {
            Some(idx) => Err(state.failures.remove(idx).1),
            None => Ok(()),
        }
    }

    fn check_folder(state: &State, folder: &str) -> Result<()> {
        if folder.is_empty() || state.folders.contains(folder) {
            Ok(())
        } else {
            Err(ClientError::not_found(format!("folder {folder}")))
        }
    }
}

fn describe(folder: &str, domain: &str, id: &str) -> String {
    if folder.is_empty() {
        format!("{domain}/{id}")
    } else {
        format!("{folder}/{domain}/{id}")
    }
}

fn masked(cred: &SshCredentials) -> SshCredentials {
    let mut out = cred.clone();
    out.private_key_source = PrivateKeySource::direct_entry(MASKED_SECRET);
    out.passphrase = cred
        .passphrase
        .as_ref()
        .map(|_| SecretString::from(MASKED_SECRET.to_string()));
    out
}

#[async_trait]
impl FolderProbe for MemoryJenkins {
    async fn folder_exists(&self, folder: &str) -> Result<()> {
        let mut state = self.lock();
        Self::begin(&mut state, CallKind::FolderExists, folder, "", "")?;
        Self::check_folder(&state, folder)
    }
}

#[async_trait]
impl CredentialsManager for MemoryJenkins {
    async fn add(&self, folder: &str, domain: &str, credential: &SshCredentials) -> Result<()> {
        let mut state = self.lock();
        Self::begin(&mut state, CallKind::Add, folder, domain, &credential.id)?;
        Self::check_folder(&state, folder)?;

        let key = (folder.to_string(), domain.to_string(), credential.id.clone());
        if state.credentials.contains_key(&key) {
            return Err(ClientError::conflict(describe(folder, domain, &credential.id)));
        }
        state.credentials.insert(key, credential.clone());
        Ok(())
    }

    async fn get_single(&self, folder: &str, domain: &str, id: &str) -> Result<SshCredentials> {
        let mut state = self.lock();
        Self::begin(&mut state, CallKind::GetSingle, folder, domain, id)?;

        let key = (folder.to_string(), domain.to_string(), id.to_string());
        state
            .credentials
            .get(&key)
            .map(masked)
            .ok_or_else(|| ClientError::not_found(describe(folder, domain, id)))
    }

    async fn update(
        &self,
        folder: &str,
        domain: &str,
        id: &str,
        credential: &SshCredentials,
    ) -> Result<()> {
        let mut state = self.lock();
        Self::begin(&mut state, CallKind::Update, folder, domain, id)?;

        let key = (folder.to_string(), domain.to_string(), id.to_string());
        match state.credentials.get_mut(&key) {
            Some(existing) => {
                *existing = credential.clone();
                Ok(())
            }
            None => Err(ClientError::not_found(describe(folder, domain, id))),
        }
    }

    async fn delete(&self, folder: &str, domain: &str, id: &str) -> Result<()> {
        let mut state = self.lock();
        Self::begin(&mut state, CallKind::Delete, folder, domain, id)?;

        let key = (folder.to_string(), domain.to_string(), id.to_string());
        state
            .credentials
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| ClientError::not_found(describe(folder, domain, id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn cred(id: &str) -> SshCredentials {
        let mut cred = SshCredentials::new(
            id,
            "GLOBAL",
            "git",
            PrivateKeySource::direct_entry("key-material"),
        );
        cred.passphrase = Some(SecretString::from("pass".to_string()));
        cred
    }

    #[tokio::test]
    async fn test_add_then_get_masks_secrets() {
        let jenkins = MemoryJenkins::new();
        jenkins.add("", "_", &cred("k")).await.unwrap();

        let fetched = jenkins.get_single("", "_", "k").await.unwrap();
        let PrivateKeySource::DirectEntry(key) = &fetched.private_key_source;
        assert_eq!(key.expose_secret(), MASKED_SECRET);
        assert_eq!(
            fetched.passphrase.unwrap().expose_secret(),
            MASKED_SECRET
        );

        let stored = jenkins.stored("", "_", "k").unwrap();
        let PrivateKeySource::DirectEntry(key) = &stored.private_key_source;
        assert_eq!(key.expose_secret(), "key-material");
    }

    #[tokio::test]
    async fn test_add_duplicate_conflicts() {
        let jenkins = MemoryJenkins::new();
        jenkins.add("", "_", &cred("k")).await.unwrap();
        let err = jenkins.add("", "_", &cred("k")).await.unwrap_err();
        assert!(matches!(err, ClientError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_missing_credential_is_not_found() {
        let jenkins = MemoryJenkins::new();
        assert!(jenkins.get_single("", "_", "k").await.unwrap_err().is_not_found());
        assert!(jenkins.update("", "_", "k", &cred("k")).await.unwrap_err().is_not_found());
        assert!(jenkins.delete("", "_", "k").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_folders_are_registered_with_parents() {
        let jenkins = MemoryJenkins::new().with_folder("teamA/infra");
        assert!(jenkins.folder_exists("").await.is_ok());
        assert!(jenkins.folder_exists("job/teamA").await.is_ok());
        assert!(jenkins.folder_exists("job/teamA/job/infra").await.is_ok());
        assert!(jenkins.folder_exists("job/teamB").await.is_err());
    }

    #[tokio::test]
    async fn test_add_into_missing_folder_fails() {
        let jenkins = MemoryJenkins::new();
        let err = jenkins.add("job/nope", "_", &cred("k")).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(jenkins.is_empty());
    }

    #[tokio::test]
    async fn test_fail_next_applies_once() {
        let jenkins = MemoryJenkins::new();
        jenkins.fail_next(CallKind::Add, ClientError::Transport("reset".to_string()));

        assert!(jenkins.add("", "_", &cred("k")).await.is_err());
        assert!(jenkins.add("", "_", &cred("k")).await.is_ok());
        assert_eq!(jenkins.call_kinds(), vec![CallKind::Add, CallKind::Add]);
    }

    #[tokio::test]
    async fn test_calls_are_recorded() {
        let jenkins = MemoryJenkins::new().with_folder("teamA");
        jenkins.add("job/teamA", "_", &cred("k")).await.unwrap();
        jenkins.delete("job/teamA", "_", "k").await.unwrap();

        let calls = jenkins.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].kind, CallKind::Delete);
        assert_eq!(calls[1].folder, "job/teamA");
        assert_eq!(calls[1].domain, "_");
        assert_eq!(calls[1].id, "k");
    }
}
