// ABOUTME: The client handle passed to every resource operation.
// ABOUTME: Bundles the credentials manager and folder probe capabilities.

use crate::credentials::CredentialsManager;
use crate::folder::FolderProbe;

/// Everything a credential resource needs from a Jenkins server.
///
/// Implemented automatically for any type providing both capabilities, so a
/// real HTTP client and [`crate::MemoryJenkins`] are interchangeable.
pub trait JenkinsClient: CredentialsManager + FolderProbe {}

impl<T: CredentialsManager + FolderProbe + ?Sized> JenkinsClient for T {}
