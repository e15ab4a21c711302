// ABOUTME: Capabilities the provider consumes from a Jenkins server
// ABOUTME: Credentials manager, folder probe, payload types, errors and config

//! [`ClientConfig`] holds the connection settings for crates that build a
//! concrete HTTP client on top of these capabilities; nothing here opens a
//! connection.
//!
//! ```no_run
//! use jenkins_client::ClientConfig;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ClientConfig::load_from("jenkins.toml")?
//!     .with_env_overrides(|key| std::env::var(key).ok());
//! let server = config.server()?;
//! println!("connecting to {server} with a {:?} timeout", config.timeout());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod config;
mod credentials;
mod error;
mod folder;
pub mod memory;

pub use client::JenkinsClient;
pub use config::ClientConfig;
pub use credentials::{
    CredentialsManager, KEY_SOURCE_DIRECT_ENTRY_CLASS, PrivateKeySource, SSH_CREDENTIALS_CLASS,
    SshCredentials,
};
pub use error::{ClientError, Result};
pub use folder::{FolderProbe, extract_folders, format_folder_name};
pub use memory::MemoryJenkins;
