//! Ephemeral credential files.
//!
//! Some TLS stacks only load client identities from disk, so the in-memory
//! PEM strings are written to per-call temporary files while the secure
//! context is built and the request is in flight. Each file is owned by the
//! call that created it and removed when its owner is dropped, on success,
//! on error and on unwind alike.
//!
//! File names embed the call id plus a random suffix, so concurrent calls on
//! the same client never share a path.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

const FILE_PREFIX: &str = "mtls-rpc";
const FILE_SUFFIX: &str = ".pem";

/// One staged PEM document (private key or certificate)
#[derive(Debug)]
pub struct EphemeralCredentialFile {
    path: PathBuf,
    temp_path: Option<TempPath>,
}

impl EphemeralCredentialFile {
    /// Write `content` to a new file in `dir`.
    ///
    /// The write is all-or-nothing: if it fails, the partially written file
    /// is removed before the error is returned. On unix the file is created
    /// readable by the owner only.
    pub fn create(
        dir: &Path,
        label: &str,
        call_id: &str,
        content: &str,
    ) -> std::io::Result<Self> {
        let prefix = format!("{}-{}-{}-", FILE_PREFIX, call_id, label);
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(FILE_SUFFIX)
            .tempfile_in(dir)?;

        file.write_all(content.as_bytes())?;
        file.flush()?;

        let temp_path = file.into_temp_path();
        let path = temp_path.to_path_buf();
        debug!(path = %path.display(), label, "Created temporary credential file");

        Ok(Self {
            path,
            temp_path: Some(temp_path),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True until `remove` has run
    pub fn is_staged(&self) -> bool {
        self.temp_path.is_some()
    }

    /// Delete the file. Safe to call more than once; failures are logged only.
    pub fn remove(&mut self) {
        let Some(temp_path) = self.temp_path.take() else {
            return;
        };

        match temp_path.close() {
            Ok(()) => debug!(path = %self.path.display(), "Removed temporary credential file"),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove temporary credential file"
            ),
        }
    }
}

impl Drop for EphemeralCredentialFile {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Key and certificate files staged for a single call
#[derive(Debug)]
pub struct StagedCredentials {
    key: EphemeralCredentialFile,
    cert: EphemeralCredentialFile,
}

impl StagedCredentials {
    /// Stage certificate then key into `dir` (system temp dir when `None`).
    ///
    /// If the key cannot be written, the already staged certificate is
    /// removed before returning.
    pub fn stage(
        dir: Option<&Path>,
        call_id: &str,
        key_pem: &str,
        cert_pem: &str,
    ) -> Result<Self> {
        let default_dir;
        let dir = match dir {
            Some(dir) => dir,
            None => {
                default_dir = std::env::temp_dir();
                default_dir.as_path()
            }
        };

        let cert = EphemeralCredentialFile::create(dir, "cert", call_id, cert_pem).map_err(|e| {
            ClientError::credential_staging(
                format!("Failed to write client certificate to {}", dir.display()),
                e,
            )
        })?;

        let key = EphemeralCredentialFile::create(dir, "key", call_id, key_pem).map_err(|e| {
            ClientError::credential_staging(
                format!("Failed to write client key to {}", dir.display()),
                e,
            )
        })?;

        Ok(Self { key, cert })
    }

    pub fn key_path(&self) -> &Path {
        self.key.path()
    }

    pub fn cert_path(&self) -> &Path {
        self.cert.path()
    }

    /// Remove both files (idempotent)
    pub fn cleanup(&mut self) {
        self.cert.remove();
        self.key.remove();
    }
}
