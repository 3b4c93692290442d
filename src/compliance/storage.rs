//! Takedown record storage with HMAC signing.
//!
//! This module provides tamper-evident persistence for takedown records
//! using HMAC-SHA256 signatures. Notices, counter-notices, and strike
//! records are stored as individually signed files; scan records and the
//! audit trail are appended to JSONL files.
//!
//! There is intentionally no delete surface: notices are never physically
//! removed, and the audit trail is insert-only.

use ring::hmac::{self, Key, HMAC_SHA256};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

use super::types::ComplianceError;

/// Record families, one subdirectory each
pub const SUBDIR_NOTICES: &str = "notices";
pub const SUBDIR_COUNTER_NOTICES: &str = "counter_notices";
pub const SUBDIR_SCANS: &str = "scans";
pub const SUBDIR_STRIKES: &str = "strikes";
pub const SUBDIR_AUDIT: &str = "audit";

/// Get the default takedown storage directory
///
/// Returns platform-specific path:
/// - Windows: `%APPDATA%\takedown\records\`
/// - Linux: `~/.config/takedown/records/`
/// - macOS: `~/Library/Application Support/takedown/records/`
pub fn records_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("takedown")
        .join("records")
}

/// Signer for takedown records.
///
/// Uses HMAC-SHA256 to ensure record integrity and detect tampering,
/// preserving the evidentiary value of notices and the audit trail.
pub struct RecordSigner {
    hmac_key: Key,
}

impl RecordSigner {
    /// Create a new signer with the given key
    pub fn new(key_bytes: &[u8; 32]) -> Self {
        Self {
            hmac_key: Key::new(HMAC_SHA256, key_bytes),
        }
    }

    /// Sign a serializable record
    ///
    /// Format: `[json_len:u32][json_bytes][signature:32]`
    pub fn sign<T: Serialize>(&self, record: &T) -> Result<Vec<u8>, ComplianceError> {
        let json = serde_json::to_vec(record)?;
        let signature = hmac::sign(&self.hmac_key, &json);

        let mut payload = Vec::with_capacity(4 + json.len() + 32);
        payload.extend_from_slice(&(json.len() as u32).to_le_bytes());
        payload.extend_from_slice(&json);
        payload.extend_from_slice(signature.as_ref());

        Ok(payload)
    }

    /// Verify and deserialize a signed record
    pub fn verify<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ComplianceError> {
        // Minimum size: 4 (length) + 1 (min json) + 32 (signature)
        if data.len() < 37 {
            return Err(ComplianceError::InvalidFormat);
        }

        let json_len = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if data.len() < 4 + json_len + 32 {
            return Err(ComplianceError::InvalidFormat);
        }

        let json = &data[4..4 + json_len];
        let signature = &data[4 + json_len..4 + json_len + 32];

        hmac::verify(&self.hmac_key, json, signature)
            .map_err(|_| ComplianceError::InvalidSignature)?;

        let record: T = serde_json::from_slice(json)?;
        Ok(record)
    }
}

/// File-based record store with HMAC signing
pub struct RecordStore {
    base_dir: PathBuf,
    signer: RecordSigner,
}

impl RecordStore {
    /// Create a store rooted at the default records directory
    pub fn new(key: &[u8; 32]) -> Result<Self, ComplianceError> {
        Self::with_base_dir(records_dir(), key)
    }

    /// Create a store rooted at an explicit directory (tests, alternate mounts)
    pub fn with_base_dir(
        base_dir: impl Into<PathBuf>,
        key: &[u8; 32],
    ) -> Result<Self, ComplianceError> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;

        for subdir in &[
            SUBDIR_NOTICES,
            SUBDIR_COUNTER_NOTICES,
            SUBDIR_SCANS,
            SUBDIR_STRIKES,
            SUBDIR_AUDIT,
        ] {
            std::fs::create_dir_all(base_dir.join(subdir))?;
        }

        Ok(Self {
            base_dir,
            signer: RecordSigner::new(key),
        })
    }

    /// Create a store using the persistent signing key
    pub fn new_with_default_key() -> Result<Self, ComplianceError> {
        let key = crate::security::crypto::load_or_create_key();
        Self::new(&key)
    }

    /// Get the base directory for record storage
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Store a signed record, overwriting any previous version
    pub fn store<T: Serialize>(
        &self,
        subdir: &str,
        filename: &str,
        record: &T,
    ) -> Result<PathBuf, ComplianceError> {
        let path = self.base_dir.join(subdir).join(filename);
        let signed = self.signer.sign(record)?;
        std::fs::write(&path, signed)?;
        Ok(path)
    }

    /// Store a signed record only if no record with this name exists yet
    ///
    /// The filesystem's exclusive-create is the authoritative uniqueness
    /// constraint for ticket ids; an `AlreadyExists` error tells the caller
    /// to regenerate and retry.
    pub fn store_new<T: Serialize>(
        &self,
        subdir: &str,
        filename: &str,
        record: &T,
    ) -> Result<PathBuf, ComplianceError> {
        use std::io::Write;

        let path = self.base_dir.join(subdir).join(filename);
        let signed = self.signer.sign(record)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;
        file.write_all(&signed)?;
        Ok(path)
    }

    /// Load and verify a record
    pub fn load<T: DeserializeOwned>(
        &self,
        subdir: &str,
        filename: &str,
    ) -> Result<T, ComplianceError> {
        let path = self.base_dir.join(subdir).join(filename);
        let data = std::fs::read(&path)?;
        self.signer.verify(&data)
    }

    /// Load a record from an absolute path
    pub fn load_path<T: DeserializeOwned>(&self, path: &Path) -> Result<T, ComplianceError> {
        let data = std::fs::read(path)?;
        self.signer.verify(&data)
    }

    /// Check if a record exists
    pub fn exists(&self, subdir: &str, filename: &str) -> bool {
        self.base_dir.join(subdir).join(filename).exists()
    }

    /// List all files in a subdirectory with a given extension
    pub fn list_files(
        &self,
        subdir: &str,
        extension: &str,
    ) -> Result<Vec<PathBuf>, ComplianceError> {
        let dir = self.base_dir.join(subdir);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext == extension {
                        files.push(path);
                    }
                }
            }
        }

        files.sort();
        Ok(files)
    }

    /// Load all records of a type from a subdirectory
    ///
    /// Records that fail verification are skipped with a warning so a single
    /// damaged file cannot take the whole listing down.
    pub fn load_all<T: DeserializeOwned>(
        &self,
        subdir: &str,
        extension: &str,
    ) -> Result<Vec<T>, ComplianceError> {
        let files = self.list_files(subdir, extension)?;
        let mut records = Vec::new();

        for path in files {
            match self.load_path(&path) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Failed to load record {:?}: {}", path, e);
                }
            }
        }

        Ok(records)
    }

    /// Append a line to a JSONL file (audit trail, scan records)
    pub fn append_jsonl<T: Serialize>(
        &self,
        subdir: &str,
        filename: &str,
        record: &T,
    ) -> Result<(), ComplianceError> {
        let path = self.base_dir.join(subdir).join(filename);
        let json_line = serde_json::to_string(record)?;

        use std::io::Write;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        writeln!(file, "{}", json_line)?;
        Ok(())
    }

    /// Read all lines from a JSONL file
    pub fn read_jsonl<T: DeserializeOwned>(
        &self,
        subdir: &str,
        filename: &str,
    ) -> Result<Vec<T>, ComplianceError> {
        let path = self.base_dir.join(subdir).join(filename);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&path)?;
        let mut records = Vec::new();

        for line in content.lines() {
            if !line.trim().is_empty() {
                match serde_json::from_str(line) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        tracing::warn!("Failed to parse JSONL line: {}", e);
                    }
                }
            }
        }

        Ok(records)
    }
}
