use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::EtlError;

/// Source that can place the raw dataset files in a directory.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Download the dataset into `dest`, returning the number of files written.
    async fn download(&self, dest: &Path) -> Result<usize, EtlError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// API credentials, in the same shape as `~/.kaggle/kaggle.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KaggleCredentials {
    pub username: String,
    pub key: String,
}

impl KaggleCredentials {
    /// Explicit values win; otherwise fall back to the credentials file.
    pub fn resolve(
        username: Option<&str>,
        key: Option<&str>,
        credentials_file: Option<&Path>,
    ) -> Result<Self, EtlError> {
        if let (Some(username), Some(key)) = (username, key) {
            return Ok(KaggleCredentials {
                username: username.to_string(),
                key: key.to_string(),
            });
        }

        let path = credentials_file
            .ok_or_else(|| EtlError::Connection("Kaggle API credentials not found.".into()))?;
        let raw = std::fs::read_to_string(path).map_err(|_| {
            EtlError::Connection(format!(
                "Kaggle API credentials not found at {}",
                path.display()
            ))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            EtlError::Connection(format!(
                "Invalid Kaggle credentials file {}: {}",
                path.display(),
                e
            ))
        })
    }
}

/// `~/.kaggle/kaggle.json`, if a home directory is known
pub fn default_credentials_file() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".kaggle").join("kaggle.json"))
}

/// Downloads a dataset archive from the Kaggle REST API.
pub struct KaggleClient {
    http: Client,
    base_url: String,
    dataset: String,
    credentials: KaggleCredentials,
}

impl KaggleClient {
    pub fn new(
        base_url: &str,
        dataset: &str,
        credentials: KaggleCredentials,
    ) -> Result<Self, EtlError> {
        // The full dataset archive is a few hundred megabytes
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(600))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| EtlError::Connection(format!("Failed to build HTTP client: {}", e)))?;
        Ok(KaggleClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            dataset: dataset.to_string(),
            credentials,
        })
    }
}

#[async_trait]
impl DatasetSource for KaggleClient {
    fn name(&self) -> &str {
        "Kaggle"
    }

    async fn download(&self, dest: &Path) -> Result<usize, EtlError> {
        let url = format!("{}/datasets/download/{}", self.base_url, self.dataset);
        debug!("Downloading dataset archive from {}", url);

        let resp = self
            .http
            .get(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.key))
            .send()
            .await
            .map_err(|e| {
                EtlError::Download(format!("request for dataset {} failed: {}", self.dataset, e))
            })?;

        if !resp.status().is_success() {
            return Err(EtlError::Download(format!(
                "Kaggle returned {} for dataset {}",
                resp.status(),
                self.dataset
            )));
        }

        let bytes = resp.bytes().await.map_err(|e| {
            EtlError::Download(format!("failed reading dataset {}: {}", self.dataset, e))
        })?;
        let written = extract_csv_entries(Cursor::new(bytes), dest)?;
        info!(
            "Dataset '{}' downloaded and extracted to '{}' ({} files)",
            self.dataset,
            dest.display(),
            written
        );
        Ok(written)
    }
}

/// Unpack every `.csv` member of a zip archive into `dest`, flattening any
/// directories inside the archive. Existing files are overwritten.
pub fn extract_csv_entries<R: Read + Seek>(archive: R, dest: &Path) -> Result<usize, EtlError> {
    let mut archive = zip::ZipArchive::new(archive)
        .map_err(|e| EtlError::Download(format!("invalid dataset archive: {}", e)))?;
    std::fs::create_dir_all(dest).map_err(|e| EtlError::io(dest, e))?;

    let mut written = 0;
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| EtlError::Download(format!("corrupt archive entry {}: {}", index, e)))?;
        if entry.is_dir() {
            continue;
        }
        let file_name = match Path::new(entry.name()).file_name() {
            Some(name) if name.to_string_lossy().ends_with(".csv") => name.to_owned(),
            _ => continue,
        };

        let target = dest.join(file_name);
        let mut out = std::fs::File::create(&target).map_err(|e| EtlError::io(&target, e))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| EtlError::io(&target, e))?;
        debug!("Extracted {}", target.display());
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn archive_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, body) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_csv_entries_only_csv() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = archive_with(&[
            ("boxscore.csv", "game_id\n1\n"),
            ("nested/games.csv", "game_id\n1\n"),
            ("README.md", "docs"),
        ]);

        let written = extract_csv_entries(Cursor::new(bytes), dir.path()).unwrap();
        assert_eq!(written, 2);
        assert!(dir.path().join("boxscore.csv").exists());
        assert!(dir.path().join("games.csv").exists());
        assert!(!dir.path().join("README.md").exists());
    }

    #[test]
    fn test_extract_rejects_non_zip() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_csv_entries(Cursor::new(b"not a zip".to_vec()), dir.path()).unwrap_err();
        assert!(matches!(err, EtlError::Download(_)));
    }

    #[test]
    fn test_credentials_explicit_values() {
        let creds = KaggleCredentials::resolve(Some("me"), Some("secret"), None).unwrap();
        assert_eq!(creds.username, "me");
        assert_eq!(creds.key, "secret");
    }

    #[test]
    fn test_credentials_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kaggle.json");
        std::fs::write(&path, r#"{"username":"hoops","key":"abc123"}"#).unwrap();

        let creds = KaggleCredentials::resolve(Some("ignored"), None, Some(&path)).unwrap();
        assert_eq!(
            creds,
            KaggleCredentials {
                username: "hoops".into(),
                key: "abc123".into()
            }
        );
    }

    #[test]
    fn test_credentials_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("kaggle.json");
        let err = KaggleCredentials::resolve(None, None, Some(&missing)).unwrap_err();
        assert!(matches!(err, EtlError::Connection(_)));
        assert!(matches!(
            KaggleCredentials::resolve(None, None, None),
            Err(EtlError::Connection(_))
        ));
    }
}
