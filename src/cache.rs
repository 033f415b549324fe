//! Download-once local cache for the OpenFlights dataset files.
//!
//! `routes.dat` and `airports.dat` are fetched from the OpenFlights GitHub
//! mirror on first access and reused afterwards. Callers may point a dataset
//! at an explicit local file instead, in which case nothing is downloaded.

use crate::config;
use crate::error::{AirlineDemandError, Result};
use reqwest::blocking::Client;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Locates dataset files on disk, downloading them when needed.
pub struct CacheManager {
    /// Directory where downloaded files are stored.
    pub cache_dir: PathBuf,
    /// If true, never download (use cached or explicit local files only).
    pub offline: bool,
    timeout: Duration,
    client: Option<Client>,
    local_files: HashMap<String, PathBuf>,
}

impl CacheManager {
    /// Create a new cache manager.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the cache directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>, offline: bool, timeout: Duration) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            timeout,
            client: None,
            local_files: HashMap::new(),
        })
    }

    /// Serve `dataset` from an explicit file instead of the download cache.
    pub fn set_local_file<P: AsRef<Path>>(&mut self, dataset: &str, path: P) -> Result<()> {
        if !config::dataset_files().contains_key(dataset) {
            return Err(AirlineDemandError::InvalidArgument(format!(
                "Unknown dataset: {}",
                dataset
            )));
        }
        self.local_files
            .insert(dataset.to_string(), path.as_ref().to_path_buf());
        Ok(())
    }

    /// Lazy HTTP client, created on first use.
    pub fn client(&mut self) -> Result<&Client> {
        if self.client.is_none() {
            let client = Client::builder()
                .timeout(self.timeout)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()?;
            self.client = Some(client);
        }
        self.client
            .as_ref()
            .ok_or_else(|| AirlineDemandError::InvalidArgument("HTTP client unavailable".into()))
    }

    /// Path a dataset would be read from, without downloading.
    pub fn dataset_path(&self, dataset: &str) -> Result<PathBuf> {
        if let Some(local) = self.local_files.get(dataset) {
            return Ok(local.clone());
        }
        let files = config::dataset_files();
        let filename = files.get(dataset).ok_or_else(|| {
            AirlineDemandError::NotFound(format!("Unknown dataset: {}", dataset))
        })?;
        Ok(self.cache_dir.join(filename))
    }

    /// Whether the dataset is already available locally.
    pub fn is_cached(&self, dataset: &str) -> bool {
        self.dataset_path(dataset)
            .map(|p| p.exists())
            .unwrap_or(false)
    }

    /// Ensure a dataset file is available locally, downloading if needed.
    ///
    /// Every failure to produce a readable file (missing local override,
    /// offline without a cached copy, failed download) is reported as
    /// [`AirlineDemandError::DatasetUnavailable`].
    pub fn ensure_dataset(&mut self, dataset: &str) -> Result<PathBuf> {
        let path = self.dataset_path(dataset)?;

        if let Some(local) = self.local_files.get(dataset) {
            if local.is_file() {
                return Ok(path);
            }
            return Err(AirlineDemandError::DatasetUnavailable(format!(
                "{} file {} does not exist",
                dataset,
                local.display()
            )));
        }

        if path.exists() {
            return Ok(path);
        }

        if self.offline {
            return Err(AirlineDemandError::DatasetUnavailable(format!(
                "{} not cached and offline mode is enabled",
                dataset
            )));
        }

        let files = config::dataset_files();
        let filename = files.get(dataset).copied().unwrap_or_default();
        let url = format!("{}/{}", config::OPENFLIGHTS_BASE, filename);
        self.download_file(&url, &path).map_err(|e| {
            AirlineDemandError::DatasetUnavailable(format!("failed to download {}: {}", url, e))
        })?;

        Ok(path)
    }

    /// Download `url` into `dest`.
    ///
    /// Writes to a temp file in the same directory and persists it on
    /// success, so an interrupted download never leaves a partial file behind.
    fn download_file(&mut self, url: &str, dest: &Path) -> Result<()> {
        log::info!("Downloading {}", url);

        let dir = dest.parent().unwrap_or(self.cache_dir.as_path()).to_path_buf();
        fs::create_dir_all(&dir)?;

        let client = self.client()?.clone();
        let resp = client.get(url).send()?.error_for_status()?;
        let bytes = resp.bytes()?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.persist(dest).map_err(|e| AirlineDemandError::Io(e.error))?;

        log::info!("Saved {} ({} bytes)", dest.display(), bytes.len());
        Ok(())
    }

    /// Remove all downloaded files and recreate the cache directory.
    ///
    /// Explicit local files are never touched.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}
