use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AlertError, Result};
use crate::reading::{Reading, Subscription};
use crate::store::{same_subscription, ReadingStore, SubscriberDirectory};

fn persist_err(what: &str, path: &Path, e: impl std::fmt::Display) -> AlertError {
    AlertError::Persistence(format!("{what} {}: {e}", path.display()))
}

async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| persist_err("creating dir for", path, e))?;
    }
    Ok(())
}

/// Readings as JSON lines, one per append.
pub struct FileReadingStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileReadingStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl ReadingStore for FileReadingStore {
    async fn append(&self, reading: &Reading) -> Result<()> {
        let mut line =
            serde_json::to_string(reading).map_err(|e| persist_err("encoding reading for", &self.path, e))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        ensure_parent(&self.path).await?;
        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| persist_err("opening", &self.path, e))?;
        f.write_all(line.as_bytes())
            .await
            .map_err(|e| persist_err("appending to", &self.path, e))?;
        f.flush()
            .await
            .map_err(|e| persist_err("flushing", &self.path, e))?;
        Ok(())
    }

    async fn readings(&self) -> Result<Vec<Reading>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(persist_err("reading", &self.path, e)),
        };
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(|e| persist_err("decoding line in", &self.path, e)))
            .collect()
    }
}

/// Subscriptions as one JSON array, rewritten on every add.
pub struct FileSubscriberDirectory {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSubscriberDirectory {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<Subscription>> {
        match fs::read_to_string(&self.path).await {
            Ok(s) if s.trim().is_empty() => Ok(Vec::new()),
            Ok(s) => serde_json::from_str(&s).map_err(|e| persist_err("decoding", &self.path, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(persist_err("reading", &self.path, e)),
        }
    }
}

#[async_trait::async_trait]
impl SubscriberDirectory for FileSubscriberDirectory {
    async fn all(&self) -> Result<Vec<Subscription>> {
        self.load().await
    }

    async fn add(&self, sub: Subscription) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut subs = self.load().await?;
        if subs.iter().any(|s| same_subscription(s, &sub)) {
            return Ok(false);
        }
        subs.push(sub);

        ensure_parent(&self.path).await?;
        let bytes = serde_json::to_vec_pretty(&subs)
            .map_err(|e| persist_err("encoding", &self.path, e))?;
        // Write-then-rename so a crash never leaves a truncated directory.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)
            .await
            .map_err(|e| persist_err("writing", &tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| persist_err("replacing", &self.path, e))?;
        Ok(true)
    }
}
