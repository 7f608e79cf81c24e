//! Resumable checkpoint of completed simulation keys.
//!
//! One JSONL file: each line is the hex key hash of a completed (day,
//! session, config) unit. On resume the batch driver skips everything
//! already listed, so an interrupted run only computes missing keys.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use orblab_core::domain::KeyHash;

#[derive(Debug)]
pub struct Checkpoint {
    path: PathBuf,
    done: HashSet<String>,
}

impl Checkpoint {
    /// Load an existing checkpoint, or start empty if the file is absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut done = HashSet::new();
        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read checkpoint {}", path.display()))?;
            for line in content.lines() {
                let line = line.trim();
                if !line.is_empty() {
                    done.insert(line.to_string());
                }
            }
        }
        Ok(Self { path, done })
    }

    pub fn contains(&self, key: &KeyHash) -> bool {
        self.done.contains(&key.0)
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    /// Append newly completed keys and fold them into the in-memory set.
    pub fn record(&mut self, keys: &[KeyHash]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open checkpoint {}", self.path.display()))?;
        for key in keys {
            if self.done.insert(key.0.clone()) {
                writeln!(file, "{}", key.0)?;
            }
        }
        Ok(())
    }
}
