use super::codec::{ensure_absolute, has_parent_segment, join_remote, PathCodec};
use super::result::GenerationResult;
use crate::alist::{AlistClient, DirectoryLister};
use crate::config::Config;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Walks remote directories and writes one `.strm` descriptor per video file.
///
/// The generator holds no per-request state, so a single instance is shared
/// by every concurrent webhook call. Two requests over overlapping trees may
/// both pass the existence check for the same file; the write itself refuses
/// to replace an existing descriptor, so the loser reports it as skipped.
pub struct StrmGenerator {
    lister: Arc<dyn DirectoryLister>,
    codec: PathCodec,
}

impl StrmGenerator {
    pub fn new(lister: Arc<dyn DirectoryLister>, codec: PathCodec) -> Self {
        Self { lister, codec }
    }

    /// Build a generator backed by the AList server from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(AlistClient::new(&config.alist)),
            PathCodec::new(&config.strm),
        )
    }

    /// Recursively mirror `root` into descriptors.
    ///
    /// Only the root listing forces an AList cache refresh. A directory that
    /// cannot be listed contributes one error entry and its subtree is
    /// skipped; the rest of the walk continues.
    pub async fn generate(&self, root: &str) -> GenerationResult {
        let mut result = GenerationResult::new();
        let mut pending = vec![(root.to_string(), true)];

        while let Some((dir, refresh)) = pending.pop() {
            let entries = match self.lister.list_directory(&dir, refresh).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Failed to list directory {}: {}", dir, e);
                    result.record_error(format!("failed to list directory: {} ({})", dir, e));
                    continue;
                }
            };

            let mut subdirs = Vec::new();
            for entry in entries {
                if entry.name.is_empty() || entry.name == "." {
                    debug!("Ignoring entry {:?} under {}", entry.name, dir);
                    continue;
                }
                let path = join_remote(&dir, &entry.name);
                if entry.is_dir {
                    if has_parent_segment(&path) {
                        warn!("Refusing to descend into {}", path);
                        result.record_error(format!(
                            "refusing path outside save directory: {}",
                            path
                        ));
                        continue;
                    }
                    subdirs.push(path);
                } else {
                    self.process_file(&path, &mut result).await;
                }
            }

            // Reversed so the first listed subdirectory is popped first
            pending.extend(subdirs.into_iter().rev().map(|d| (d, false)));
        }

        log_summary(root, &result);
        result
    }

    /// Process explicit remote file paths without listing anything.
    pub async fn generate_files<S: AsRef<str>>(&self, files: &[S]) -> GenerationResult {
        let mut result = GenerationResult::new();
        for file in files {
            let path = ensure_absolute(file.as_ref());
            self.process_file(&path, &mut result).await;
        }

        log_summary("<direct>", &result);
        result
    }

    async fn process_file(&self, remote_path: &str, result: &mut GenerationResult) {
        if !self.codec.is_media(remote_path) {
            return;
        }

        // Output paths mirror the remote path, so `..` would leave the save directory
        if has_parent_segment(remote_path) {
            warn!("Refusing path outside save directory: {}", remote_path);
            result.record_error(format!(
                "refusing path outside save directory: {}",
                remote_path
            ));
            return;
        }

        let output = self.codec.local_output_path(remote_path);
        match fs::try_exists(&output).await {
            Ok(true) => {
                debug!("STRM already exists, skipping: {}", output.display());
                result.record_skipped(&output);
                return;
            }
            Ok(false) => {}
            Err(e) => {
                warn!("Failed to check {}: {}", output.display(), e);
                result.record_error(format!("failed to check {} ({})", output.display(), e));
                return;
            }
        }

        let url = self.codec.stream_url(remote_path);
        match write_descriptor(&output, &url).await {
            Ok(()) => {
                info!("Created STRM {}", output.display());
                result.record_created(&output);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!("STRM appeared concurrently, skipping: {}", output.display());
                result.record_skipped(&output);
            }
            Err(e) => {
                warn!("Failed to write {}: {}", output.display(), e);
                result.record_error(format!("failed to write {} ({})", output.display(), e));
            }
        }
    }
}

async fn write_descriptor(path: &Path, url: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(url.as_bytes()).await?;
    file.flush().await
}

fn log_summary(root: &str, result: &GenerationResult) {
    let counts = result.counts();
    info!(
        root,
        created = counts.created_count,
        skipped = counts.skipped_count,
        errors = counts.error_count,
        "STRM generation finished"
    );
}
