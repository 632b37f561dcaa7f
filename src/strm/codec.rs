//! Path derivation for stream descriptors.
//!
//! Everything here is pure string manipulation over remote (AList) paths,
//! which are always `/`-separated regardless of the host platform.

use crate::config::StrmConfig;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::HashSet;
use std::path::PathBuf;

/// Extension given to every generated descriptor
pub const STRM_EXTENSION: &str = "strm";

/// Characters left literal in stream URLs: unreserved marks plus `/`.
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Maps remote file paths to local descriptor paths and stream URLs.
#[derive(Debug, Clone)]
pub struct PathCodec {
    save_dir: String,
    stream_server: String,
    replace_path: Option<String>,
    video_exts: HashSet<String>,
}

impl PathCodec {
    pub fn new(config: &StrmConfig) -> Self {
        let replace_path = Some(config.replace_path.as_str())
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Self {
            save_dir: config.save_dir.to_string_lossy().into_owned(),
            stream_server: config.server.trim_end_matches('/').to_string(),
            replace_path,
            video_exts: config
                .video_exts
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// True when the final segment carries a configured video extension.
    ///
    /// ```
    /// use strm_webhook::config::StrmConfig;
    /// use strm_webhook::strm::PathCodec;
    ///
    /// let codec = PathCodec::new(&StrmConfig::default());
    /// assert!(codec.is_media("/115/Movies/movie.MKV"));
    /// assert!(!codec.is_media("/115/Movies/movie.srt"));
    /// assert!(!codec.is_media("/115/Movies/README"));
    /// ```
    pub fn is_media(&self, path: &str) -> bool {
        extension(file_name(path))
            .map(|ext| self.video_exts.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    /// Local path of the descriptor for `remote_path`.
    pub fn local_output_path(&self, remote_path: &str) -> PathBuf {
        let stem = strip_extension(remote_path);
        let joined = format!("{}/{}.{}", self.save_dir, stem, STRM_EXTENSION);
        PathBuf::from(collapse_slashes(&joined))
    }

    /// URL written into the descriptor for `remote_path`.
    pub fn stream_url(&self, remote_path: &str) -> String {
        let source = match self.replace_path {
            Some(ref prefix) => rewrite_first_segment(remote_path, prefix),
            None => remote_path.to_string(),
        };
        let encoded = utf8_percent_encode(&source, PATH_ENCODE_SET);
        format!("{}{}", self.stream_server, encoded)
    }
}

/// Join a listed child onto its parent directory.
pub fn join_remote(dir: &str, name: &str) -> String {
    collapse_slashes(&format!("{}/{}", dir, name))
}

/// Prefix `/` onto a remote path if the caller left it off.
pub fn ensure_absolute(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// True when any segment is `..`, which would resolve outside the save directory.
pub fn has_parent_segment(path: &str) -> bool {
    path.split('/').any(|segment| segment == "..")
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn extension(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext).filter(|e| !e.is_empty())
}

/// Drop the extension of the final segment only. Dotfiles keep their name.
fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[name_start..].rfind('.') {
        Some(0) | None => path,
        Some(dot) => &path[..name_start + dot],
    }
}

/// `/115/Movies/x.mp4` with prefix `/mnt/remote` becomes `/mnt/remote/Movies/x.mp4`.
/// Paths without a segment after the first are returned unchanged.
fn rewrite_first_segment(path: &str, prefix: &str) -> String {
    let mut parts = path.splitn(3, '/');
    let _leading = parts.next();
    let _first = parts.next();
    match parts.next() {
        Some(rest) => format!("{}/{}", prefix.trim_end_matches('/'), rest),
        None => path.to_string(),
    }
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }
    out
}
