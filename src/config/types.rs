use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub alist: AlistConfig,

    #[serde(default)]
    pub strm: StrmConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    9527
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlistConfig {
    /// Base URL of the AList server, e.g. `http://192.168.1.10:5244`
    #[serde(default = "default_alist_url")]
    pub url: String,

    /// Token sent verbatim in the `Authorization` header (empty = no auth)
    #[serde(default)]
    pub token: String,

    /// Per-request timeout for directory listings
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_alist_url() -> String {
    "http://127.0.0.1:5244".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for AlistConfig {
    fn default() -> Self {
        Self {
            url: default_alist_url(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrmConfig {
    /// Public prefix written into every .strm file (normalized to end in `/d`)
    #[serde(default = "default_strm_server")]
    pub server: String,

    /// Local directory the .strm tree is mirrored into
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,

    /// Replacement for the first segment of the remote path in stream URLs
    #[serde(default)]
    pub replace_path: String,

    #[serde(default = "default_video_exts")]
    pub video_exts: Vec<String>,
}

fn default_strm_server() -> String {
    "http://127.0.0.1:5244/d".to_string()
}
fn default_save_dir() -> PathBuf {
    PathBuf::from("/data/strm")
}
fn default_video_exts() -> Vec<String> {
    [
        "mp4", "mkv", "flv", "mov", "m4v", "avi", "webm", "wmv", "ts", "rmvb",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for StrmConfig {
    fn default() -> Self {
        Self {
            server: default_strm_server(),
            save_dir: default_save_dir(),
            replace_path: String::new(),
            video_exts: default_video_exts(),
        }
    }
}

impl Config {
    /// Copy of the config that is safe to expose over HTTP.
    pub fn redacted(&self) -> Config {
        let mut config = self.clone();
        if !config.alist.token.is_empty() {
            config.alist.token = "***".to_string();
        }
        config
    }
}
