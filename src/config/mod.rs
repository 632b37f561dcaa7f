mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Suffix AList serves raw file downloads under
const DOWNLOAD_SUFFIX: &str = "/d";

/// Environment variables that override file configuration
pub const ENV_ALIST_URL: &str = "ALIST_URL";
pub const ENV_ALIST_TOKEN: &str = "ALIST_TOKEN";
pub const ENV_STRM_SERVER: &str = "STRM_SERVER";
pub const ENV_STRM_SAVE_DIR: &str = "STRM_SAVE_DIR";
pub const ENV_STRM_REPLACE_PATH: &str = "STRM_REPLACE_PATH";
pub const ENV_WEBHOOK_HOST: &str = "WEBHOOK_HOST";
pub const ENV_WEBHOOK_PORT: &str = "WEBHOOK_PORT";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config)?;
    normalize_config(&mut config);
    validate_config(&config)?;

    tracing::info!("Loaded config file: {:?}", path);
    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./strm-webhook.toml",
        "~/.config/strm-webhook/config.toml",
        "/etc/strm-webhook/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    normalize_config(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Apply overrides from the process environment
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides using an arbitrary variable lookup
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_ALIST_URL) {
        config.alist.url = url;
    }
    if let Some(token) = lookup(ENV_ALIST_TOKEN) {
        config.alist.token = token;
    }
    if let Some(server) = lookup(ENV_STRM_SERVER) {
        config.strm.server = server;
    }
    if let Some(dir) = lookup(ENV_STRM_SAVE_DIR) {
        config.strm.save_dir = dir.into();
    }
    if let Some(replace) = lookup(ENV_STRM_REPLACE_PATH) {
        config.strm.replace_path = replace;
    }
    if let Some(host) = lookup(ENV_WEBHOOK_HOST) {
        config.server.host = host;
    }
    if let Some(port) = lookup(ENV_WEBHOOK_PORT) {
        config.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("Invalid {} value: {:?}", ENV_WEBHOOK_PORT, port))?;
    }
    Ok(())
}

/// Bring user-supplied values into the canonical shape the generator expects
pub fn normalize_config(config: &mut Config) {
    config.alist.url = config.alist.url.trim_end_matches('/').to_string();
    config.strm.server = normalize_stream_server(&config.strm.server);
    config.strm.replace_path = normalize_replace_path(&config.strm.replace_path);

    for ext in config.strm.video_exts.iter_mut() {
        *ext = ext.trim().trim_start_matches('.').to_lowercase();
    }
    config.strm.video_exts.retain(|ext| !ext.is_empty());
}

/// Ensure the stream server has a scheme and ends with exactly one `/d`.
pub fn normalize_stream_server(server: &str) -> String {
    let mut server = server.trim().to_string();
    if !server.starts_with("http") {
        server = format!("http://{}", server);
    }
    let mut server = server.trim_end_matches('/').to_string();
    if !server.ends_with(DOWNLOAD_SUFFIX) {
        server.push_str(DOWNLOAD_SUFFIX);
    }
    server
}

fn normalize_replace_path(replace: &str) -> String {
    let trimmed = replace.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        // A bare "/" still means "replace with root"
        return if replace.trim().is_empty() {
            String::new()
        } else {
            "/".to_string()
        };
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.alist.url.is_empty() {
        anyhow::bail!("AList URL cannot be empty");
    }

    if config.strm.save_dir.as_os_str().is_empty() {
        anyhow::bail!("STRM save directory cannot be empty");
    }

    if !config.strm.save_dir.is_absolute() {
        tracing::warn!(
            "STRM save directory is relative and will resolve against the working directory: {:?}",
            config.strm.save_dir
        );
    }

    if config.strm.video_exts.is_empty() {
        anyhow::bail!("At least one video extension must be configured");
    }

    Ok(())
}
