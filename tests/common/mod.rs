//! Shared test harness for integration tests.
//!
//! Provides [`FakeLister`], an in-memory remote tree that records every
//! listing call, and [`TestHarness`], which wires a generator and router to a
//! temporary save directory.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use strm_webhook::alist::{DirectoryLister, ListError, RemoteEntry};
use strm_webhook::config::{Config, StrmConfig};
use strm_webhook::server::{create_router, AppContext};
use strm_webhook::strm::{PathCodec, StrmGenerator};
use tempfile::TempDir;

pub const STREAM_SERVER: &str = "http://host:5244/d";

/// In-memory directory tree keyed by remote directory path.
#[derive(Default)]
pub struct FakeLister {
    dirs: HashMap<String, Vec<RemoteEntry>>,
    failing: HashMap<String, String>,
    calls: Mutex<Vec<(String, bool)>>,
}

impl FakeLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dir(mut self, path: &str, entries: Vec<RemoteEntry>) -> Self {
        self.dirs.insert(path.to_string(), entries);
        self
    }

    pub fn failing(mut self, path: &str, message: &str) -> Self {
        self.failing.insert(path.to_string(), message.to_string());
        self
    }

    /// Every `(path, refresh)` pair requested so far, in call order.
    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DirectoryLister for FakeLister {
    async fn list_directory(
        &self,
        path: &str,
        refresh: bool,
    ) -> Result<Vec<RemoteEntry>, ListError> {
        self.calls.lock().unwrap().push((path.to_string(), refresh));

        if let Some(message) = self.failing.get(path) {
            return Err(ListError::Api {
                code: 500,
                message: message.clone(),
            });
        }

        self.dirs.get(path).cloned().ok_or_else(|| ListError::Api {
            code: 500,
            message: "object not found".to_string(),
        })
    }
}

/// A generator writing into its own temporary directory.
pub struct TestHarness {
    pub dir: TempDir,
    pub lister: Arc<FakeLister>,
    pub config: Config,
}

impl TestHarness {
    pub fn new(lister: FakeLister) -> Self {
        Self::with_replace(lister, "")
    }

    pub fn with_replace(lister: FakeLister, replace_path: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut config = Config::default();
        config.strm = StrmConfig {
            server: STREAM_SERVER.to_string(),
            save_dir: dir.path().to_path_buf(),
            replace_path: replace_path.to_string(),
            ..StrmConfig::default()
        };

        Self {
            dir,
            lister: Arc::new(lister),
            config,
        }
    }

    pub fn save_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Local descriptor path for a remote-relative path like `115/a.strm`.
    pub fn output(&self, relative: &str) -> PathBuf {
        self.save_dir().join(relative)
    }

    pub fn output_str(&self, relative: &str) -> String {
        self.output(relative).display().to_string()
    }

    pub fn generator(&self) -> StrmGenerator {
        StrmGenerator::new(self.lister.clone(), PathCodec::new(&self.config.strm))
    }

    pub fn context(&self) -> AppContext {
        AppContext::with_generator(self.config.clone(), self.generator())
    }

    /// Start an Axum server on a random port.
    pub async fn serve(&self) -> SocketAddr {
        let app = create_router(self.context());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }
}

pub fn file(name: &str) -> RemoteEntry {
    RemoteEntry::file(name)
}

pub fn dir(name: &str) -> RemoteEntry {
    RemoteEntry::dir(name)
}
