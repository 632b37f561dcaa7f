use serde::{Deserialize, Serialize};

/// Body of `POST /api/fs/list`
#[derive(Debug, Clone, Serialize)]
pub struct ListRequest<'a> {
    pub path: &'a str,
    pub refresh: bool,
    pub password: &'a str,
    pub page: u32,
    /// 0 asks AList for every entry in one page
    pub per_page: u32,
}

impl<'a> ListRequest<'a> {
    pub fn new(path: &'a str, refresh: bool) -> Self {
        Self {
            path,
            refresh,
            password: "",
            page: 1,
            per_page: 0,
        }
    }
}

/// Envelope every AList API response is wrapped in
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListData {
    /// AList returns `null` for an empty directory
    #[serde(default)]
    pub content: Option<Vec<RemoteEntry>>,
    #[serde(default)]
    pub total: Option<i64>,
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_dir: bool,
}

impl RemoteEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}
