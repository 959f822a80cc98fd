//! Where newsletter bytes come from: the site directory or a live site over HTTP

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::{Client, Url};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use super::error::FetchError;

/// Characters escaped inside a single URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Fetches text resources by relative path
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch the resource at `path` (relative, `/`-separated)
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Accept only paths that stay below the root: no `..`, no absolute paths or prefixes.
///
/// A leading `/` is treated as relative to the root.
pub fn checked_relative(path: &str) -> Result<PathBuf, FetchError> {
    let trimmed = path.trim_start_matches('/');
    let mut relative = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(FetchError::OutsideRoot {
                    path: path.to_string(),
                })
            }
        }
    }
    if relative.as_os_str().is_empty() {
        return Err(FetchError::NotFound {
            path: path.to_string(),
        });
    }
    Ok(relative)
}

/// Fetch with an optional deadline; `None` waits forever
pub async fn fetch_with_timeout(
    fetcher: &dyn Fetch,
    path: &str,
    timeout: Option<Duration>,
) -> Result<String, FetchError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fetcher.fetch_text(path))
            .await
            .unwrap_or_else(|_| {
                Err(FetchError::Timeout {
                    path: path.to_string(),
                    secs: limit.as_secs(),
                })
            }),
        None => fetcher.fetch_text(path).await,
    }
}

/// Reads files below a root directory
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Fetch for FsFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let full_path = self.root.join(checked_relative(path)?);
        tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => FetchError::NotFound {
                    path: path.to_string(),
                },
                _ => FetchError::Io {
                    path: path.to_string(),
                    source,
                },
            })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Fetches from a deployed site, always revalidating
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let mut base = Url::parse(base_url)
            .map_err(|_| FetchError::InvalidBaseUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::InvalidBaseUrl(base_url.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    /// Resolve a relative path against the base URL, escaping each segment
    pub fn url_for(&self, path: &str) -> Result<Url, FetchError> {
        checked_relative(path)?;
        let encoded = path
            .trim_start_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");
        self.base
            .join(&encoded)
            .map_err(|_| FetchError::InvalidBaseUrl(self.base.to_string()))
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url_for(path)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}
