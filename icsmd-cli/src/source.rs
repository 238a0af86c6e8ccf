//! Calendar byte acquisition from a local file or a URL.

use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::file;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Unable to open file '{path}': {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unable to fetch URL data: {0}")]
    Request(#[from] reqwest::Error),

    #[error("request returned a bad http status code: {0}.")]
    Status(reqwest::StatusCode),
}

impl FetchError {
    /// What the user can do about it.
    pub fn hint(&self) -> &'static str {
        match self {
            FetchError::File { .. } => "Check the file exists and try again.",
            _ => "Make sure the link is accessible and try again.",
        }
    }
}

/// Where calendar bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(Url),
}

pub fn is_url(path: &str) -> bool {
    ["www.", "http://", "https://", "webcal://"]
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// Local files win over URL-looking names.
pub fn use_url(path: &str) -> bool {
    !file::file_exists(path) && is_url(path)
}

impl Source {
    pub fn resolve(input: &str) -> Result<Self, FetchError> {
        if !use_url(input) {
            return Ok(Source::File(PathBuf::from(input)));
        }

        let normalized = if let Some(rest) = input.strip_prefix("webcal://") {
            format!("https://{rest}")
        } else if input.starts_with("www.") {
            format!("https://{input}")
        } else {
            input.to_string()
        };

        Url::parse(&normalized)
            .map(Source::Url)
            .map_err(|source| FetchError::InvalidUrl {
                url: input.to_string(),
                source,
            })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Source::Url(_))
    }

    /// Base name used for the output file: the file name, or the last
    /// non-empty URL path segment.
    pub fn base_name(&self) -> Option<String> {
        match self {
            Source::File(path) => path
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string),
            Source::Url(url) => url
                .path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
                .map(str::to_string),
        }
    }

    pub async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        match self {
            Source::File(path) => fetch_file(path).await,
            Source::Url(url) => fetch_url(url).await,
        }
    }
}

async fn fetch_file(path: &Path) -> Result<Vec<u8>, FetchError> {
    tracing::debug!(path = %path.display(), "reading calendar file");
    tokio::fs::read(path).await.map_err(|source| FetchError::File {
        path: path.to_path_buf(),
        source,
    })
}

async fn fetch_url(url: &Url) -> Result<Vec<u8>, FetchError> {
    tracing::debug!(%url, "fetching calendar");
    let response = reqwest::get(url.clone()).await?;

    let status = response.status();
    if !status.is_success() && !status.is_informational() {
        return Err(FetchError::Status(status));
    }

    let bytes = response.bytes().await?;
    tracing::debug!(%url, bytes = bytes.len(), "fetched calendar");
    Ok(bytes.to_vec())
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => write!(f, "{url}"),
        }
    }
}
