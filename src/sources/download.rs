// Countries dataset download
//
// The dataset is fetched once and cached on disk; later seeds read the cache.
// Delete the cache file to force a fresh download.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tokio::fs;

use crate::error::SourceError;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Return the cached dataset, downloading it first if the cache is missing
pub async fn fetch_cached(url: &str, cache_path: &Path) -> Result<String, SourceError> {
    if fs::try_exists(cache_path).await.unwrap_or(false) {
        log::info!("Using cached countries data at {}", cache_path.display());
        return read_text(cache_path).await;
    }

    let body = download(url).await?;

    if let Some(parent) = cache_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(|source| SourceError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(cache_path, &body).await.map_err(|source| SourceError::Io {
        path: cache_path.to_path_buf(),
        source,
    })?;
    log::info!("Cached countries data at {}", cache_path.display());

    Ok(body)
}

/// Download a text resource
pub async fn download(url: &str) -> Result<String, SourceError> {
    log::info!("Downloading countries data from {}", url);

    let http_error = |source| SourceError::Http { url: url.to_string(), source };

    let client = Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(http_error)?;

    let response = client.get(url).send().await.map_err(http_error)?;

    if !response.status().is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let body = response.text().await.map_err(http_error)?;
    log::info!("Downloaded {} bytes", body.len());
    Ok(body)
}

/// Read a source file, keeping the path in the error
pub async fn read_text(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).await.map_err(|source| SourceError::Io {
        path: PathBuf::from(path),
        source,
    })
}
