//! Dataset download over HTTP.
//!
//! The dataset is fetched exactly once per session, so there is no retry
//! or paging here: a failed download is reported to the caller as-is.

use crate::SourceError;

/// Downloads the body at `url`, failing on any non-success status.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the request fails or the server
/// responds with an error status.
pub async fn download(url: &str) -> Result<Vec<u8>, SourceError> {
    log::info!("Downloading dataset from {url}");

    let response = reqwest::get(url).await?.error_for_status()?;
    let bytes = response.bytes().await?;

    log::debug!("Downloaded {} bytes from {url}", bytes.len());

    Ok(bytes.to_vec())
}
