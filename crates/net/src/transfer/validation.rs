//! Response validation and destination naming for transfers

use addonhub_errors::{Error, NetworkError};
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use url::Url;

/// Reject asset responses with an error status
pub(super) fn validate_response(response: &reqwest::Response) -> Result<(), Error> {
    let status = response.status();
    if status.as_u16() >= 400 {
        return Err(NetworkError::DownloadHttpError {
            status: status.as_u16(),
            url: response.url().to_string(),
        }
        .into());
    }
    Ok(())
}

/// Decoded last path segment of the URL the body was actually served from
///
/// Redirects are followed before this is read, so the name reflects the
/// final location rather than the one the registry handed out. A segment
/// that decodes to something other than a plain file name is rejected.
pub(super) fn file_name(url: &Url) -> Result<String, Error> {
    let invalid = || NetworkError::InvalidUrl(format!("{url}: no file name in path"));

    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .ok_or_else(invalid)?;
    let name = percent_decode_str(segment).decode_utf8_lossy();

    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(invalid().into());
    }
    Ok(name.into_owned())
}

pub(super) fn destination(dir: &Path, url: &Url) -> Result<PathBuf, Error> {
    Ok(dir.join(file_name(url)?))
}
