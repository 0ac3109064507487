//! URL validation and HTTP response validation for fetches

use nwkit_errors::{Error, NetworkError};
use reqwest::header::CONTENT_TYPE;
use url::Url;

/// Validate URL and check for supported protocols
///
/// # Errors
///
/// Returns `InvalidUrl` if the string does not parse and
/// `UnsupportedProtocol` for anything but http(s).
pub fn validate_url(url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(NetworkError::UnsupportedProtocol {
            protocol: scheme.to_string(),
        }
        .into()),
    }
}

/// Error message for a non-success status, if any
pub(crate) fn status_failure(response: &reqwest::Response) -> Option<String> {
    let status = response.status();
    (!status.is_success()).then(|| format!("HTTP {status}"))
}

/// Media type of a response with parameters stripped and lowercased
#[must_use]
pub fn content_type_essence(response: &reqwest::Response) -> Option<String> {
    let value = response.headers().get(CONTENT_TYPE)?.to_str().ok()?;
    essence(value)
}

fn essence(value: &str) -> Option<String> {
    let essence = value.split(';').next()?.trim().to_ascii_lowercase();
    (!essence.is_empty()).then_some(essence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_essence_strips_parameters() {
        assert_eq!(
            essence("Application/ZIP; charset=binary").as_deref(),
            Some("application/zip")
        );
        assert_eq!(essence("application/gzip").as_deref(), Some("application/gzip"));
        assert_eq!(essence(" ; x=y"), None);
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://s3.amazonaws.com/node-webkit/v0.7.5/x-").is_ok());
        assert!(matches!(
            validate_url("ftp://example.com/nw-"),
            Err(Error::Network(NetworkError::UnsupportedProtocol { .. }))
        ));
        assert!(matches!(
            validate_url("not a url"),
            Err(Error::Network(NetworkError::InvalidUrl(_)))
        ));
    }
}
