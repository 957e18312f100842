use crate::error::{RelayError, Result};
use reqwest::Url;

/// Resolve a configured endpoint into the REST API base URL.
///
/// `chat.example.com` becomes `http://chat.example.com/`; an explicit scheme is
/// honored only as far as `https` vs. `http`.
pub fn parse_server_url(endpoint: &str) -> Result<Url> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(RelayError::Config("Server URL is empty".to_string()));
    }

    let (scheme, rest) = match endpoint.find("://") {
        Some(index) if index > 0 => {
            let scheme = if endpoint[..index].starts_with("https") {
                "https"
            } else {
                "http"
            };
            (scheme, &endpoint[index + "://".len()..])
        }
        _ => ("http", endpoint),
    };

    // Url::join drops the last segment unless the base ends with a slash
    let rest = rest.trim_end_matches('/');
    let url = Url::parse(&format!("{}://{}/", scheme, rest))
        .map_err(|e| RelayError::Config(format!("Invalid server URL {}: {}", endpoint, e)))?;

    if url.host_str().is_none_or(str::is_empty) {
        return Err(RelayError::Config(format!(
            "Server URL has no host: {}",
            endpoint
        )));
    }

    Ok(url)
}

pub fn api_url(base: &Url, method: &str) -> Result<Url> {
    base.join(&format!("api/v1/{}", method))
        .map_err(|e| RelayError::Config(format!("Invalid API path {}: {}", method, e)))
}
