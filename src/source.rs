//! Server list acquisition.
//!
//! The list is one server per line. It can come from an HTTP(S) URL, a local
//! file, or stdin (`-`).

use log::{debug, info};
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

use crate::error_handling::SourceError;

/// Splits server list text into entries.
///
/// Lines are trimmed; blank lines and `#` comments are dropped.
pub fn parse_server_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Loads the server list from `source`.
///
/// # Errors
///
/// Returns a [`SourceError`] if the source cannot be read, the HTTP request
/// fails or returns a non-success status, or no entries remain after filtering.
pub async fn load_servers(
    source: &str,
    client: &reqwest::Client,
) -> Result<Vec<String>, SourceError> {
    let text = if source == "-" {
        info!("Reading servers from stdin");
        read_stdin().await?
    } else if is_http_source(source) {
        info!("Fetching servers from {source}");
        fetch(source, client).await?
    } else {
        info!("Reading servers from {source}");
        tokio::fs::read_to_string(source)
            .await
            .map_err(|e| SourceError::Io {
                path: source.to_string(),
                source: e,
            })?
    };

    let servers = parse_server_list(&text);
    if servers.is_empty() {
        return Err(SourceError::Empty(source.to_string()));
    }
    debug!("Loaded {} server entries from {source}", servers.len());
    Ok(servers)
}

fn is_http_source(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

async fn fetch(source: &str, client: &reqwest::Client) -> Result<String, SourceError> {
    let url = Url::parse(source).map_err(|e| SourceError::InvalidUrl {
        url: source.to_string(),
        source: e,
    })?;

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            url: source.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.text().await?)
}

async fn read_stdin() -> Result<String, SourceError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut text = String::new();
    while let Some(line) = lines.next_line().await.map_err(|e| SourceError::Io {
        path: "-".to_string(),
        source: e,
    })? {
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}
