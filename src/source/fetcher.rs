//! PublicWhip dataset downloads.
//!
//! Each dataset is published as a pair of files under the data root:
//! `votematrix-<dataset>.dat` and `votematrix-<dataset>.txt`.

use super::parser::{parse_divisions, parse_members};
use crate::models::VoteTable;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info};

/// Options for the download client.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Data root, e.g. `https://www.publicwhip.org.uk/data/`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_seconds: u64,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            base_url: "https://www.publicwhip.org.uk/data/".to_string(),
            timeout_seconds: 120,
            user_agent: format!("whipgraph/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// File name of a dataset's division matrix.
pub fn division_file(dataset: &str) -> String {
    format!("votematrix-{}.dat", dataset)
}

/// File name of a dataset's member table.
pub fn member_file(dataset: &str) -> String {
    format!("votematrix-{}.txt", dataset)
}

/// Join a data root and a file name with exactly one slash between them.
pub fn join_url(base_url: &str, file: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), file)
}

/// HTTP client for the PublicWhip data root.
pub struct PublicWhipClient {
    options: FetchOptions,
    http_client: reqwest::Client,
}

impl PublicWhipClient {
    /// Create a new client.
    pub fn new(options: FetchOptions) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .user_agent(options.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            options,
            http_client,
        })
    }

    /// Download a single file as text.
    async fn fetch_text(&self, file: &str) -> Result<String> {
        let url = join_url(&self.options.base_url, file);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to request {}", url))?
            .error_for_status()
            .with_context(|| format!("Server rejected request for {}", url))?;

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        debug!("Received {} bytes from {}", body.len(), url);
        Ok(body)
    }

    /// Download and parse both files of a dataset.
    pub async fn fetch_dataset(&self, dataset: &str) -> Result<VoteTable> {
        info!("Fetching dataset {} from {}", dataset, self.options.base_url);

        let division_name = division_file(dataset);
        let member_name = member_file(dataset);
        let (division_text, member_text) = futures::try_join!(
            self.fetch_text(&division_name),
            self.fetch_text(&member_name)
        )?;

        let divisions = parse_divisions(&division_text)
            .with_context(|| format!("Malformed division matrix for dataset {}", dataset))?;
        let members = parse_members(&member_text)
            .with_context(|| format!("Malformed member table for dataset {}", dataset))?;

        info!(
            "Dataset {}: {} divisions, {} members",
            dataset,
            divisions.len(),
            members.len()
        );

        Ok(VoteTable {
            dataset: dataset.to_string(),
            divisions,
            members,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(division_file("2017"), "votematrix-2017.dat");
        assert_eq!(member_file("1997"), "votematrix-1997.txt");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://www.publicwhip.org.uk/data/", "votematrix-2017.dat"),
            "https://www.publicwhip.org.uk/data/votematrix-2017.dat"
        );
        assert_eq!(
            join_url("http://localhost:8080/data", "votematrix-2017.txt"),
            "http://localhost:8080/data/votematrix-2017.txt"
        );
    }

    #[test]
    fn test_fetch_options_default() {
        let options = FetchOptions::default();
        assert!(options.base_url.starts_with("https://"));
        assert_eq!(options.timeout_seconds, 120);
        assert!(options.user_agent.starts_with("whipgraph/"));
    }

    #[test]
    fn test_client_builds() {
        assert!(PublicWhipClient::new(FetchOptions::default()).is_ok());
    }

    #[test]
    fn test_unreachable_host_is_error() {
        let client = PublicWhipClient::new(FetchOptions {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
            ..FetchOptions::default()
        })
        .unwrap();

        let result = tokio_test::block_on(client.fetch_dataset("2017"));
        assert!(result.is_err());
    }
}
