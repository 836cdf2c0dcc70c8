use crate::domain::ports::{ConfigProvider, PageFetcher};
use crate::utils::error::{ElectionError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout_seconds: u64, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.request_timeout_seconds(), config.user_agent())
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get_page(&self, url: &str) -> Result<String> {
        tracing::debug!("Making HTTP request to: {}", url);
        let response = self.client.get(url).send().await?;

        tracing::debug!("HTTP response status: {}", response.status());
        if !response.status().is_success() {
            return Err(ElectionError::HttpStatusError {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_get_page_returns_body() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/elections/forthcoming-by-elections/");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<html>listing</html>");
        });

        let fetcher = HttpFetcher::new(5, "every-election-test").unwrap();
        let body = fetcher
            .get_page(&server.url("/elections/forthcoming-by-elections/"))
            .await
            .unwrap();

        page_mock.assert();
        assert_eq!(body, "<html>listing</html>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let fetcher = HttpFetcher::new(5, "every-election-test").unwrap();
        let err = fetcher.get_page(&server.url("/missing")).await.unwrap_err();
        assert!(matches!(
            err,
            ElectionError::HttpStatusError { status: 404, .. }
        ));
    }
}
