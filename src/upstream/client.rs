use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use super::source::SourceKind;

/// 拉取上游数据时可能出现的错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 上游原始数据的来源
#[async_trait]
pub trait UpstreamFetcher: Send + Sync {
    async fn fetch(&self, kind: SourceKind) -> Result<Value, FetchError>;
}

/// 通过 HTTP 从聚合 API 拉取数据
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    /// 每个请求（包括读取响应体）都受 `timeout` 限制
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, kind: SourceKind) -> String {
        format!("{}{}", self.base_url, kind.path())
    }
}

fn request_error(url: &str, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            source,
        }
    }
}

#[async_trait]
impl UpstreamFetcher for HttpFetcher {
    async fn fetch(&self, kind: SourceKind) -> Result<Value, FetchError> {
        let url = self.url_for(kind);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| request_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| request_error(&url, e))?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Malformed { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_source_path() {
        let fetcher = HttpFetcher::new("http://upstream:3001/", Duration::from_secs(1)).unwrap();
        assert_eq!(fetcher.url_for(SourceKind::Transit), "http://upstream:3001/api/data");
        assert_eq!(fetcher.url_for(SourceKind::Tasks), "http://upstream:3001/api/habitica");
    }
}
