use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: StatusCode },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Transport used by the pipeline. Both calls return the response body of a
/// 2xx response and an error for anything else.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Submit a form-encoded POST.
    async fn post_form(&self, url: &Url, form: &[(String, String)]) -> Result<String, FetchError>;

    /// Plain GET; any query string is already part of `url`.
    async fn get(&self, url: &Url) -> Result<String, FetchError>;
}

/// `reqwest`-backed transport with a fixed User-Agent.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(HttpClient { client })
    }

    async fn body(url: &Url, response: reqwest::Response) -> Result<String, FetchError> {
        let status = response.status();
        debug!(%url, %status, "response");
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Fetch for HttpClient {
    async fn post_form(&self, url: &Url, form: &[(String, String)]) -> Result<String, FetchError> {
        let response = self
            .client
            .post(url.clone())
            .header(header::ACCEPT, "text/html")
            .form(form)
            .send()
            .await?;
        Self::body(url, response).await
    }

    async fn get(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "text/html")
            .send()
            .await?;
        Self::body(url, response).await
    }
}

/// Resolve a link against the server origin. Absolute links are kept as is.
pub fn resolve(base: &str, link: &str) -> Result<Url, FetchError> {
    let invalid = |source| FetchError::InvalidUrl {
        url: link.to_string(),
        source,
    };
    let base = Url::parse(base).map_err(invalid)?;
    base.join(link).map_err(invalid)
}
