//! Review-service API client.
//!
//! Async HTTP client using `reqwest` with Bearer token authentication.
//! Every call carries a per-request timeout; failed calls surface the
//! method, URL, status code and a body snippet so logs are actionable.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::config::{ConfigError, ServiceConfig};
use crate::types::{Asset, AssetDetail, AssetKind, Comment, CreatedAsset, Project};

const DEFAULT_BASE_URL: &str = "https://api.frame.io/v2";

/// Per-call timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// How many characters of an error response body are kept.
const BODY_SNIPPET_LEN: usize = 200;

/// Errors from the review-service client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{method} {url} returned {status}: {body}")]
    Api {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid API token")]
    InvalidToken,
}

impl Error {
    /// HTTP status code, when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for the "unprocessable" condition (422) the version linker
    /// treats as recoverable.
    pub fn is_unprocessable(&self) -> bool {
        self.status() == Some(422)
    }

    /// True when a bounded retry may help: connection and timeout failures,
    /// throttling, and server-side errors. Other 4xx never qualify.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Network(e) => e.is_connect() || e.is_timeout(),
            Error::Api { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}

pub(crate) fn api_error(method: &'static str, url: String, status: u16, body: String) -> Error {
    let body: String = body.chars().take(BODY_SNIPPET_LEN).collect();
    error!(method, url = %url, status, body = %body, "service call failed");
    Error::Api {
        method,
        url,
        status,
        body,
    }
}

/// Review-service API client.
#[derive(Debug)]
pub struct Client {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    account_id: String,
    team_id: String,
}

impl Client {
    /// Creates a client from validated connection settings.
    ///
    /// Validation happens here, before any network call, so placeholder or
    /// missing credentials fail the whole run up front.
    pub fn new(config: &ServiceConfig) -> Result<Self, Error> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.token))
                .map_err(|_| Error::InvalidToken)?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            account_id: config.account_id.clone(),
            team_id: config.team_id.clone(),
        })
    }

    /// Points the client at a self-hosted or mock endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Performs an authenticated GET and decodes the JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.http.get(&url).query(params).send().await?;
        parse_response("GET", url, resp).await
    }

    /// Performs an authenticated POST with a JSON body.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, Error> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.http.post(&url).json(body).send().await?;
        parse_response("POST", url, resp).await
    }

    /// Performs an authenticated PUT with a JSON body.
    pub(crate) async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, Error> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.http.put(&url).json(body).send().await?;
        parse_response("PUT", url, resp).await
    }

    /// Lists the team's projects, excluding archived and deleted ones and
    /// any non-project records the listing carries.
    pub async fn list_projects(&self) -> Result<Vec<Project>, Error> {
        let path = format!("/teams/{}/projects", self.team_id);
        let records: Vec<Project> = self
            .get_json(&path, &[("filter[archived]", "none"), ("include_deleted", "false")])
            .await?;
        Ok(records
            .into_iter()
            .filter(|p| p.record_type == "project")
            .collect())
    }

    /// Creates a project and returns its record.
    pub async fn create_project(&self, name: &str) -> Result<Project, Error> {
        info!(name, "creating project");
        let path = format!("/teams/{}/projects", self.team_id);
        self.post_json(&path, &serde_json::json!({ "name": name, "private": false }))
            .await
    }

    /// Searches assets in a project by name fragment.
    pub async fn search_assets(
        &self,
        project_id: &str,
        query: &str,
        kind: Option<AssetKind>,
    ) -> Result<Vec<Asset>, Error> {
        let mut params = vec![
            ("account_id", self.account_id.as_str()),
            ("team_id", self.team_id.as_str()),
            ("project_id", project_id),
            ("q", query),
        ];
        if let Some(kind) = kind {
            params.push(("type", kind.as_query()));
        }
        self.get_json("/search/assets", &params).await
    }

    /// Fetches the full detail record for an asset.
    pub async fn asset_detail(&self, asset_id: &str) -> Result<AssetDetail, Error> {
        self.get_json(&format!("/assets/{asset_id}"), &[]).await
    }

    /// Creates a folder under the given parent asset and returns its id.
    pub async fn create_folder(&self, parent_id: &str, name: &str) -> Result<String, Error> {
        info!(name, parent = parent_id, "creating folder");
        let created: CreatedAsset = self
            .post_json(
                &format!("/assets/{parent_id}/children"),
                &serde_json::json!({ "name": name, "type": "folder" }),
            )
            .await?;
        Ok(created.id)
    }

    /// Links `next_asset_id` as the next version of `asset_id`.
    ///
    /// A 422 response surfaces as [`Error::Api`] with status 422; the caller
    /// decides whether that is recoverable.
    pub async fn link_version(&self, asset_id: &str, next_asset_id: &str) -> Result<(), Error> {
        let _: serde_json::Value = self
            .post_json(
                &format!("/assets/{asset_id}/version"),
                &serde_json::json!({ "next_asset_id": next_asset_id }),
            )
            .await?;
        debug!(asset = asset_id, next = next_asset_id, "version linked");
        Ok(())
    }

    /// Updates an asset's status label, the only field mutated locally.
    pub async fn update_label(&self, asset_id: &str, label: &str) -> Result<(), Error> {
        let _: serde_json::Value = self
            .put_json(
                &format!("/assets/{asset_id}"),
                &serde_json::json!({ "label": label }),
            )
            .await?;
        info!(asset = asset_id, label, "label updated");
        Ok(())
    }

    /// Fetches an asset's comments, optionally with replies.
    pub async fn list_comments(
        &self,
        asset_id: &str,
        include_replies: bool,
    ) -> Result<Vec<Comment>, Error> {
        let include = if include_replies { "replies,user" } else { "user" };
        self.get_json(
            &format!("/assets/{asset_id}/comments"),
            &[("include", include), ("page_size", "500")],
        )
        .await
    }
}

async fn parse_response<T: DeserializeOwned>(
    method: &'static str,
    url: String,
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(api_error(method, url, status.as_u16(), body));
    }
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectToken;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn test_config() -> ServiceConfig {
        ServiceConfig {
            token: "fio-u-testtoken".into(),
            account_id: "acct-1".into(),
            team_id: "team-1".into(),
            project_token: ProjectToken::Nickname,
        }
    }

    /// True once `req` holds a complete HTTP request (headers plus any
    /// Content-Length body).
    fn request_complete(req: &[u8]) -> bool {
        let Some(pos) = req.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&req[..pos]).to_lowercase();
        let body_len = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        req.len() >= pos + 4 + body_len
    }

    /// Starts a mock HTTP server that responds to one request with the
    /// given status and JSON body, returning the raw request bytes.
    async fn mock_server(status: u16, body: &str) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let mut request = Vec::new();
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 16384];
                while let Ok(n) = stream.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                    if request_complete(&request) {
                        break;
                    }
                }

                let resp = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
            request
        });

        (url, handle)
    }

    #[tokio::test]
    async fn list_projects_filters_records() {
        let json = r#"[
            {"_type":"project","id":"p1","root_asset_id":"r1","name":"JOB_A"},
            {"_type":"team","id":"t1","root_asset_id":"","name":"not a project"},
            {"_type":"project","id":"p2","root_asset_id":"r2","name":"JOB_B","is_archived":true}
        ]"#;
        let (url, handle) = mock_server(200, json).await;

        let client = Client::new(&test_config()).unwrap().with_base_url(url);
        let projects = client.list_projects().await.unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, "p1");
        assert!(projects[1].is_archived);

        let request = String::from_utf8(handle.await.unwrap()).unwrap();
        assert!(request.starts_with("GET /teams/team-1/projects?"));
        assert!(request.contains("authorization: Bearer fio-u-testtoken"));
    }

    #[tokio::test]
    async fn search_assets_sends_scope_params() {
        let json = r#"[{"id":"a1","name":"shotA_010","type":"file","parent_id":"f1"}]"#;
        let (url, handle) = mock_server(200, json).await;

        let client = Client::new(&test_config()).unwrap().with_base_url(url);
        let results = client
            .search_assets("p1", "shotA_010", Some(AssetKind::File))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].parent_id.as_deref(), Some("f1"));

        let request = String::from_utf8(handle.await.unwrap()).unwrap();
        assert!(request.starts_with("GET /search/assets?"));
        assert!(request.contains("account_id=acct-1"));
        assert!(request.contains("project_id=p1"));
        assert!(request.contains("q=shotA_010"));
        assert!(request.contains("type=file"));
    }

    #[tokio::test]
    async fn create_folder_returns_id() {
        let (url, handle) = mock_server(200, r#"{"id":"folder-9","type":"folder"}"#).await;

        let client = Client::new(&test_config()).unwrap().with_base_url(url);
        let id = client.create_folder("root-1", "CONFORMS").await.unwrap();

        assert_eq!(id, "folder-9");
        let request = String::from_utf8(handle.await.unwrap()).unwrap();
        assert!(request.starts_with("POST /assets/root-1/children "));
        assert!(request.contains(r#""type":"folder""#));
    }

    #[tokio::test]
    async fn link_version_posts_next_asset() {
        let (url, handle) = mock_server(200, r#"{"id":"vs1"}"#).await;

        let client = Client::new(&test_config()).unwrap().with_base_url(url);
        client.link_version("orig-1", "new-1").await.unwrap();

        let request = String::from_utf8(handle.await.unwrap()).unwrap();
        assert!(request.starts_with("POST /assets/orig-1/version "));
        assert!(request.contains(r#""next_asset_id":"new-1""#));
    }

    #[tokio::test]
    async fn link_version_422_is_unprocessable() {
        let (url, _handle) = mock_server(422, r#"{"message":"not stackable"}"#).await;

        let client = Client::new(&test_config()).unwrap().with_base_url(url);
        let err = client.link_version("orig-1", "new-1").await.unwrap_err();

        assert!(err.is_unprocessable());
        assert!(!err.is_transient());
        assert!(err.to_string().contains("422"));
    }

    #[tokio::test]
    async fn api_error_carries_method_url_and_snippet() {
        let (url, _handle) = mock_server(500, r#"{"message":"boom"}"#).await;

        let client = Client::new(&test_config()).unwrap().with_base_url(url.clone());
        let err = client.asset_detail("a1").await.unwrap_err();

        match &err {
            Error::Api {
                method,
                url: err_url,
                status,
                body,
            } => {
                assert_eq!(*method, "GET");
                assert!(err_url.starts_with(&url));
                assert_eq!(*status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn update_label_puts_label() {
        let (url, handle) = mock_server(200, r#"{"id":"a1","label":"approved"}"#).await;

        let client = Client::new(&test_config()).unwrap().with_base_url(url);
        client.update_label("a1", "approved").await.unwrap();

        let request = String::from_utf8(handle.await.unwrap()).unwrap();
        assert!(request.starts_with("PUT /assets/a1 "));
        assert!(request.contains(r#""label":"approved""#));
    }

    #[tokio::test]
    async fn list_comments_requests_replies() {
        let json = r#"[{"id":"c1","text":"note","timestamp":2.0}]"#;
        let (url, handle) = mock_server(200, json).await;

        let client = Client::new(&test_config()).unwrap().with_base_url(url);
        let comments = client.list_comments("a1", true).await.unwrap();

        assert_eq!(comments.len(), 1);
        let request = String::from_utf8(handle.await.unwrap()).unwrap();
        assert!(request.contains("include=replies%2Cuser") || request.contains("include=replies,user"));
        assert!(request.contains("page_size=500"));
    }

    #[test]
    fn new_rejects_placeholder_config() {
        let config = ServiceConfig {
            token: "fio-x-xxxxxxxxxxxx".into(),
            ..test_config()
        };
        let err = Client::new(&config).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::PlaceholderToken)));
    }

    #[test]
    fn transient_statuses() {
        for status in [429, 500, 502, 503] {
            assert!(api_error("GET", "u".into(), status, String::new()).is_transient());
        }
        for status in [400, 403, 404, 422] {
            assert!(!api_error("GET", "u".into(), status, String::new()).is_transient());
        }
    }

    #[test]
    fn body_snippet_is_truncated() {
        let long_body = "x".repeat(1000);
        match api_error("GET", "u".into(), 500, long_body) {
            Error::Api { body, .. } => assert_eq!(body.len(), BODY_SNIPPET_LEN),
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
