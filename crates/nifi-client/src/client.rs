//! Core HTTP plumbing: authentication, low-level verbs, and the
//! idempotent-delete helper shared by every entity-kind module.

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::config::NiFiServerConfig;
use crate::error::NiFiClientError;

/// Single typed surface over one NiFi instance's REST API (spec §4.A).
/// Request-scoped: created at HTTP request entry bound to one configured
/// server, never shared across concurrent requests (spec §5).
pub struct NiFiClient {
    http: reqwest::Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    token: RwLock<Option<String>>,
    /// Generated once per client instance, echoed in every revision payload.
    pub client_id: String,
}

impl NiFiClient {
    pub fn new(config: &NiFiServerConfig) -> Result<Self, NiFiClientError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            token: RwLock::new(None),
            client_id: uuid::Uuid::new_v4().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/nifi-api{}", self.base_url, path)
    }

    /// Obtains a bearer token on first use, caching it for later requests.
    /// Implements the plaintext-HTTPS development-mode fallback described
    /// in spec §4.A.
    async fn ensure_token(&self) -> Result<Option<String>, NiFiClientError> {
        {
            let cached = self.token.read().await;
            if cached.is_some() {
                return Ok(cached.clone());
            }
        }

        let (Some(username), Some(password)) = (self.username.as_ref(), self.password.as_ref())
        else {
            return Ok(None);
        };

        let response = self
            .http
            .post(self.url("/access/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            let body = response.text().await.unwrap_or_default();
            if body.contains("Access tokens are only issued over HTTPS") {
                log::warn!(
                    target: "nifi_client::auth",
                    "NiFi server is plaintext HTTP; continuing unauthenticated (development mode)"
                );
                return Ok(None);
            }
            return Err(NiFiClientError::AuthError(body));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NiFiClientError::AuthError(format!(
                "token request failed with {status}: {body}"
            )));
        }

        let token = response.text().await?;
        *self.token.write().await = Some(token.clone());
        Ok(Some(token))
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, NiFiClientError> {
        let raw = self.send_raw(method, path, body).await?;
        if raw.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&raw)?)
    }

    async fn send_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<String, NiFiClientError> {
        let token = self.ensure_token().await?;

        let mut request = self.http.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.text().await?);
        }

        let text = response.text().await.unwrap_or_default();
        Err(self.map_error_status(status, &text))
    }

    fn map_error_status(&self, status: StatusCode, body: &str) -> NiFiClientError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                NiFiClientError::AuthError(body.to_string())
            }
            StatusCode::NOT_FOUND => NiFiClientError::NotFound(body.to_string()),
            StatusCode::CONFLICT => NiFiClientError::ConflictError {
                message: body.to_string(),
                stale_version: None,
            },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                NiFiClientError::BadRequest(body.to_string())
            }
            other => NiFiClientError::ServerError {
                status: other.as_u16(),
                body: body.to_string(),
            },
        }
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Value, NiFiClientError> {
        self.send(Method::GET, path, None).await
    }

    pub(crate) async fn get_raw(&self, path: &str) -> Result<String, NiFiClientError> {
        self.send_raw(Method::GET, path, None).await
    }

    pub(crate) async fn post(&self, path: &str, body: &Value) -> Result<Value, NiFiClientError> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn put(&self, path: &str, body: &Value) -> Result<Value, NiFiClientError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    /// Deletes `path`. Per the Open Question decision in DESIGN.md, a
    /// `404` is treated as success universally ("already gone") rather
    /// than surfaced as `NotFound` — this is the idempotent-delete
    /// property spec §8 requires.
    pub(crate) async fn delete_idempotent(&self, path: &str) -> Result<(), NiFiClientError> {
        match self.send(Method::DELETE, path, None).await {
            Ok(_) => Ok(()),
            Err(NiFiClientError::NotFound(_)) => Ok(()),
            Err(other) => Err(other),
        }
    }

    pub(crate) async fn delete_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(), NiFiClientError> {
        let qs = query
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let full = if qs.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{qs}")
        };
        self.delete_idempotent(&full).await
    }
}

fn urlencode(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~') {
                c.to_string()
            } else {
                format!("%{:02X}", c as u32)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> NiFiServerConfig {
        NiFiServerConfig {
            id: "test".into(),
            display_name: "test".into(),
            base_url,
            username: Some("admin".into()),
            password: Some("password".into()),
            verify_tls: true,
            timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn auth_falls_back_to_unauthenticated_over_plaintext_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/nifi-api/access/token"))
            .respond_with(
                ResponseTemplate::new(409).set_body_string("Access tokens are only issued over HTTPS"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/nifi-api/processors/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "p1",
                "revision": { "version": 0 },
                "component": { "name": "GenerateFlowFile" },
            })))
            .mount(&server)
            .await;

        let client = NiFiClient::new(&config(server.uri())).unwrap();
        let entity = client.get_processor("p1").await.unwrap();
        assert_eq!(entity.id, "p1");
    }

    #[tokio::test]
    async fn delete_of_missing_entity_is_treated_as_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/nifi-api/access/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("test-token"))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/nifi-api/processors/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = NiFiClient::new(&config(server.uri())).unwrap();
        let revision = mw_tool_contracts::Revision { client_id: None, version: 1 };
        let result = client.delete_processor("gone", &revision).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn conflict_on_mutation_is_surfaced_as_conflict_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/nifi-api/access/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("test-token"))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/nifi-api/processors/p1"))
            .respond_with(ResponseTemplate::new(409).set_body_string("stale revision"))
            .mount(&server)
            .await;

        let client = NiFiClient::new(&config(server.uri())).unwrap();
        let revision = mw_tool_contracts::Revision { client_id: None, version: 1 };
        let result = client
            .update_processor_properties("p1", revision, serde_json::json!({}))
            .await;
        assert!(matches!(result, Err(NiFiClientError::ConflictError { .. })));
    }
}
