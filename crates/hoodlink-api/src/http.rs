//! HTTP adapter for the backend contract.
//!
//! One `reqwest::Client` (JSON headers, per-request timeout) is built by
//! [`ApiClientFactory`] and shared by every client it hands out. Failed
//! requests are turned into [`ApiError::Server`] carrying the backend's own
//! message whenever the body is a JSON error document.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use hoodlink_shared::{
    AppConfig, AppState, ClientProfileId, ClientProfileInfo, ClientProfileUpdateParams,
    ConnectParams, DeviceAppInfo, ErrorInfo, UserAccount, UserSettings,
};

use crate::contract::{AccountApi, AppApi};
use crate::error::{ApiError, Result};

const PATH_CONFIG: &str = "/api/app/config";
const PATH_STATE: &str = "/api/app/state";
const PATH_CONNECT: &str = "/api/app/connect";
const PATH_DISCONNECT: &str = "/api/app/disconnect";
const PATH_DIAGNOSE: &str = "/api/app/diagnose";
const PATH_USER_SETTINGS: &str = "/api/app/user-settings";
const PATH_VERSION_CHECK: &str = "/api/app/version-check";
const PATH_VERSION_CHECK_POSTPONE: &str = "/api/app/version-check-postpone";
const PATH_INSTALLED_APPS: &str = "/api/app/installed-apps";
const PATH_ACCESS_KEYS: &str = "/api/client-profiles/access-keys";
const PATH_CLIENT_PROFILES: &str = "/api/client-profiles";
const PATH_ACCOUNT: &str = "/api/account";
const PATH_SIGN_IN: &str = "/api/account/sign-in-with-google";
const PATH_SIGN_OUT: &str = "/api/account/sign-out";
const PATH_REFRESH: &str = "/api/account/refresh";

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Builds backend clients that share one connection pool.
#[derive(Clone)]
pub struct ApiClientFactory {
    endpoint: Endpoint,
}

impl ApiClientFactory {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            endpoint: Endpoint {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
            },
        })
    }

    pub fn base_url(&self) -> &str {
        &self.endpoint.base_url
    }

    pub fn create_app_client(&self) -> HttpAppClient {
        HttpAppClient {
            endpoint: self.endpoint.clone(),
        }
    }

    pub fn create_account_client(&self) -> HttpAccountClient {
        HttpAccountClient {
            endpoint: self.endpoint.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request plumbing
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct Endpoint {
    http: reqwest::Client,
    base_url: String,
}

impl Endpoint {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "Backend response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Server(error_from_body(status.as_u16(), &body)))
    }

    async fn read<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let bytes = self.send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.read(self.request(Method::GET, path)).await
    }

    async fn post(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::POST, path)).await?;
        Ok(())
    }

    async fn send_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<()> {
        self.send(self.request(method, path).json(body)).await?;
        Ok(())
    }
}

/// Turn a failed response body into backend error details. JSON error
/// documents keep their message; anything else is used as plain text.
fn error_from_body(status: u16, body: &str) -> ErrorInfo {
    match serde_json::from_str::<ErrorInfo>(body) {
        Ok(info) if info.status_code.is_some() => info,
        Ok(info) => info.with_status(status),
        Err(_) => {
            let text = body.trim();
            let message = if text.is_empty() {
                format!("Backend returned HTTP {status}")
            } else {
                text.to_string()
            };
            ErrorInfo::new(message).with_status(status)
        }
    }
}

// ---------------------------------------------------------------------------
// App client
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct HttpAppClient {
    endpoint: Endpoint,
}

#[async_trait]
impl AppApi for HttpAppClient {
    async fn get_config(&self) -> Result<AppConfig> {
        self.endpoint.get(PATH_CONFIG).await
    }

    async fn get_state(&self) -> Result<AppState> {
        self.endpoint.get(PATH_STATE).await
    }

    async fn connect(&self, params: &ConnectParams) -> Result<()> {
        self.endpoint
            .send_body(Method::POST, PATH_CONNECT, params)
            .await
    }

    async fn disconnect(&self) -> Result<()> {
        self.endpoint.post(PATH_DISCONNECT).await
    }

    async fn set_user_settings(&self, settings: &UserSettings) -> Result<()> {
        self.endpoint
            .send_body(Method::PUT, PATH_USER_SETTINGS, settings)
            .await
    }

    async fn add_access_key(&self, access_key: &str) -> Result<ClientProfileInfo> {
        let body = serde_json::json!({ "accessKey": access_key });
        self.endpoint
            .read(self.endpoint.request(Method::POST, PATH_ACCESS_KEYS).json(&body))
            .await
    }

    async fn delete_client_profile(&self, client_profile_id: ClientProfileId) -> Result<()> {
        let path = format!("{PATH_CLIENT_PROFILES}/{client_profile_id}");
        self.endpoint
            .send(self.endpoint.request(Method::DELETE, &path))
            .await?;
        Ok(())
    }

    async fn update_client_profile(
        &self,
        client_profile_id: ClientProfileId,
        params: &ClientProfileUpdateParams,
    ) -> Result<()> {
        let path = format!("{PATH_CLIENT_PROFILES}/{client_profile_id}");
        self.endpoint.send_body(Method::PATCH, &path, params).await
    }

    async fn diagnose(&self, client_profile_id: ClientProfileId) -> Result<()> {
        let body = serde_json::json!({ "clientProfileId": client_profile_id });
        self.endpoint
            .send_body(Method::POST, PATH_DIAGNOSE, &body)
            .await
    }

    async fn version_check(&self) -> Result<()> {
        self.endpoint.post(PATH_VERSION_CHECK).await
    }

    async fn version_check_postpone(&self) -> Result<()> {
        self.endpoint.post(PATH_VERSION_CHECK_POSTPONE).await
    }

    async fn installed_apps(&self) -> Result<Vec<DeviceAppInfo>> {
        self.endpoint.get(PATH_INSTALLED_APPS).await
    }
}

// ---------------------------------------------------------------------------
// Account client
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct HttpAccountClient {
    endpoint: Endpoint,
}

#[async_trait]
impl AccountApi for HttpAccountClient {
    async fn sign_in(&self) -> Result<()> {
        self.endpoint.post(PATH_SIGN_IN).await
    }

    async fn sign_out(&self) -> Result<()> {
        self.endpoint.post(PATH_SIGN_OUT).await
    }

    async fn refresh(&self) -> Result<()> {
        self.endpoint.post(PATH_REFRESH).await
    }

    async fn get(&self) -> Result<UserAccount> {
        self.endpoint.get(PATH_ACCOUNT).await
    }

    async fn get_access_keys(&self, subscription_id: &str) -> Result<Vec<String>> {
        let path = format!("{PATH_ACCOUNT}/subscriptions/{subscription_id}/access-keys");
        self.endpoint.get(&path).await
    }
}
