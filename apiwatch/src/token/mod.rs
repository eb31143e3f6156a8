//! アクセストークン取得
//!
//! プローブ要求に付与するBearerトークンの供給元。
//! ヘルスチェック側は`TokenProvider`トレイトのみに依存し、取得方式は問わない。
//!
//! 既定実装はOAuth2 client credentialsフローで、取得したトークンを
//! 有効期限の60秒前までキャッシュする。

use crate::common::error::{StatusError, StatusResult};
use crate::config::get_non_empty_env;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// 有効期限のこの時間前からトークンを更新する
const TOKEN_REFRESH_BUFFER_SECS: i64 = 60;

/// Bearerトークンの供給元
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// 有効なアクセストークンを取得
    async fn access_token(&self) -> StatusResult<String>;
}

/// 固定トークンを返すプロバイダー
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// 固定トークンで作成
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> StatusResult<String> {
        Ok(self.token.clone())
    }
}

/// OAuth2 client credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    /// クライアントID
    pub client_id: String,
    /// クライアントシークレット
    pub client_secret: String,
    /// トークンエンドポイントURL
    pub token_url: String,
    /// テナントID
    pub tenant_id: String,
    /// スコープ（スペース区切り）
    pub scopes: String,
}

impl ClientCredentials {
    /// 環境変数から読み込む
    ///
    /// `VISMA_CLIENT_ID` / `VISMA_CLIENT_SECRET` / `VISMA_TOKEN_URL` / `VISMA_TENANT_ID`
    /// のいずれかが欠けていれば`None`。`VISMA_SCOPES`の既定値は`api`。
    pub fn from_env() -> Option<Self> {
        Some(Self {
            client_id: get_non_empty_env("VISMA_CLIENT_ID")?,
            client_secret: get_non_empty_env("VISMA_CLIENT_SECRET")?,
            token_url: get_non_empty_env("VISMA_TOKEN_URL")?,
            tenant_id: get_non_empty_env("VISMA_TENANT_ID")?,
            scopes: get_non_empty_env("VISMA_SCOPES").unwrap_or_else(|| "api".to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now + Duration::seconds(TOKEN_REFRESH_BUFFER_SECS)
    }
}

/// OAuth2 client credentialsフローのトークンプロバイダー
///
/// キャッシュのロックを更新要求の間も保持するため、同時に呼ばれても
/// トークンエンドポイントへの要求は1回にまとまる。
pub struct ClientCredentialsTokenProvider {
    client: Client,
    credentials: Option<ClientCredentials>,
    cache: Mutex<Option<CachedToken>>,
}

impl ClientCredentialsTokenProvider {
    /// 認証情報を指定して作成（`None`の場合は取得時にエラー）
    pub fn new(client: Client, credentials: Option<ClientCredentials>) -> Self {
        Self {
            client,
            credentials,
            cache: Mutex::new(None),
        }
    }

    /// 環境変数の認証情報で作成
    pub fn from_env(client: Client) -> Self {
        let credentials = ClientCredentials::from_env();
        if credentials.is_none() {
            warn!("OAuth2 client credentials are not configured; every provider check will report an outage");
        }
        Self::new(client, credentials)
    }

    /// キャッシュ済みトークンを破棄
    pub async fn clear(&self) {
        *self.cache.lock().await = None;
        info!("Token cache cleared");
    }

    /// キャッシュ済みトークンの有効期限（監視用）
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.cache.lock().await.as_ref().map(|t| t.expires_at)
    }

    async fn request_token(&self, credentials: &ClientCredentials) -> StatusResult<CachedToken> {
        debug!(token_url = %credentials.token_url, tenant_id = %credentials.tenant_id, "Requesting access token");

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("scope", credentials.scopes.as_str()),
            ("tenant_id", credentials.tenant_id.as_str()),
        ];

        let response = self
            .client
            .post(&credentials.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| StatusError::Token(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StatusError::Token(format!(
                "auth failed: {} - {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| StatusError::Token(format!("invalid token response: {e}")))?;

        info!(expires_in = token.expires_in, "Access token obtained");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        })
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsTokenProvider {
    async fn access_token(&self) -> StatusResult<String> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.is_fresh(Utc::now()) {
                return Ok(cached.access_token.clone());
            }
        }

        let credentials = self.credentials.as_ref().ok_or_else(|| {
            StatusError::Token(
                "Missing OAuth2 credentials. Set VISMA_CLIENT_ID, VISMA_CLIENT_SECRET, VISMA_TOKEN_URL and VISMA_TENANT_ID".to_string(),
            )
        })?;

        let fresh = self.request_token(credentials).await?;
        let token = fresh.access_token.clone();
        *cache = Some(fresh);
        Ok(token)
    }
}

/// 環境変数からトークンプロバイダーを構築
///
/// `VISMA_ACCESS_TOKEN`が設定されていれば固定トークン、
/// そうでなければclient credentialsフローを使う。
pub fn token_provider_from_env(client: Client) -> Arc<dyn TokenProvider> {
    match get_non_empty_env("VISMA_ACCESS_TOKEN") {
        Some(token) => {
            info!("Using static access token from VISMA_ACCESS_TOKEN");
            Arc::new(StaticTokenProvider::new(token))
        }
        None => Arc::new(ClientCredentialsTokenProvider::from_env(client)),
    }
}
