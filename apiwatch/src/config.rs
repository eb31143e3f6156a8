//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to legacy variable names, and the settings used by the status check engine.

use std::time::Duration;

/// 1回のプローブのデフォルトタイムアウト（ミリ秒）
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 45_000;

/// 応答遅延をdegradedとみなす閾値（ミリ秒）
pub const DEFAULT_DEGRADED_THRESHOLD_MS: u64 = 6_000;

/// プロバイダーごとのワーカープールサイズ
pub const DEFAULT_POOL_SIZE: usize = 3;

/// アップタイム計算に使う履歴件数
pub const DEFAULT_UPTIME_WINDOW: u32 = 100;

/// Get an environment variable with fallback to a legacy name
///
/// If the new variable name is set, returns its value.
/// If only the legacy variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use apiwatch::config::get_env_with_fallback;
///
/// let secret = get_env_with_fallback("APIWATCH_CRON_SECRET", "CRON_SECRET");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if new_name == old_name {
        return None;
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get a single environment variable parsed to a specific type
///
/// Returns `default` if the variable is unset or parsing fails.
pub fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    get_non_empty_env(name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// 空文字列を未設定として扱う環境変数取得
pub fn get_non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// プローブ結果の分類閾値
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeThresholds {
    /// この値以上の応答時間はdegraded（ミリ秒）
    pub degraded_ms: u64,
    /// この値以上の応答時間はoutage（ミリ秒）
    pub outage_ms: u64,
}

impl Default for ProbeThresholds {
    fn default() -> Self {
        Self {
            degraded_ms: DEFAULT_DEGRADED_THRESHOLD_MS,
            outage_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}

/// ステータスチェックエンジンの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCheckConfig {
    /// 1回のプローブのハードタイムアウト
    pub probe_timeout: Duration,
    /// 分類閾値（outage閾値はタイムアウトと同じ）
    pub thresholds: ProbeThresholds,
    /// プロバイダーごとの同時プローブ数
    pub pool_size: usize,
    /// アップタイム計算に使う履歴件数
    pub uptime_window: u32,
    /// バックグラウンドチェック間隔（`None`で無効）
    pub check_interval: Option<Duration>,
}

impl Default for StatusCheckConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            thresholds: ProbeThresholds::default(),
            pool_size: DEFAULT_POOL_SIZE,
            uptime_window: DEFAULT_UPTIME_WINDOW,
            check_interval: None,
        }
    }
}

impl StatusCheckConfig {
    /// Load status check configuration from environment variables.
    pub fn from_env() -> Self {
        let timeout_secs =
            get_env_parse("APIWATCH_PROBE_TIMEOUT_SECS", DEFAULT_PROBE_TIMEOUT_MS / 1000).max(1);
        let degraded_ms =
            get_env_parse("APIWATCH_DEGRADED_THRESHOLD_MS", DEFAULT_DEGRADED_THRESHOLD_MS);
        let pool_size = get_env_parse("APIWATCH_POOL_SIZE", DEFAULT_POOL_SIZE).max(1);
        let uptime_window = get_env_parse("APIWATCH_UPTIME_WINDOW", DEFAULT_UPTIME_WINDOW).max(1);
        let interval_secs = get_env_parse("APIWATCH_CHECK_INTERVAL_SECS", 0u64);

        Self::default()
            .with_probe_timeout(Duration::from_secs(timeout_secs))
            .with_degraded_threshold_ms(degraded_ms)
            .with_pool_size(pool_size)
            .with_uptime_window(uptime_window)
            .with_check_interval((interval_secs > 0).then(|| Duration::from_secs(interval_secs)))
    }

    /// プローブタイムアウトを設定（outage閾値も追従する）
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self.thresholds.outage_ms = timeout.as_millis() as u64;
        self
    }

    /// degraded閾値を設定
    pub fn with_degraded_threshold_ms(mut self, degraded_ms: u64) -> Self {
        self.thresholds.degraded_ms = degraded_ms;
        self
    }

    /// ワーカープールサイズを設定（最小1）
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    /// アップタイム計算の履歴件数を設定
    pub fn with_uptime_window(mut self, window: u32) -> Self {
        self.uptime_window = window.max(1);
        self
    }

    /// バックグラウンドチェック間隔を設定
    pub fn with_check_interval(mut self, interval: Option<Duration>) -> Self {
        self.check_interval = interval;
        self
    }
}

/// cronルートの認証シークレットを取得
///
/// 環境変数 `APIWATCH_CRON_SECRET`（旧: `CRON_SECRET`）から取得する。
/// 未設定または空文字の場合は `None`（cronルートは常に401を返す）。
pub fn get_cron_secret() -> Option<String> {
    get_env_with_fallback("APIWATCH_CRON_SECRET", "CRON_SECRET").filter(|s| !s.trim().is_empty())
}

/// ステータスログDBのURLを取得
pub fn get_database_url() -> String {
    get_env_with_fallback_or(
        "APIWATCH_DATABASE_URL",
        "DATABASE_URL",
        "sqlite:data/apiwatch.db",
    )
}
