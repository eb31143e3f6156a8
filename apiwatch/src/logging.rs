//! ロギング初期化ユーティリティ
//!
//! 標準エラー出力へのログ（`check`の標準出力はJSON専用）に加え、`APIWATCH_LOG_DIR`が設定されていれば
//! 日次ローテーションのJSONファイルにも出力する。

use crate::config::{get_env_with_fallback_or, get_non_empty_env};
use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// ファイル出力のワーカーを生存させるためのガード
static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// ログファイル名の接頭辞
const LOG_FILE_PREFIX: &str = "apiwatch.log";

/// 標準出力のログ形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人が読む形式
    Text,
    /// 1行1JSON
    Json,
}

impl LogFormat {
    /// 文字列から解釈（未知の値はText）
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }

    fn from_env() -> Self {
        get_non_empty_env("APIWATCH_LOG_FORMAT")
            .map(|v| Self::parse(&v))
            .unwrap_or(Self::Text)
    }
}

/// ログレベル指定を取得（既定`info`）
pub fn log_level_from_env() -> String {
    get_env_with_fallback_or("APIWATCH_LOG_LEVEL", "LOG_LEVEL", "info")
}

/// グローバルなtracing subscriberを初期化する
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_new(log_level_from_env())
        .or_else(|_| EnvFilter::try_new("info"))?;

    let mut layers: Vec<Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>> = Vec::new();

    let stdout = match LogFormat::from_env() {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Text => fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };
    layers.push(stdout);

    if let Some(dir) = get_non_empty_env("APIWATCH_LOG_DIR") {
        let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    Ok(())
}
