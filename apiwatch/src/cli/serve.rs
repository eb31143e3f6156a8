//! serve サブコマンド
//!
//! HTTPサーバーを起動します。

use crate::config::{get_env_parse, get_non_empty_env};
use clap::Args;

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long, default_value = "8080", env = "APIWATCH_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "APIWATCH_HOST")]
    pub host: String,
}

impl ServeArgs {
    /// サブコマンド省略時の引数（環境変数と既定値から作る）
    pub fn from_env() -> Self {
        Self {
            host: get_non_empty_env("APIWATCH_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get_env_parse("APIWATCH_PORT", 8080),
        }
    }

    /// バインドアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
