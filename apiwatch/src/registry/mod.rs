//! 監視対象プロバイダーの登録管理
//!
//! プロバイダー/エンドポイント一覧は静的設定で、起動時に不変のレジストリへ読み込む

pub mod providers;

pub use providers::{Provider, ProviderEndpoint, ProviderRegistry};
