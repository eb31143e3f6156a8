//! API status monitor
//!
//! 複数プロバイダーのHTTP APIを並列にヘルスチェックし、
//! システム全体のステータスを提供するサーバー

#![warn(missing_docs)]

/// 共通エラー型
pub mod common;

/// REST APIハンドラー
pub mod api;

/// サーバー初期化
pub mod bootstrap;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// データベースアクセス
pub mod db;

/// ステータスチェックエンジン
pub mod health;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 監視対象プロバイダーの登録管理
pub mod registry;

/// axumサーバー
pub mod server;

/// Shutdown controller
pub mod shutdown;

/// アクセストークン取得
pub mod token;

/// 型定義
pub mod types;

use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// 実行中チェックの共有と前回成功結果のキャッシュ
    pub gate: health::StatusGate,
    /// 監視対象レジストリ
    pub registry: registry::ProviderRegistry,
    /// ステータスログ
    pub status_log: Arc<dyn db::StatusLogStore>,
    /// cronルートの認証シークレット（未設定なら常に401）
    pub cron_secret: Option<String>,
    /// Cooperative shutdown controller
    pub shutdown: shutdown::ShutdownController,
}
