//! データベースアクセス層
//!
//! SQLiteベースのステータスログ永続化

/// データベースマイグレーション
pub mod migrations;

/// ステータスログ
pub mod status_log;

/// Repository traitパターン（テスタビリティ向上）
pub mod traits;

pub use traits::StatusLogStore;
