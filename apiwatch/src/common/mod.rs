//! 共通定義
//!
//! エラー型などクレート全体で共有する定義

/// エラー型定義
pub mod error;
