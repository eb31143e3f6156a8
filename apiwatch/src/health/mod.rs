//! ステータスチェックエンジン
//!
//! プローブ → プロバイダー集計 → 全体スナップショット → 実行中共有ゲート の順に組み立てる。

pub mod aggregator;
pub mod gate;
pub mod orchestrator;
pub mod pool;
pub mod prober;
pub mod scheduler;

pub use aggregator::ProviderHealthAggregator;
pub use gate::StatusGate;
pub use orchestrator::{SnapshotSource, StatusOrchestrator};
pub use prober::EndpointProber;
pub use scheduler::StatusScheduler;
