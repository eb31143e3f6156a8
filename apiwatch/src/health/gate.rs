//! 実行中チェックの共有と前回成功結果へのフォールバック
//!
//! 同時に到着した呼び出しは実行中の1回のチェックを待ち、同じスナップショットを受け取る。
//! チェックが失敗した場合は前回成功したスナップショットを`cached: true`付きで返す。
//!
//! 実行中マーカーと前回成功結果は`GateState`のみが保持し、
//! 書き込みはチェックの開始時と終了時の2箇所に限られる。

use super::orchestrator::SnapshotSource;
use crate::common::error::{StatusError, StatusResult};
use crate::types::status::StatusResponse;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

type SharedRun = Shared<BoxFuture<'static, StatusResult<Arc<StatusResponse>>>>;

#[derive(Default)]
struct GateState {
    in_flight: Option<(u64, SharedRun)>,
    last_good: Option<Arc<StatusResponse>>,
    next_run_id: u64,
}

fn lock_state(state: &Mutex<GateState>) -> MutexGuard<'_, GateState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// チェック終了時に実行中マーカーを外す（パニック時も含む）
struct SettleGuard {
    state: Arc<Mutex<GateState>>,
    run_id: u64,
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        let mut state = lock_state(&self.state);
        if matches!(state.in_flight, Some((id, _)) if id == self.run_id) {
            state.in_flight = None;
        }
    }
}

/// ステータスチェックのゲート
#[derive(Clone)]
pub struct StatusGate {
    source: Arc<dyn SnapshotSource>,
    state: Arc<Mutex<GateState>>,
}

impl StatusGate {
    /// スナップショット生成元を指定して作成
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(GateState::default())),
        }
    }

    /// 現在のシステムステータスを取得
    ///
    /// 実行中のチェックがあればその結果を待つ。無ければ新たに開始する。
    /// チェックが失敗し、前回成功結果も無い場合のみエラーを返す。
    pub async fn get_status(&self) -> StatusResult<Arc<StatusResponse>> {
        let run = self.join_or_start();

        match run.await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                let last_good = lock_state(&self.state).last_good.clone();
                match last_good {
                    Some(snapshot) => {
                        warn!(
                            error = %e,
                            last_updated = %snapshot.last_updated,
                            "Status check failed; serving last known good snapshot"
                        );
                        Ok(Arc::new(snapshot.as_cached()))
                    }
                    None => Err(e),
                }
            }
        }
    }

    /// 前回成功したスナップショット
    pub fn last_good(&self) -> Option<Arc<StatusResponse>> {
        lock_state(&self.state).last_good.clone()
    }

    /// チェックが実行中かどうか
    pub fn is_running(&self) -> bool {
        lock_state(&self.state).in_flight.is_some()
    }

    fn join_or_start(&self) -> SharedRun {
        let mut state = lock_state(&self.state);
        if let Some((run_id, run)) = &state.in_flight {
            debug!(run_id, "Joining in-flight status check");
            return run.clone();
        }

        state.next_run_id += 1;
        let run_id = state.next_run_id;
        debug!(run_id, "Starting status check");

        let source = Arc::clone(&self.source);
        let guard = SettleGuard {
            state: Arc::clone(&self.state),
            run_id,
        };
        let handle = tokio::spawn(async move {
            let result = source.run_check().await.map(Arc::new);
            if let Ok(snapshot) = &result {
                lock_state(&guard.state).last_good = Some(Arc::clone(snapshot));
            }
            drop(guard);
            result
        });

        let run = async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(StatusError::Internal(format!(
                    "status check task failed: {e}"
                ))),
            }
        }
        .boxed()
        .shared();

        state.in_flight = Some((run_id, run.clone()));
        run
    }
}
