//! 共有カーソル方式のワーカープール
//!
//! 固定数のワーカーが1つのアトミックなカーソルから次の未着手インデックスを取り合う。
//! 静的な分割は行わないため、遅い項目を抱えたワーカーがいても
//! 空いたワーカーが残りを順に引き取る。

use crate::common::error::{StatusError, StatusResult};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::error;

/// `items`を最大`pool_size`並列で処理し、入力順の結果を返す
///
/// ワーカー数は`min(pool_size, items.len())`。ワーカーのタスクが異常終了した場合は
/// 残りのワーカーを中断して`StatusError::Sweep`を返す。
pub async fn sweep<T, R, F, Fut>(items: Vec<T>, pool_size: usize, f: F) -> StatusResult<Vec<R>>
where
    T: Send + Sync + 'static,
    R: Send + 'static,
    F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let total = items.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let items: Arc<Vec<Arc<T>>> = Arc::new(items.into_iter().map(Arc::new).collect());
    let cursor = Arc::new(AtomicUsize::new(0));
    let f = Arc::new(f);
    let workers = pool_size.max(1).min(total);

    let mut set = JoinSet::new();
    for _ in 0..workers {
        let items = Arc::clone(&items);
        let cursor = Arc::clone(&cursor);
        let f = Arc::clone(&f);
        set.spawn(async move {
            let mut done = Vec::new();
            loop {
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(item) = items.get(index) else {
                    break;
                };
                let result = f(Arc::clone(item)).await;
                done.push((index, result));
            }
            done
        });
    }

    let mut slots: Vec<Option<R>> = (0..total).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(done) => {
                for (index, result) in done {
                    slots[index] = Some(result);
                }
            }
            Err(e) => {
                error!("Task join error: {}", e);
                set.abort_all();
                return Err(StatusError::Sweep(e.to_string()));
            }
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| StatusError::Sweep(format!("item {index} was never processed")))
        })
        .collect()
}
