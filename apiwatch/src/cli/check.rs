//! check サブコマンド
//!
//! ステータスチェックを1回実行し、スナップショットをJSONで標準出力に書き出します。

use crate::bootstrap;
use crate::common::error::{CommonError, StatusResult};
use clap::Args;

/// check サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

/// 1回分のチェックを実行して結果を出力する
///
/// チェック自体が失敗した場合はエラーを返す（終了コード1）。
pub async fn execute(args: &CheckArgs) -> StatusResult<()> {
    let ctx = bootstrap::initialize().await?;
    let snapshot = ctx.orchestrator.run().await?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&snapshot)
    } else {
        serde_json::to_string(&snapshot)
    }
    .map_err(CommonError::from)?;

    println!("{output}");
    Ok(())
}
