use clap::{Parser, Subcommand};
use report_helper_common::{ClassificationContext, SellerCode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "report-helper")]
#[command(about = "売上スプレッドシートのコミッション照合・集計ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 判定モードの指定（コード / フィード）
#[derive(clap::Args, Clone, Debug, Default)]
pub struct ModeArgs {
    /// 販売者コード (0/10/20/.../90、省略時は設定値)
    #[arg(short, long)]
    pub code: Option<SellerCode>,

    /// グローバル/フィードモード（コード指定より優先）
    #[arg(long)]
    pub feed: bool,
}

impl ModeArgs {
    /// 判定モードを決める（コード省略時は `default_code`）
    pub fn context(&self, default_code: SellerCode) -> ClassificationContext {
        ClassificationContext::from_selection(self.code.unwrap_or(default_code), self.feed)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// スプレッドシートを集計して表示
    Scan {
        /// 入力ファイル (.xlsx/.xls/.ods)
        #[arg(required = true)]
        file: PathBuf,

        #[command(flatten)]
        mode: ModeArgs,

        /// 集計合計を保存済み合計に追加
        #[arg(long)]
        save: bool,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,

        /// 一致行の表を表示しない
        #[arg(long)]
        no_rows: bool,
    },

    /// 一致行をExcelに出力
    Export {
        /// 入力ファイル
        #[arg(required = true)]
        file: PathBuf,

        #[command(flatten)]
        mode: ModeArgs,

        /// 出力ファイル（デフォルト: resumo.xlsx）
        #[arg(short, long, default_value = "resumo.xlsx")]
        output: PathBuf,
    },

    /// 保存済み合計を表示/削除
    Ledger {
        /// 見込みコミッションをフィードモードの料率で計算
        #[arg(long)]
        feed: bool,

        /// 保存済み合計を全件削除
        #[arg(long)]
        clear: bool,

        /// 削除の確認を省略
        #[arg(short, long)]
        yes: bool,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// デフォルトの販売者コードを設定
        #[arg(long)]
        set_default_code: Option<SellerCode>,

        /// 保存済み合計ファイルの場所を設定
        #[arg(long)]
        set_ledger_path: Option<PathBuf>,
    },
}
