//! Report Helper Common Library
//!
//! 売上スプレッドシートの行判定・集計・保存済み合計（台帳）を扱うエンジン。
//! CLIから利用される。ファイル入出力やスプレッドシート形式には依存しない。

pub mod types;
pub mod number;
pub mod date;
pub mod classifier;
pub mod aggregator;
pub mod ledger;
pub mod error;

pub use types::{
    AggregateResult, CellValue, ClassificationContext, MatchedRow, RawRow, SellerCode, Sheet,
};
pub use number::{parse_locale_number, round2};
pub use date::{is_post_cutoff, normalize_date, CUTOFF_DATE};
pub use classifier::{bucket_of, classify_row, evaluate_row, RowEvaluation};
pub use aggregator::{aggregate, dominant_model};
pub use ledger::{ClearConfirmation, CommissionRate, Ledger, LedgerStore, PersistentLedger, SavedEntry};
pub use error::{Error, Result};
