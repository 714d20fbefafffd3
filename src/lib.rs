//! Report Helper
//!
//! 売上スプレッドシートを読み込み、販売者コードで一致した行のコミッションを集計するCLI。
//! 判定・集計・保存済み合計のロジックは report-helper-common にある。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod report;
pub mod store;
pub mod workbook;
