//! 販売日の正規化
//!
//! セルの日付表現（日付型・シリアル値・"日/月/年" 文字列）を暦日に揃える。

use crate::types::CellValue;
use chrono::{Duration, NaiveDate};

/// 国際チャット販売の調整が始まる基準日（この日より後が対象）
pub const CUTOFF_DATE: (i32, u32, u32) = (2025, 10, 15);

/// シリアル値として受け付ける範囲（それ以外は日付なし扱い）
const MAX_SERIAL_DAYS: f64 = 2_958_465.0;

/// セル値を暦日に変換
///
/// - 日付型: そのまま
/// - 数値: スプレッドシートのシリアル値（1900年1月0日起点、1900年うるう年の不具合込み）
/// - "D/M/Y" 文字列: 日・月・年
/// - その他: `None`
pub fn normalize_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Date(d) => Some(*d),
        CellValue::Number(n) => from_serial(*n),
        CellValue::Text(s) => parse_day_month_year(s),
        _ => None,
    }
}

/// シリアル値 → 暦日
///
/// 1900-01-01 を起点に (N - 2) 日進める。実質 1899-12-30 + N 日で、
/// 1900年2月29日を数える表計算ソフトの慣習をそのまま引き継ぐ。
fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial.abs() > MAX_SERIAL_DAYS {
        return None;
    }
    let days = serial.trunc() as i64;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(days))
}

/// "日/月/年" 形式（区切りがちょうど3つの場合のみ）
fn parse_day_month_year(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.trim().split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].trim().parse().ok()?;
    let month: u32 = parts[1].trim().parse().ok()?;
    let year: i32 = parts[2].trim().parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// 基準日
pub fn cutoff_date() -> Option<NaiveDate> {
    let (y, m, d) = CUTOFF_DATE;
    NaiveDate::from_ymd_opt(y, m, d)
}

/// 基準日より後か（日付なしは false）
pub fn is_post_cutoff(date: Option<NaiveDate>) -> bool {
    match (date, cutoff_date()) {
        (Some(date), Some(cutoff)) => date > cutoff,
        _ => false,
    }
}
