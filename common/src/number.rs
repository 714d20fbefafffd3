//! ブラジル形式の数値パーサー
//!
//! "1.234,56"（ピリオド=桁区切り、カンマ=小数点）と "1234.56" の両方を受け付ける。
//! 空・欠損は `None` を返し、0 とは区別する（行スキップ判定に使用）。

use crate::types::CellValue;
use regex::Regex;

/// セル値を数値に変換
///
/// # Returns
/// * `Some(f64)` - 変換成功
/// * `None` - 空セル、数値として解釈できない文字列、日付・真偽値
///
/// # Examples
/// ```
/// use report_helper_common::{parse_locale_number, CellValue};
///
/// assert_eq!(parse_locale_number(&CellValue::from("1.234,56")), Some(1234.56));
/// assert_eq!(parse_locale_number(&CellValue::from("45.97")), Some(45.97));
/// assert_eq!(parse_locale_number(&CellValue::Empty), None);
/// ```
pub fn parse_locale_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) if !n.is_nan() => Some(*n),
        CellValue::Text(s) => parse_locale_str(s),
        _ => None,
    }
}

/// 文字列版
pub fn parse_locale_str(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let normalized = if s.contains(',') {
        s.replace('.', "").replacen(',', ".", 1)
    } else {
        s.to_string()
    };

    parse_float_prefix(&normalized)
}

/// 先頭の数値部分だけを読み取る（"12.50 BRL" → 12.5）
fn parse_float_prefix(s: &str) -> Option<f64> {
    lazy_static::lazy_static! {
        static ref FLOAT_PREFIX: Regex =
            Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap();
    }

    let m = FLOAT_PREFIX.find(s)?;
    m.as_str().parse::<f64>().ok()
}

/// 小数点以下2桁に丸める（0.5は0から遠い方へ）
///
/// 集計合計と保存済み合計の重複キーで共通に使う
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
