//! 行判定
//!
//! 販売額の端数（センタボ）をコードとして読み取り、選択中のコードと照合する。
//! 基準日以降の国際チャット販売は、照合前に販売額から 10% の上乗せを外す。

use crate::date::{is_post_cutoff, normalize_date};
use crate::number::parse_locale_number;
use crate::types::{ClassificationContext, Column, MatchedRow, RawRow};

/// 国際チャット販売の上乗せ率
const INTERNATIONAL_MARKUP: f64 = 1.10;

/// コード指定時の許容幅（±3）
const CODE_WINDOW: i64 = 3;

/// 0付近の帯（97〜99, 0〜3）
const NEAR_ZERO_LOW: u32 = 97;
const NEAR_ZERO_HIGH: u32 = 3;

/// フィードモードの90付近の帯
const FEED_BAND: (u32, u32) = (87, 93);

const POSTAGEM: &str = "Postagem";
const INTERNACIONAL: &str = "internacional";
const CHAT: &str = "chat";

/// 販売額の端数（0〜99）
///
/// 丸めで100になった場合は次の整数の0として扱う
pub fn bucket_of(value: f64) -> u32 {
    let cents = ((value - value.floor()) * 100.0).round() as i64;
    cents.rem_euclid(100) as u32
}

/// 判定前の行の評価値
#[derive(Debug, Clone, PartialEq)]
pub struct RowEvaluation {
    /// 販売額（国際調整後）
    pub sale_value: f64,
    pub commission: f64,
    pub bucket: u32,
    pub international: bool,
    /// チャネル列（前後の空白除去済み）
    pub channel: String,
}

/// 行の数値を読み取り、国際調整と端数計算を行う
///
/// 販売額かコミッションが有限の数値でなければ `None`（ヘッダー・空行・合計行、桁あふれ）
pub fn evaluate_row(row: &RawRow) -> Option<RowEvaluation> {
    let sale_value = parse_locale_number(row.get(Column::SaleValue)).filter(|v| v.is_finite())?;
    let commission = parse_locale_number(row.get(Column::Commission)).filter(|v| v.is_finite())?;

    let channel = row.get(Column::Channel).trimmed_text();
    let international = is_international(row, &channel);
    let sale_value = if international {
        sale_value / INTERNATIONAL_MARKUP
    } else {
        sale_value
    };

    Some(RowEvaluation {
        sale_value,
        commission,
        bucket: bucket_of(sale_value),
        international,
        channel,
    })
}

/// 1行を判定
///
/// # Returns
/// * `Some(MatchedRow)` - 一致
/// * `None` - 不一致、または販売額/コミッションが数値でない行
pub fn classify_row(row: &RawRow, ctx: &ClassificationContext) -> Option<MatchedRow> {
    let eval = evaluate_row(row)?;
    if !matches_policy(eval.bucket, &eval.channel, ctx) {
        return None;
    }

    Some(MatchedRow {
        model: row.get(Column::Model).display_text(),
        client: row.get(Column::Client).display_text(),
        sale_value: eval.sale_value,
        fraction: f64::from(eval.bucket) / 100.0,
        commission: eval.commission,
        international: eval.international,
    })
}

/// 国際チャット販売（基準日より後）か
fn is_international(row: &RawRow, channel: &str) -> bool {
    let category = row.get(Column::InternationalCategory).trimmed_text();
    category.eq_ignore_ascii_case(INTERNACIONAL)
        && channel.eq_ignore_ascii_case(CHAT)
        && is_post_cutoff(normalize_date(row.get(Column::Date)))
}

fn matches_policy(bucket: u32, channel: &str, ctx: &ClassificationContext) -> bool {
    match ctx {
        ClassificationContext::SelectedCode(code) if code.value() == 0 => {
            is_postagem(bucket, channel)
        }
        ClassificationContext::SelectedCode(code) => {
            let distance = i64::from(bucket) - i64::from(code.value());
            distance.abs() <= CODE_WINDOW
        }
        ClassificationContext::GlobalFeed => {
            is_postagem(bucket, channel) || (FEED_BAND.0..=FEED_BAND.1).contains(&bucket)
        }
    }
}

/// "Postagem"（大文字小文字区別あり）かつ0付近の端数
fn is_postagem(bucket: u32, channel: &str) -> bool {
    in_near_zero_band(bucket) && channel == POSTAGEM
}

fn in_near_zero_band(bucket: u32) -> bool {
    bucket >= NEAR_ZERO_LOW || bucket <= NEAR_ZERO_HIGH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellValue, SellerCode};

    /// テスト用の行を作る（日付, 販売額, コミッション, チャネル, 顧客, 国際, モデル）
    fn row(
        date: CellValue,
        sale: &str,
        commission: &str,
        channel: &str,
        client: &str,
        category: &str,
        model: &str,
    ) -> RawRow {
        RawRow::new(vec![
            date,
            CellValue::Empty,
            CellValue::from(sale),
            CellValue::from(commission),
            CellValue::from(channel),
            CellValue::Empty,
            CellValue::Empty,
            CellValue::from(client),
            CellValue::from(category),
            CellValue::from(model),
        ])
    }

    fn simple(sale: &str, channel: &str) -> RawRow {
        row(CellValue::Empty, sale, "10,00", channel, "Cliente", "", "Modelo A")
    }

    fn code(c: u32) -> ClassificationContext {
        ClassificationContext::SelectedCode(SellerCode::new(c).unwrap())
    }

    // =============================================
    // bucket_of テスト
    // =============================================

    #[test]
    fn test_bucket_of() {
        assert_eq!(bucket_of(45.97), 97);
        assert_eq!(bucket_of(100.20), 20);
        assert_eq!(bucket_of(12.03), 3);
        assert_eq!(bucket_of(5.0), 0);
        assert_eq!(bucket_of(45.999), 0);
        assert_eq!(bucket_of(110.0 / 1.10), 0);
    }

    // =============================================
    // コード指定モード
    // =============================================

    #[test]
    fn test_postagem_code_zero_matches_near_zero_band() {
        // 45.97 → 97、Postagem
        let r = row(CellValue::Empty, "45,97", "12,50", "Postagem", "Ana", "", "Luna");
        let m = classify_row(&r, &code(0)).expect("should match");
        assert_eq!(m.commission, 12.50);
        assert!((m.fraction - 0.97).abs() < 1e-9);
        assert_eq!(m.model, "Luna");
        assert_eq!(m.client, "Ana");
        assert!(!m.international);

        for sale in ["10.98", "10.99", "11.00", "11.01", "11.02", "11.03"] {
            assert!(classify_row(&simple(sale, "Postagem"), &code(0)).is_some(), "{}", sale);
        }
        for sale in ["10.96", "11.04"] {
            assert!(classify_row(&simple(sale, "Postagem"), &code(0)).is_none(), "{}", sale);
        }
    }

    #[test]
    fn test_postagem_is_case_sensitive() {
        assert!(classify_row(&simple("45.97", "postagem"), &code(0)).is_none());
        assert!(classify_row(&simple("45.97", "Chat"), &code(0)).is_none());
        assert!(classify_row(&simple("45.97", " Postagem "), &code(0)).is_some());
    }

    #[test]
    fn test_code_window() {
        // 100.20 → 20、[17, 23]
        assert!(classify_row(&simple("100.20", "Chat"), &code(20)).is_some());
        assert!(classify_row(&simple("100.17", "Chat"), &code(20)).is_some());
        assert!(classify_row(&simple("100.23", "Chat"), &code(20)).is_some());
        assert!(classify_row(&simple("100.16", "Chat"), &code(20)).is_none());
        assert!(classify_row(&simple("100.24", "Chat"), &code(20)).is_none());
    }

    #[test]
    fn test_code_window_ignores_channel() {
        assert!(classify_row(&simple("7,90", "Postagem"), &code(90)).is_some());
        assert!(classify_row(&simple("7,93", ""), &code(90)).is_some());
        assert!(classify_row(&simple("7,10", ""), &code(10)).is_some());
        assert!(classify_row(&simple("7,06", ""), &code(10)).is_none());
    }

    // =============================================
    // フィードモード
    // =============================================

    #[test]
    fn test_feed_band() {
        let feed = ClassificationContext::GlobalFeed;
        assert!(classify_row(&simple("190.90", "Chat"), &feed).is_some());
        assert!(classify_row(&simple("190.87", "Chat"), &feed).is_some());
        assert!(classify_row(&simple("190.93", "Chat"), &feed).is_some());
        assert!(classify_row(&simple("190.86", "Chat"), &feed).is_none());
        assert!(classify_row(&simple("190.20", "Chat"), &feed).is_none());
    }

    #[test]
    fn test_feed_postagem_band() {
        let feed = ClassificationContext::GlobalFeed;
        assert!(classify_row(&simple("45.97", "Postagem"), &feed).is_some());
        assert!(classify_row(&simple("45.02", "Postagem"), &feed).is_some());
        assert!(classify_row(&simple("45.97", "Chat"), &feed).is_none());
    }

    // =============================================
    // 国際調整
    // =============================================

    #[test]
    fn test_international_adjustment_after_cutoff() {
        // 110.00 / 1.10 = 100.00、コミッションはそのまま
        let r = row(
            CellValue::from("01/11/2025"),
            "110,00",
            "20,00",
            " chat ",
            "John",
            "Internacional",
            "Luna",
        );
        let eval = evaluate_row(&r).expect("numeric row");
        assert!(eval.international);
        assert!((eval.sale_value - 100.0).abs() < 1e-9);
        assert_eq!(eval.bucket, 0);
        assert_eq!(eval.commission, 20.0);

        // シリアル値の日付でも同じ
        let r = row(
            CellValue::Number(45962.0),
            "110,00",
            "20,00",
            "Chat",
            "John",
            "INTERNACIONAL",
            "Luna",
        );
        assert!(evaluate_row(&r).expect("numeric row").international);
    }

    #[test]
    fn test_international_needs_date() {
        let r = row(CellValue::Empty, "110,00", "20,00", "chat", "", "internacional", "");
        let eval = evaluate_row(&r).expect("numeric row");
        assert!(!eval.international);
        assert_eq!(eval.sale_value, 110.0);
    }

    #[test]
    fn test_international_value_is_divided() {
        // 109.89 / 1.1 = 99.9 → 端数90
        let r = row(
            CellValue::from("01/11/2025"),
            "109,89",
            "20,00",
            "chat",
            "John",
            "internacional",
            "Luna",
        );
        let m = classify_row(&r, &code(90)).expect("should match");
        assert!(m.international);
        assert!((m.sale_value - 99.9).abs() < 1e-9);
        assert!((m.fraction - 0.90).abs() < 1e-9);
        assert_eq!(m.commission, 20.0);
    }

    #[test]
    fn test_international_not_applied_on_cutoff_day() {
        let r = row(
            CellValue::from("15/10/2025"),
            "109,89",
            "20,00",
            "chat",
            "John",
            "internacional",
            "Luna",
        );
        // 調整なし → 端数89、コード90の窓内
        let m = classify_row(&r, &code(90)).expect("should match");
        assert!(!m.international);
        assert_eq!(m.sale_value, 109.89);
    }

    #[test]
    fn test_international_requires_chat_channel() {
        let r = row(
            CellValue::from("01/11/2025"),
            "109,89",
            "20,00",
            "Postagem",
            "John",
            "internacional",
            "Luna",
        );
        let m = classify_row(&r, &code(90)).expect("should match");
        assert!(!m.international);
    }

    // =============================================
    // スキップ
    // =============================================

    #[test]
    fn test_unparseable_rows_are_skipped() {
        let header = row(
            CellValue::from("Data"),
            "Valor da venda",
            "Comissão",
            "Categoria",
            "Cliente",
            "",
            "Modelo",
        );
        assert!(classify_row(&header, &code(0)).is_none());

        let missing_commission = row(CellValue::Empty, "100.20", "", "Chat", "", "", "");
        assert!(classify_row(&missing_commission, &code(20)).is_none());

        let blank = RawRow::default();
        assert!(classify_row(&blank, &ClassificationContext::GlobalFeed).is_none());
    }

    #[test]
    fn test_overflowing_values_are_skipped() {
        let sale = row(CellValue::Empty, "1e400", "5", "Postagem", "", "", "");
        assert!(evaluate_row(&sale).is_none());
        assert!(classify_row(&sale, &code(0)).is_none());
        assert!(classify_row(&sale, &ClassificationContext::GlobalFeed).is_none());

        let commission = row(CellValue::Empty, "45,97", "1e400", "Postagem", "", "", "");
        assert!(classify_row(&commission, &code(0)).is_none());

        let number = RawRow::new(vec![
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Number(f64::INFINITY),
            CellValue::Number(5.0),
        ]);
        assert!(evaluate_row(&number).is_none());
    }

    #[test]
    fn test_zero_commission_still_counts() {
        let r = row(CellValue::Empty, "100.20", "0", "Chat", "", "", "");
        let m = classify_row(&r, &code(20)).expect("should match");
        assert_eq!(m.commission, 0.0);
    }
}
