//! スプレッドシート読み込み
//!
//! calamine で先頭シートだけを読み、列位置を保ったまま共通ライブラリの Sheet に変換する。
//! 集計は失敗しない: 壊れたファイルや空シートは空の集計結果になる。

use crate::error::{ReportError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::NaiveDate;
use report_helper_common::types::Column;
use report_helper_common::{aggregate, AggregateResult, CellValue, ClassificationContext, RawRow, Sheet};
use std::io::Cursor;
use std::path::Path;

/// ファイルを読み込む
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(ReportError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read(path)?)
}

/// バイト列から先頭シートを読む（xlsx / xls / ods）
pub fn read_first_sheet(bytes: &[u8]) -> Result<Sheet> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| ReportError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::Workbook("シートがありません".into()))?
        .map_err(|e| ReportError::Workbook(e.to_string()))?;

    sheet_from_range(&range)
}

/// セル範囲 → Sheet
///
/// 列は絶対位置で取り出す（範囲がA列以外から始まっていてもずれない）
pub fn sheet_from_range(range: &Range<Data>) -> Result<Sheet> {
    let (start, end) = match (range.start(), range.end()) {
        (Some(start), Some(end)) if !range.is_empty() => (start, end),
        _ => return Err(ReportError::EmptySheet("セル範囲が定義されていません".into())),
    };

    let width = (end.1 as usize + 1).max(Column::Model.index() + 1);

    let rows = (start.0..=end.0)
        .map(|r| {
            (0..width)
                .map(|c| {
                    range
                        .get_value((r, c as u32))
                        .map(cell_from_data)
                        .unwrap_or_default()
                })
                .collect::<RawRow>()
        })
        .collect();

    Ok(Sheet::new(rows))
}

/// calamine のセル値 → CellValue
pub fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => CellValue::Date(datetime.date()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

/// バイト列を読み込んで集計
///
/// 読み込みに失敗した場合は警告を出して空の結果を返す
pub fn scan_bytes(bytes: &[u8], ctx: &ClassificationContext) -> AggregateResult {
    match read_first_sheet(bytes) {
        Ok(sheet) => aggregate(&sheet, ctx),
        Err(e) => {
            log::warn!("スプレッドシートを読み込めません（空の結果を返します）: {}", e);
            AggregateResult::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_from_data() {
        assert_eq!(cell_from_data(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(cell_from_data(&Data::Float(45.97)), CellValue::Number(45.97));
        assert_eq!(
            cell_from_data(&Data::String("Postagem".into())),
            CellValue::Text("Postagem".into())
        );
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Empty);
        assert_eq!(
            cell_from_data(&Data::DateTimeIso("2025-11-01T10:00:00".into())),
            CellValue::Date(NaiveDate::from_ymd_opt(2025, 11, 1).unwrap())
        );
    }

    #[test]
    fn test_empty_range_is_error() {
        let range: Range<Data> = Range::empty();
        assert!(matches!(sheet_from_range(&range), Err(ReportError::EmptySheet(_))));
    }

    #[test]
    fn test_range_with_offset_keeps_columns() {
        // C2:D3 だけにデータがある
        let mut range: Range<Data> = Range::new((1, 2), (2, 3));
        range.set_value((1, 2), Data::String("Valor".into()));
        range.set_value((2, 2), Data::Float(100.2));
        range.set_value((2, 3), Data::Float(5.0));

        let sheet = sheet_from_range(&range).unwrap();
        assert_eq!(sheet.len(), 2);
        let row = &sheet.data_rows()[0];
        assert_eq!(row.get(Column::SaleValue), &CellValue::Number(100.2));
        assert_eq!(row.get(Column::Commission), &CellValue::Number(5.0));
        assert_eq!(row.get(Column::Model), &CellValue::Empty);
    }

    #[test]
    fn test_scan_garbage_bytes_is_empty() {
        let result = scan_bytes(b"not a spreadsheet", &ClassificationContext::GlobalFeed);
        assert_eq!(result, AggregateResult::default());
    }
}
