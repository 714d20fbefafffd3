//! 一致行のExcel出力
//!
//! 画面の「Resumo do relatório」と同じ列構成で、合計行を付けて書き出す

use crate::error::{ReportError, Result};
use report_helper_common::{AggregateResult, ClassificationContext};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::Path;

const SHEET_NAME: &str = "Resumo";

const HEADERS: [&str; 6] = [
    "Nome da Modelo",
    "Nome do Cliente",
    "Valor da venda",
    "Código",
    "Comissão",
    "Internacional",
];

fn export_err(e: XlsxError) -> ReportError {
    ReportError::Export(e.to_string())
}

/// 集計結果をxlsxに書き出す
pub fn export_matches(
    result: &AggregateResult,
    ctx: &ClassificationContext,
    output_path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format("#,##0.00");
    let code = Format::new().set_num_format("0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(export_err)?;

    for (col, title) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *title, &header)
            .map_err(export_err)?;
    }

    for (i, m) in result.matches.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, &m.model).map_err(export_err)?;
        worksheet.write_string(row, 1, &m.client).map_err(export_err)?;
        worksheet
            .write_number_with_format(row, 2, m.sale_value, &money)
            .map_err(export_err)?;
        worksheet
            .write_number_with_format(row, 3, m.fraction, &code)
            .map_err(export_err)?;
        worksheet
            .write_number_with_format(row, 4, m.commission, &money)
            .map_err(export_err)?;
        worksheet
            .write_boolean(row, 5, m.international)
            .map_err(export_err)?;
    }

    // 合計行
    let total_row = (result.matches.len() + 2) as u32;
    worksheet
        .write_string_with_format(total_row, 0, "Total de vendas", &header)
        .map_err(export_err)?;
    worksheet
        .write_number_with_format(total_row, 4, result.total, &money)
        .map_err(export_err)?;
    worksheet
        .write_string_with_format(total_row + 1, 0, "Quantidade de vendas", &header)
        .map_err(export_err)?;
    worksheet
        .write_number(total_row + 1, 4, result.count as f64)
        .map_err(export_err)?;
    worksheet
        .write_string_with_format(total_row + 2, 0, "Modelo", &header)
        .map_err(export_err)?;
    worksheet
        .write_string(total_row + 2, 4, &result.model)
        .map_err(export_err)?;
    worksheet
        .write_string_with_format(total_row + 3, 0, "Modo", &header)
        .map_err(export_err)?;
    worksheet
        .write_string(total_row + 3, 4, ctx.to_string())
        .map_err(export_err)?;
    worksheet
        .write_string_with_format(total_row + 4, 0, "Gerado em", &header)
        .map_err(export_err)?;
    worksheet
        .write_string(
            total_row + 4,
            4,
            chrono::Local::now().format("%d/%m/%Y %H:%M").to_string(),
        )
        .map_err(export_err)?;

    worksheet.autofit();

    workbook.save(output_path).map_err(export_err)?;
    log::info!("Excel出力: {} ({}行)", output_path.display(), result.count);
    Ok(())
}
