//! 集計結果・保存済み合計の端末表示

use crate::format::{format_currency, format_fraction, format_sale_value};
use report_helper_common::{AggregateResult, ClassificationContext, Ledger};
use std::fmt::Write;

const NO_MODEL: &str = "(sem modelo)";

/// 集計結果の要約
pub fn render_summary(result: &AggregateResult, ctx: &ClassificationContext) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "モード: {}", ctx);
    let _ = write!(out, "Total de vendas: {}", format_currency(result.total));
    if !result.model.is_empty() {
        let _ = write!(out, " ({})", result.model);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Quantidade de vendas: {}", result.count);
    out
}

/// 一致行の表（Resumo do relatório）
pub fn render_rows(result: &AggregateResult) -> String {
    let mut out = String::new();
    if result.matches.is_empty() {
        return out;
    }

    let _ = writeln!(out, "Resumo do relatório");
    let _ = writeln!(
        out,
        "{:<24} {:<24} {:>14} {:>7} {:>12}",
        "Nome da Modelo", "Nome do Cliente", "Valor da venda", "Código", "Comissão"
    );
    for m in &result.matches {
        let marker = if m.international { "*" } else { "" };
        let _ = writeln!(
            out,
            "{:<24} {:<24} {:>14} {:>7} {:>12}",
            truncate(&m.model, 24),
            truncate(&m.client, 24),
            format!("{}{}", format_sale_value(m.sale_value), marker),
            format_fraction(m.fraction),
            format_currency(m.commission),
        );
    }
    if result.matches.iter().any(|m| m.international) {
        let _ = writeln!(out, "* 国際チャット販売（10%調整済み）");
    }
    out
}

/// 保存済み合計の一覧
pub fn render_ledger(ledger: &Ledger, ctx: &ClassificationContext) -> String {
    let mut out = String::new();
    if ledger.is_empty() {
        let _ = writeln!(out, "保存済みの合計はありません");
        return out;
    }

    let _ = writeln!(out, "Valores salvos:");
    for entry in ledger.entries() {
        let modelo = if entry.modelo.is_empty() { NO_MODEL } else { entry.modelo.as_str() };
        let feed = if entry.feed { " [feed]" } else { "" };
        let _ = writeln!(out, "  {} - {}{}", format_currency(entry.valor), modelo, feed);
    }
    let _ = writeln!(out, "Soma dos salvos: {}", format_currency(ledger.sum()));
    let _ = writeln!(
        out,
        "Comissão estimada: {}",
        format_currency(ledger.estimated_commission(ctx))
    );
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
