//! シート集計
//!
//! データ行を順に判定し、一致行のコミッション合計・件数・最頻モデル名を求める。
//! 行ごとの状態は持たず、同じ入力なら何度実行しても同じ結果になる。

use crate::classifier::classify_row;
use crate::number::round2;
use crate::types::{AggregateResult, ClassificationContext, MatchedRow, Sheet};

/// シートを集計（1行目はヘッダーとして除外）
pub fn aggregate(sheet: &Sheet, ctx: &ClassificationContext) -> AggregateResult {
    let rows = sheet.data_rows();

    let (total, matches) = rows
        .iter()
        .filter_map(|row| classify_row(row, ctx))
        .fold((0.0_f64, Vec::new()), |(total, mut matches), m| {
            let total = total + m.commission;
            matches.push(m);
            (total, matches)
        });

    log::debug!(
        "集計: {} / {}行一致 ({})",
        matches.len(),
        rows.len(),
        ctx
    );

    let model = dominant_model(&matches);

    AggregateResult {
        total: round2(total),
        count: matches.len(),
        matches,
        model,
    }
}

/// 最頻モデル名
///
/// 空白のみのモデル名は数えない。同数の場合は先に出現した方を採用する。
pub fn dominant_model(matches: &[MatchedRow]) -> String {
    // 出現順を保ったまま件数を数える
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for m in matches {
        let key = m.model.trim();
        if key.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }

    counts
        .iter()
        .fold(None::<(&str, usize)>, |best, &(key, n)| match best {
            Some((_, best_n)) if best_n >= n => best,
            _ => Some((key, n)),
        })
        .map(|(key, _)| key.to_string())
        .unwrap_or_default()
}
