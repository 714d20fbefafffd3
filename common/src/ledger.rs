//! 保存済み合計（台帳）
//!
//! 集計合計とモデル名の組を追記していく。同じ (金額, モデル名) の組は1件まで。
//! 保存形式は JSON 配列で、旧形式（数値のみ）と `{valor, modelo, feed}` の両方を読み込める。

use crate::error::{Error, Result};
use crate::number::round2;
use crate::types::ClassificationContext;
use serde::{Deserialize, Serialize};
use serde::de::IgnoredAny;
use serde_json::{Map, Value};

/// 台帳の1件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedEntry {
    /// 合計金額
    pub valor: f64,
    /// モデル名（前後の空白除去済み）
    pub modelo: String,
    /// グローバル/フィードモードで保存したか
    #[serde(default)]
    pub feed: bool,
}

impl SavedEntry {
    /// 重複判定キー（セント単位の金額, モデル名）
    fn key(&self) -> (i64, &str) {
        (cents(self.valor), self.modelo.trim())
    }
}

fn cents(valor: f64) -> i64 {
    (round2(valor) * 100.0).round() as i64
}

/// 見込みコミッションの料率
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommissionRate {
    /// 通常モード: 15%
    Ordinary,
    /// グローバル/フィードモード: 2.5%
    Feed,
}

impl CommissionRate {
    pub fn for_context(ctx: &ClassificationContext) -> Self {
        match ctx {
            ClassificationContext::SelectedCode(_) => CommissionRate::Ordinary,
            ClassificationContext::GlobalFeed => CommissionRate::Feed,
        }
    }

    pub fn rate(self) -> f64 {
        match self {
            CommissionRate::Ordinary => 0.15,
            CommissionRate::Feed => 0.025,
        }
    }
}

/// 全件削除の確認済みトークン
///
/// 呼び出し側がユーザーに確認したうえで明示的に作る
#[derive(Debug)]
pub struct ClearConfirmation(());

impl ClearConfirmation {
    pub fn confirmed() -> Self {
        ClearConfirmation(())
    }
}

/// 保存済み合計の一覧
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    entries: Vec<SavedEntry>,
}

/// 保存データの1要素（旧形式の数値 / オブジェクト / 配列 / それ以外）
#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedItem {
    Legacy(f64),
    Entry(Map<String, Value>),
    /// 配列はフィールドを持たないオブジェクトとして扱う（金額0）
    List(Vec<IgnoredAny>),
    Other(IgnoredAny),
}

impl PersistedItem {
    fn into_entry(self) -> Option<SavedEntry> {
        let entry = match self {
            PersistedItem::Legacy(valor) => SavedEntry {
                valor,
                modelo: String::new(),
                feed: false,
            },
            PersistedItem::Entry(fields) => SavedEntry {
                valor: value_to_number(fields.get("valor")),
                modelo: value_to_label(fields.get("modelo")),
                feed: fields.get("feed").and_then(Value::as_bool).unwrap_or(false),
            },
            PersistedItem::List(_) => SavedEntry::default(),
            PersistedItem::Other(_) => return None,
        };
        entry.valor.is_finite().then_some(entry)
    }
}

/// `valor` フィールドを数値に（欠損は0、解釈できなければ NaN）
fn value_to_number(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(_) => f64::NAN,
    }
}

/// `modelo` フィールドを文字列に（欠損は空文字）
fn value_to_label(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存データから復元
    ///
    /// 不正な要素は読み飛ばし、JSON全体が壊れている場合は空の台帳を返す
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Vec<PersistedItem>>(json) {
            Ok(items) => Self {
                entries: items.into_iter().filter_map(PersistedItem::into_entry).collect(),
            },
            Err(e) => {
                log::warn!("保存済み合計を読み込めません（空として扱います）: {}", e);
                Self::default()
            }
        }
    }

    /// 保存用JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    pub fn entries(&self) -> &[SavedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 同じ (金額, モデル名) が保存済みか
    pub fn contains(&self, valor: f64, modelo: &str) -> bool {
        let key = (cents(valor), modelo.trim());
        self.entries.iter().any(|e| e.key() == key)
    }

    /// 追加
    ///
    /// 同じ (小数2桁の金額, モデル名) が既にあれば `Error::DuplicateEntry`。
    /// フィードフラグは重複判定に使わない。
    pub fn append(&mut self, valor: f64, modelo: &str, feed: bool) -> Result<&SavedEntry> {
        let valor = if valor.is_finite() { round2(valor) } else { 0.0 };
        let modelo = modelo.trim();

        if self.contains(valor, modelo) {
            return Err(Error::DuplicateEntry {
                valor,
                modelo: modelo.to_string(),
            });
        }

        self.entries.push(SavedEntry {
            valor,
            modelo: modelo.to_string(),
            feed,
        });
        let last = self.entries.len() - 1;
        Ok(&self.entries[last])
    }

    /// 全件削除
    pub fn clear(&mut self, _confirmation: ClearConfirmation) {
        self.entries.clear();
    }

    /// 保存済み合計の総和（小数2桁）
    pub fn sum(&self) -> f64 {
        round2(self.entries.iter().map(|e| e.valor).sum())
    }

    /// 見込みコミッション
    pub fn estimated_commission(&self, ctx: &ClassificationContext) -> f64 {
        round2(self.sum() * CommissionRate::for_context(ctx).rate())
    }
}

/// 台帳の保存先
pub trait LedgerStore {
    /// 保存データを読む（未保存なら `None`）
    fn load(&self) -> Result<Option<String>>;
    /// 保存データを丸ごと置き換える
    fn save(&mut self, json: &str) -> Result<()>;
    /// 保存データを削除
    fn remove(&mut self) -> Result<()>;
}

/// 保存先と同期した台帳
///
/// 変更は保存に成功してからメモリ上に反映する
pub struct PersistentLedger<S: LedgerStore> {
    store: S,
    ledger: Ledger,
}

impl<S: LedgerStore> PersistentLedger<S> {
    /// 保存先から読み込む（読めなければ空）
    pub fn open(store: S) -> Self {
        let ledger = match store.load() {
            Ok(Some(json)) => Ledger::from_json(&json),
            Ok(None) => Ledger::default(),
            Err(e) => {
                log::warn!("保存済み合計の読み込みに失敗（空として扱います）: {}", e);
                Ledger::default()
            }
        };
        Self { store, ledger }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 追加して保存
    pub fn append(&mut self, valor: f64, modelo: &str, feed: bool) -> Result<SavedEntry> {
        let mut next = self.ledger.clone();
        let entry = next.append(valor, modelo, feed)?.clone();
        self.store.save(&next.to_json()?)?;
        self.ledger = next;
        log::info!("保存: {:.2} ({})", entry.valor, entry.modelo);
        Ok(entry)
    }

    /// 全件削除して保存データも消す
    pub fn clear(&mut self, confirmation: ClearConfirmation) -> Result<()> {
        self.store.remove()?;
        self.ledger.clear(confirmation);
        log::info!("保存済み合計を全件削除");
        Ok(())
    }
}
