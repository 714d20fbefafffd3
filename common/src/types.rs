//! 集計エンジンの型定義
//!
//! - CellValue / RawRow / Sheet: スプレッドシートから読み込んだ生データ
//! - SellerCode / ClassificationContext: 行判定の条件
//! - MatchedRow / AggregateResult: 集計結果

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// セルの値
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    /// 表示用の文字列（空セルは空文字）
    ///
    /// 整数値の数値は `.0` を付けずに出力する
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(d) => d.format("%d/%m/%Y").to_string(),
        }
    }

    /// 前後の空白を除いた表示文字列
    pub fn trimmed_text(&self) -> String {
        self.display_text().trim().to_string()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// 参照する列（0始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// 販売日
    Date = 0,
    /// 販売額
    SaleValue = 2,
    /// コミッション
    Commission = 3,
    /// カテゴリ名 / チャネル名（"Postagem", "Chat" など）
    Channel = 4,
    /// 顧客名
    Client = 7,
    /// 国際カテゴリ（"Internacional"）
    InternationalCategory = 8,
    /// モデル名
    Model = 9,
}

impl Column {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// シートの1行（列位置でアクセス）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<CellValue>,
}

impl RawRow {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// 列の値を取得（行幅を超える列は空セル扱い）
    pub fn get(&self, column: Column) -> &CellValue {
        self.cell(column.index())
    }

    pub fn cell(&self, index: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.cells.get(index).unwrap_or(EMPTY)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<CellValue> for RawRow {
    fn from_iter<I: IntoIterator<Item = CellValue>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// 先頭シート全体（1行目はヘッダー）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: Vec<RawRow>,
}

impl Sheet {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    /// ヘッダー行を除いたデータ行
    pub fn data_rows(&self) -> &[RawRow] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 販売者コード（0, 10, 20, ..., 90）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SellerCode(u32);

impl SellerCode {
    /// 選択可能なコード一覧
    pub const ALL: [u32; 10] = [0, 10, 20, 30, 40, 50, 60, 70, 80, 90];

    /// "Postagem" 用のコード
    pub const POSTAGEM: SellerCode = SellerCode(0);

    pub fn new(code: u32) -> Result<Self> {
        if Self::ALL.contains(&code) {
            Ok(Self(code))
        } else {
            Err(Error::InvalidSellerCode(code))
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for SellerCode {
    fn default() -> Self {
        SellerCode(20)
    }
}

impl TryFrom<u32> for SellerCode {
    type Error = Error;

    fn try_from(code: u32) -> Result<Self> {
        Self::new(code)
    }
}

impl From<SellerCode> for u32 {
    fn from(code: SellerCode) -> u32 {
        code.0
    }
}

impl fmt::Display for SellerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SellerCode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let code: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("Unknown code: {}. Use 0, 10, 20, ..., 90", s))?;
        SellerCode::new(code).map_err(|e| e.to_string())
    }
}

/// 行判定モード
///
/// 販売者コード指定とグローバル/フィードは排他
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationContext {
    SelectedCode(SellerCode),
    GlobalFeed,
}

impl ClassificationContext {
    /// 画面上の選択（コード + フィードフラグ）から生成
    ///
    /// フィードがオンならコード指定より優先される
    pub fn from_selection(code: SellerCode, feed: bool) -> Self {
        if feed {
            ClassificationContext::GlobalFeed
        } else {
            ClassificationContext::SelectedCode(code)
        }
    }

    pub fn is_feed(&self) -> bool {
        matches!(self, ClassificationContext::GlobalFeed)
    }
}

impl Default for ClassificationContext {
    fn default() -> Self {
        ClassificationContext::SelectedCode(SellerCode::default())
    }
}

impl fmt::Display for ClassificationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationContext::SelectedCode(code) => write!(f, "コード {}", code),
            ClassificationContext::GlobalFeed => write!(f, "グローバル/フィード"),
        }
    }
}

/// 一致した行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedRow {
    pub model: String,            // モデル名（J列）
    pub client: String,           // 顧客名（H列）
    pub sale_value: f64,          // 販売額（国際調整後）
    pub fraction: f64,            // 端数コード（0.00〜0.99）
    pub commission: f64,          // コミッション
    pub international: bool,      // 国際調整あり
}

/// 集計結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub total: f64,
    pub count: usize,
    pub matches: Vec<MatchedRow>,
    pub model: String,
}

impl AggregateResult {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
