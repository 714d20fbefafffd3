use crate::error::{ReportError, Result};
use report_helper_common::SellerCode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 保存済み合計ファイルの場所を上書きする環境変数
pub const LEDGER_PATH_ENV: &str = "REPORT_HELPER_LEDGER";

const LEDGER_FILE_NAME: &str = "totais-salvos.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_code: SellerCode,
    pub ledger_path: Option<PathBuf>,
    pub show_rows: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_code: SellerCode::default(),
            ledger_path: None,
            show_rows: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReportError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("report-helper").join("config.json"))
    }

    /// 保存済み合計ファイルのパス
    ///
    /// 優先順位: 環境変数 → 設定ファイル → データディレクトリ
    pub fn ledger_path(&self) -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(LEDGER_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        if let Some(ref path) = self.ledger_path {
            return Ok(path.clone());
        }

        let data = dirs::data_dir()
            .ok_or_else(|| ReportError::Config("データディレクトリが見つかりません".into()))?;
        Ok(data.join("report-helper").join(LEDGER_FILE_NAME))
    }

    pub fn set_default_code(&mut self, code: SellerCode) -> Result<()> {
        self.default_code = code;
        self.save()
    }

    pub fn set_ledger_path(&mut self, path: PathBuf) -> Result<()> {
        self.ledger_path = Some(path);
        self.save()
    }
}
