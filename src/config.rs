use crate::error::{ReviewError, Result};
use serde::{Deserialize, Serialize};
use crate::ollama::RetryPolicy;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// APIキーを上書きする環境変数
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemConfig {
    pub ollama_url: String,
    /// 取り込み時の説明文生成に使うローカルモデル
    pub model: String,
    pub ollama_timeout_secs: u64,
    /// 初回以外の再試行回数
    pub ollama_retries: u32,
    /// 再試行の初回待ち時間（以降倍々）
    pub retry_delay_ms: u64,
    /// ローカルモデル失敗時に Gemini で生成する
    pub use_gemini_fallback: bool,
    pub gemini_api_key: Option<String>,
    pub judge_model: String,
    /// 高信頼マーク表示のしきい値（自動承認はしない）
    pub auto_approve_confidence: f64,
    pub watch_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".into(),
            model: "llama3.2-vision".into(),
            ollama_timeout_secs: 60,
            ollama_retries: 3,
            retry_delay_ms: 1000,
            use_gemini_fallback: false,
            gemini_api_key: None,
            judge_model: "gemini-2.5-flash".into(),
            auto_approve_confidence: 0.85,
            watch_path: PathBuf::from("./input"),
            output_path: PathBuf::from("./output"),
        }
    }
}

impl SystemConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: SystemConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReviewError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("caption-review").join("config.json"))
    }

    /// APIキーを取得（環境変数を優先）
    pub fn get_api_key(&self) -> Result<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        resolve_api_key(from_env.as_deref(), self.gemini_api_key.as_deref())
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.gemini_api_key = Some(key);
        self.save()
    }

    pub fn ollama_timeout(&self) -> Duration {
        Duration::from_secs(self.ollama_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.ollama_retries,
            base_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// 環境変数 → 設定ファイルの順で空でないキーを返す
fn resolve_api_key(from_env: Option<&str>, from_config: Option<&str>) -> Result<String> {
    [from_env, from_config]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or(ReviewError::MissingCredential)
}
