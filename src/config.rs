use crate::error::{ReviewBatchError, Result};
use review_batch_common::NormalizeOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 作業セットの保存先を上書きする環境変数
pub const WORKSPACE_ENV: &str = "REVIEW_BATCH_WORKSPACE";

const DEFAULT_WORKSPACE_FILE: &str = ".review-batch.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 写真を縮小してから埋め込む
    pub normalize_photos: bool,
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG品質 (1-100)
    pub quality: u8,
    /// 作業セットファイル（未指定ならカレントの .review-batch.json）
    pub workspace: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let options = NormalizeOptions::default();
        Self {
            normalize_photos: true,
            max_width: options.max_width,
            max_height: options.max_height,
            quality: options.quality,
            workspace: None,
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
            .ok_or_else(|| ReviewBatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("review-batch").join("config.json"))
    }

    /// 縮小設定（無効なら None）
    pub fn normalize_options(&self) -> Option<NormalizeOptions> {
        self.normalize_photos.then(|| NormalizeOptions {
            max_width: self.max_width,
            max_height: self.max_height,
            quality: self.quality,
        })
    }

    /// 作業セットファイルのパス
    ///
    /// 優先順位: コマンドライン > 環境変数 > 設定ファイル > カレント
    pub fn workspace_path(&self, cli_override: Option<&PathBuf>) -> PathBuf {
        if let Some(path) = cli_override {
            return path.clone();
        }
        if let Ok(path) = std::env::var(WORKSPACE_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        self.workspace
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKSPACE_FILE))
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(ReviewBatchError::Config("最大サイズは1以上にしてください".into()));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(ReviewBatchError::Config(format!(
                "品質は1-100で指定してください: {}",
                self.quality
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_normalizes() {
        let config = Config::default();
        let options = config.normalize_options().unwrap();
        assert_eq!(options, NormalizeOptions::default());
    }

    #[test]
    fn test_normalize_disabled() {
        let config = Config {
            normalize_photos: false,
            ..Default::default()
        };
        assert!(config.normalize_options().is_none());
    }

    #[test]
    fn test_cli_override_wins() {
        let config = Config {
            workspace: Some(PathBuf::from("from-config.json")),
            ..Default::default()
        };
        let path = PathBuf::from("from-cli.json");
        assert_eq!(config.workspace_path(Some(&path)), path);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"quality": 70}"#).unwrap();
        assert_eq!(config.quality, 70);
        assert!(config.normalize_photos);
        assert_eq!(config.max_width, 1280);
    }

    #[test]
    fn test_validate_quality() {
        let config = Config { quality: 0, ..Default::default() };
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }
}
