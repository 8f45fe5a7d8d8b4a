//! 設定管理を行うモジュール

use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    I18nSettings,
};
use crate::format::PlaceholderSyntax;
use crate::translator::DEFAULT_LANGUAGE;

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".exc-i18n.json";

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: I18nSettings,

    /// 設定ファイルを探したディレクトリ（ストアのパスの基準）
    base_dir: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: I18nSettings::default(), base_dir: None }
    }

    /// 設定を読み込む
    ///
    /// `base_dir` に `.exc-i18n.json` がなければデフォルト設定を使う。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, base_dir: Option<PathBuf>) -> Result<(), ConfigError> {
        let settings = match &base_dir {
            Some(dir) => read_settings_file(dir)?.unwrap_or_default(),
            None => I18nSettings::default(),
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.base_dir = base_dir;
        tracing::debug!(settings = ?self.current_settings, "Settings loaded");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &I18nSettings {
        &self.current_settings
    }

    /// 翻訳先の言語を決定する
    ///
    /// 優先順位: 設定ファイルの `language` → ロケールから得た言語 → `"es"`
    ///
    /// # Arguments
    /// * `detected` - ロケールから検出した言語（[`super::language_from_env`] の結果）
    #[must_use]
    pub fn resolve_language(&self, detected: Option<String>) -> String {
        self.current_settings
            .language
            .clone()
            .or(detected)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    /// プレースホルダー構文を取得
    #[must_use]
    pub fn placeholder_syntax(&self) -> PlaceholderSyntax {
        PlaceholderSyntax::new(self.current_settings.placeholder.conversions.clone())
    }

    /// テンプレートストアのパス（`base_dir` からの相対パスを解決）
    #[must_use]
    pub fn template_store_path(&self) -> PathBuf {
        self.resolve(&self.current_settings.template_store)
    }

    /// 翻訳ストアのパス（`base_dir` からの相対パスを解決）
    #[must_use]
    pub fn translation_store_path(&self) -> PathBuf {
        self.resolve(&self.current_settings.translation_store)
    }

    /// `base_dir` を基準にパスを解決する
    fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.as_ref().map_or_else(|| PathBuf::from(path), |dir| dir.join(path))
    }
}

/// `dir` の設定ファイルを読む。ファイルがなければ `None`
fn read_settings_file(dir: &Path) -> Result<Option<I18nSettings>, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    tracing::debug!(path = %path.display(), "Reading configuration file");
    Ok(Some(serde_json::from_str(&content)?))
}
