//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use crate::store::{
    TemplateStore,
    TranslationStore,
};
use crate::types::{
    Template,
    TranslationRecord,
};

/// テスト用の TemplateStore を作成する
///
/// # Arguments
/// * `templates` - `(カテゴリ, テンプレート)` の一覧
pub(crate) fn create_templates(templates: &[(&str, &str)]) -> TemplateStore {
    templates.iter().map(|(category, text)| Template::new(*category, *text)).collect()
}

/// テスト用の TranslationStore を作成する
///
/// # Arguments
/// * `language` - 言語コード（例: "es", "pt"）
/// * `records` - `(カテゴリ, 原文テンプレート, 翻訳テンプレート)` の一覧
pub(crate) fn create_translations(
    language: &str,
    records: &[(&str, &str, &str)],
) -> TranslationStore {
    records
        .iter()
        .map(|(category, source, translated)| {
            TranslationRecord::new(*category, *source, language, *translated)
        })
        .collect()
}
