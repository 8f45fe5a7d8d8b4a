//! Language code detection from POSIX locale strings.

/// Environment variables consulted for the locale, highest priority first.
pub const LOCALE_ENV_VARS: &[&str] = &["LC_ALL", "LC_MESSAGES", "LANG"];

/// Extracts the language code from a locale such as `es_AR.UTF-8` or `pt-BR`.
///
/// Returns `None` for the `C`/`POSIX` locales and anything that does not start
/// with a 2 or 3 letter language code.
#[must_use]
pub fn language_from_locale(locale: &str) -> Option<String> {
    let locale = locale.split(['.', '@']).next()?.trim();
    if locale.eq_ignore_ascii_case("C") || locale.eq_ignore_ascii_case("POSIX") {
        return None;
    }

    let language = locale.split(['_', '-']).next()?;
    let valid = (2..=3).contains(&language.len())
        && language.chars().all(|c| c.is_ascii_alphabetic());
    valid.then(|| language.to_ascii_lowercase())
}

/// Returns the language of the first non-empty locale value.
///
/// `lookup` is usually `|name| std::env::var(name).ok()`.
pub fn language_from_env<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    LOCALE_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.is_empty())
        .and_then(|value| language_from_locale(&value))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    #[case::plain("es", Some("es"))]
    #[case::territory("es_AR", Some("es"))]
    #[case::encoding("es_AR.UTF-8", Some("es"))]
    #[case::modifier("ca_ES@valencia", Some("ca"))]
    #[case::dash("pt-BR", Some("pt"))]
    #[case::uppercase("EN_us", Some("en"))]
    #[case::three_letters("ast_ES.UTF-8", Some("ast"))]
    #[case::c_locale("C", None)]
    #[case::c_utf8("C.UTF-8", None)]
    #[case::posix("POSIX", None)]
    #[case::empty("", None)]
    #[case::too_long("english", None)]
    #[case::digits("e1_US", None)]
    fn language_from_locale_cases(#[case] locale: &str, #[case] expected: Option<&str>) {
        assert_eq!(language_from_locale(locale).as_deref(), expected);
    }

    #[rstest]
    fn language_from_env_respects_priority() {
        let env: HashMap<&str, &str> =
            [("LANG", "en_US.UTF-8"), ("LC_MESSAGES", "pt_BR.UTF-8")].into_iter().collect();

        let language = language_from_env(|name| env.get(name).map(ToString::to_string));

        assert_that!(language, some(eq("pt")));
    }

    #[rstest]
    fn language_from_env_skips_empty_values() {
        let env: HashMap<&str, &str> = [("LC_ALL", ""), ("LANG", "es_ES")].into_iter().collect();

        let language = language_from_env(|name| env.get(name).map(ToString::to_string));

        assert_that!(language, some(eq("es")));
    }

    #[rstest]
    fn language_from_env_without_locale() {
        assert_that!(language_from_env(|_| None), none());
    }
}
