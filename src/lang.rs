//! Script detection for rendered text.
//!
//! Only decides the `lang` attribute on rendered answers and notes. Queries
//! sent to the proxy are never altered.

use regex::Regex;
use std::sync::LazyLock;

/// Georgian block, U+10A0..=U+10FF.
static GEORGIAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\x{10A0}-\x{10FF}]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Georgian,
    English,
}

impl Language {
    /// BCP 47 code used in the `lang` attribute.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Georgian => "ka",
            Self::English => "en",
        }
    }
}

/// `Georgian` if any character falls in the Georgian block, otherwise `English`.
pub fn detect_language(text: &str) -> Language {
    if GEORGIAN.is_match(text) {
        Language::Georgian
    } else {
        Language::English
    }
}
