//! Internal helpers for name normalization.
//!
//! These utilities are **not** part of the public API.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

/// Trim and collapse inner whitespace; rejects empty names.
pub(crate) fn normalize_display_name(value: &str, label: &str) -> ResultEngine<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(collapsed)
}

/// Comparison key for names: accents stripped, lowercased, punctuation
/// collapsed to single spaces.
pub(crate) fn normalize_name_key(value: &str) -> String {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in value.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    let key = out.trim_end();
    if key.is_empty() {
        value.trim().to_lowercase()
    } else {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_trimmed_and_collapsed() {
        assert_eq!(normalize_display_name("  Anna   Maria ", "person").unwrap(), "Anna Maria");
        assert!(normalize_display_name("   ", "person").is_err());
    }

    #[test]
    fn name_key_ignores_case_and_accents() {
        assert_eq!(normalize_name_key("Nicolò"), "nicolo");
        assert_eq!(normalize_name_key("NICOLO"), "nicolo");
        assert_eq!(normalize_name_key("Jean-Luc"), "jean luc");
        assert_eq!(normalize_name_key("??"), "??");
    }
}
