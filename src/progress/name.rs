use regex::Regex;
use std::sync::LazyLock;

use crate::error::NameError;

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 30;

/// Accented letters accepted besides ASCII letters and digits.
const ACCENTED: &str = "áéíóúüñçàèìòùâêîôûäëïöÁÉÍÓÚÜÑÇÀÈÌÒÙÂÊÎÔÛÄËÏÖ";

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));
static SCRIPT_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript\s*:").expect("scheme pattern is valid"));
static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bon\w+\s*=").expect("handler pattern is valid"));

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || ACCENTED.contains(c) || matches!(c, ' ' | '-' | '\'' | '.')
}

/// Cleans a display name typed by the learner.
///
/// Markup, `javascript:` schemes and `on…=` handler patterns are removed,
/// then anything outside the allow-list. Whitespace is collapsed and the
/// result capped at [`MAX_NAME_LEN`] characters.
pub fn sanitize_name(raw: &str) -> Result<String, NameError> {
    let stripped = HTML_TAG.replace_all(raw, "");
    let stripped = SCRIPT_SCHEME.replace_all(&stripped, "");
    let stripped = EVENT_HANDLER.replace_all(&stripped, "");

    let allowed: String = stripped.chars().filter(|c| is_allowed(*c)).collect();
    let collapsed = allowed.split_whitespace().collect::<Vec<_>>().join(" ");
    let name: String = collapsed.chars().take(MAX_NAME_LEN).collect();
    let name = name.trim_end().to_string();

    if name.chars().count() < MIN_NAME_LEN {
        return Err(NameError::TooShort { min: MIN_NAME_LEN });
    }
    Ok(name)
}
