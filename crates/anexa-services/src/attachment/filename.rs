//! Physical filename resolution.
//!
//! Templates support `{ID}`, `{FILENAME}`, and `{TIMESTAMP}`. The result is
//! lowercased and the original extension is appended. Pure given its inputs;
//! wall-clock access comes through the injected `Clock`.

use anexa_core::{Clock, RecordId, UploadCandidate};

/// Render the physical filename for a validated upload.
pub fn render(
    template: &str,
    id: RecordId,
    candidate: &UploadCandidate,
    clock: &dyn Clock,
) -> String {
    let name = template
        .replace("{ID}", &id.to_string())
        .replace("{FILENAME}", &slugify(&candidate.stem()))
        .replace("{TIMESTAMP}", &clock.now().timestamp().to_string())
        .to_lowercase();

    let extension = candidate.extension();
    if extension.is_empty() {
        name
    } else {
        format!("{}.{}", name, extension)
    }
}

/// Slug form of an uploader-supplied name: lowercased, Latin diacritics
/// folded to ASCII, whitespace and underscores collapsed to `-`, everything
/// else dropped.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.to_lowercase().chars() {
        if let Some(folded) = fold_diacritic(c) {
            out.push_str(folded);
        } else if c.is_alphanumeric() {
            out.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            out.push('-');
        }
    }
    out.split('-')
        .filter(|seg| !seg.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// ASCII fold for common Latin diacritics. Input is already lowercased.
fn fold_diacritic(c: char) -> Option<&'static str> {
    Some(match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ą' => "a",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' => "i",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ő' => "o",
        'ù' | 'ú' | 'û' | 'ü' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ñ' | 'ń' | 'ň' => "n",
        'ç' | 'ć' | 'č' => "c",
        'š' | 'ś' => "s",
        'ž' | 'ź' | 'ż' => "z",
        'ď' | 'đ' => "d",
        'ť' => "t",
        'ř' => "r",
        'ł' => "l",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        _ => return None,
    })
}
