use isolang::Language;

use crate::errors::AppError;

/// Language utilities
///
/// The site labels subtitle rows with English language names ("English",
/// "French", "Brazilian Portuguese"), compared case-sensitively. These helpers
/// turn the operator's input into that spelling.

/// Upper-case the first letter, keep the rest verbatim
pub fn capitalize_language(language: &str) -> Result<String, AppError> {
    let mut chars = language.chars();
    match chars.next() {
        Some(first) => Ok(first.to_uppercase().chain(chars).collect()),
        None => Err(AppError::Usage("Language must not be empty".to_string())),
    }
}

/// Look up the English name of an ISO 639-1 or ISO 639-2 code
///
/// Dating qualifiers are dropped, so "Modern Greek (1453-)" gives "Greek".
/// Only names that are then a single word are returned; the others don't
/// match the site's labels.
pub fn language_name_from_code(code: &str) -> Option<String> {
    let normalized_code = code.trim().to_lowercase();

    let language = match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => Language::from_639_3(&normalized_code).or_else(|| {
            // ISO 639-2/B codes that differ from ISO 639-2/T
            let part2t = match normalized_code.as_str() {
                "fre" => "fra",
                "ger" => "deu",
                "dut" => "nld",
                "gre" => "ell",
                "chi" => "zho",
                "cze" => "ces",
                "ice" => "isl",
                "alb" => "sqi",
                "arm" => "hye",
                "baq" => "eus",
                "bur" => "mya",
                "per" => "fas",
                "geo" => "kat",
                "may" => "msa",
                "mac" => "mkd",
                "rum" => "ron",
                "slo" => "slk",
                "wel" => "cym",
                _ => return None,
            };
            Language::from_639_3(part2t)
        }),
        _ => None,
    }?;

    let name = site_label(language.to_name());
    if !name.is_empty() && name.chars().all(|c| c.is_alphabetic()) {
        Some(name.to_string())
    } else {
        None
    }
}

// "Modern Greek (1453-)" -> "Greek"
fn site_label(name: &str) -> &str {
    let name = match name.find(" (") {
        Some(pos) => &name[..pos],
        None => name,
    };
    name.strip_prefix("Modern ").unwrap_or(name)
}

/// Turn the `-l` argument into the label used by the site
///
/// `english` and `English` give `English`; `fr` and `fre` give `French`.
pub fn resolve_language(input: &str) -> Result<String, AppError> {
    let input = input.trim();
    if let Some(name) = language_name_from_code(input) {
        return Ok(name);
    }
    capitalize_language(input)
}
