use crate::dom::DomElement;
use crate::locator::normalize::{split_case_boundaries, to_camel_case};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

const MAX_TEXT_WORDS: usize = 4;
const MAX_TEXT_CHARS: usize = 30;

static TEXT_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-:,./]").expect("valid regex"));
static FILE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.([a-z0-9]+)$").expect("valid regex"));

/// Identifier for `element`: a camel-cased base plus a role suffix
/// (`emailField`, `submitButton`). `None` when nothing names the element.
pub fn base_name_for(element: &DomElement<'_>) -> Option<String> {
    let raw = raw_base_name(element)?;

    let raw = if starts_with_digit(&raw) {
        let extension = FILE_EXTENSION
            .captures(&raw)
            .and_then(|captures| captures.get(1))
            .map(|m| capitalize(&m.as_str().to_ascii_lowercase()))
            .unwrap_or_default();
        format!("random{}File", extension)
    } else {
        raw
    };
    let raw = FILE_EXTENSION.replace(&raw, "");

    let mut base = to_camel_case(&raw);
    if base.is_empty() {
        base = "element".to_string();
    }

    Some(with_role_suffix(base, element))
}

fn raw_base_name(element: &DomElement<'_>) -> Option<String> {
    if let Some(value) = ["data-testid", "id", "name"]
        .iter()
        .find_map(|attribute| element.attr(attribute))
    {
        return Some(value.to_string());
    }

    if let Some(word) = ["placeholder", "aria-label"]
        .iter()
        .filter_map(|attribute| element.attr(attribute))
        .find_map(|value| value.split_whitespace().next())
    {
        return Some(word.to_string());
    }

    let content = element.text_content();
    if content.trim().is_empty() {
        return None;
    }
    let text = TEXT_SEPARATORS.replace_all(&content, " ");
    let words = text
        .split_whitespace()
        .take(MAX_TEXT_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    Some(words.chars().take(MAX_TEXT_CHARS).collect())
}

fn starts_with_digit(raw: &str) -> bool {
    raw.starts_with(|c: char| c.is_ascii_digit())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

// A role counts as named only when it is a whole camel-case word of `base`:
// `loginButton` keeps its name, `linkedin` still gets `Link`.
fn with_role_suffix(base: String, element: &DomElement<'_>) -> String {
    let words: Vec<String> = split_case_boundaries(&base)
        .into_iter()
        .map(|word| word.to_ascii_lowercase())
        .collect();
    let names_role = |role: &str| words.iter().any(|word| word == role);

    let suffix = match element.tag_name().as_str() {
        "button" => Some("Button"),
        "input" => match element.input_type().as_str() {
            "text" | "email" | "password" => Some("Field"),
            "checkbox" => Some("Checkbox"),
            "radio" => Some("Radio"),
            "submit" => Some("Button"),
            _ if names_role("button") || names_role("input") || names_role("field") => None,
            _ => Some("Input"),
        },
        "textarea" => Some("Textarea"),
        "select" => Some("Dropdown"),
        "a" => Some("Link"),
        "label" => Some("Label"),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some("Heading"),
        "span" => Some("Text"),
        _ => None,
    };

    match suffix {
        Some(suffix) if !names_role(&suffix.to_ascii_lowercase()) => base + suffix,
        _ => base,
    }
}

/// Hands out identifiers that are unique within one scan.
///
/// The first request for a base returns it unchanged; later requests append
/// 2, 3, ... Candidates already issued are skipped, so every returned name is
/// distinct even when a base collides with an earlier suffixed name.
#[derive(Debug, Default)]
pub struct NameAllocator {
    counts: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.counts.clear();
        self.issued.clear();
    }

    pub fn allocate(&mut self, base: &str) -> String {
        let count = self.counts.entry(base.to_string()).or_insert(0);
        loop {
            *count += 1;
            let candidate = if *count == 1 {
                base.to_string()
            } else {
                format!("{}{}", base, count)
            };
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
