//! Cleanup of the free-text vacancy fields.
//!
//! Snippets from the listing API carry markup such as `<highlighttext>`, so
//! text is stripped before it is counted.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;

const MIN_WORD_LEN: usize = 3;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref DESCRIPTION_NOISE: Regex = Regex::new(r"[^\w\s.,!?;:()\-]").unwrap();
    static ref PUNCTUATION: Regex = Regex::new(r"[^\w\s]").unwrap();
    static ref STOPWORDS: HashSet<&'static str> = [
        // english
        "and", "the", "for", "with", "you", "your", "our", "are", "will", "this", "that",
        "from", "have", "has", "all", "not", "but", "can", "who", "was", "its", "into",
        "also", "etc", "other", "such", "well", "able", "more",
        // russian
        "для", "что", "как", "или", "это", "при", "так", "без", "над", "под", "его",
        "она", "они", "будет", "быть", "которые", "который", "также", "том", "чем",
        "ваш", "вас", "нас", "наш", "наши", "вам", "уже", "все", "всех", "оно",
        "если", "где", "только", "можно", "более",
    ]
    .into_iter()
    .collect();
}

/// Text content of an HTML fragment, entities decoded
pub fn strip_markup(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().collect()
}

/// Markup-free single-line text: tags stripped, whitespace collapsed and
/// anything other than word characters and basic punctuation dropped
pub fn clean_description(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let text = strip_markup(html);
    let text = DESCRIPTION_NOISE.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_owned()
}

/// Lowercase text without punctuation, ready for word counting
pub fn frequency_text(html: &str) -> String {
    let text = clean_description(html);
    let text = PUNCTUATION.replace_all(&text, " ");
    WHITESPACE.replace_all(&text, " ").trim().to_lowercase()
}

/// Words worth counting: long enough, not purely numeric, not a stopword
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace().filter(|word| {
        word.chars().count() >= MIN_WORD_LEN
            && !word.chars().all(|c| c.is_ascii_digit())
            && !STOPWORDS.contains(*word)
    })
}
