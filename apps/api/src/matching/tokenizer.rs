//! Tokenizer: turns free text into a set of normalized tokens.
//!
//! Lower-cases, splits on every non-alphanumeric character, and drops tokens
//! that are too short or listed as stopwords. Never fails: any input,
//! including the empty string, yields a (possibly empty) set.

use std::collections::BTreeSet;

/// Default minimum token length, in characters.
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 2;

/// Normalized tokens of a query or keyword. Sorted, duplicates collapsed.
pub type TokenSet = BTreeSet<String>;

/// Tokenizer settings shared by query text and model keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    pub min_token_length: usize,
    pub stopwords: BTreeSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            stopwords: BTreeSet::new(),
        }
    }
}

impl Tokenizer {
    pub fn new(min_token_length: usize) -> Self {
        Self {
            min_token_length,
            ..Self::default()
        }
    }

    /// Adds stopwords, normalized the same way tokens are.
    pub fn with_stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords.extend(
            stopwords
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
        self
    }

    pub fn tokenize(&self, text: &str) -> TokenSet {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|raw| !raw.is_empty())
            .map(str::to_lowercase)
            .filter(|token| token.chars().count() >= self.min_token_length)
            .filter(|token| !self.stopwords.contains(token))
            .collect()
    }
}

/// Tokenizes with the default settings.
#[allow(dead_code)]
pub fn tokenize(text: &str) -> TokenSet {
    Tokenizer::default().tokenize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> TokenSet {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_lowercases_and_splits_on_punctuation() {
        assert_eq!(
            tokenize("Python, SQL; and Go!!"),
            set(&["python", "sql", "and", "go"])
        );
    }

    #[test]
    fn test_drops_single_letter_tokens() {
        assert_eq!(
            tokenize("I know Python and SQL"),
            set(&["know", "python", "and", "sql"])
        );
    }

    #[test]
    fn test_empty_and_symbol_only_input_yield_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \n\t ... !!! 🎉🎉 ").is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let tokens = tokenize("rust Rust RUST rust-lang");
        assert_eq!(tokens, set(&["rust", "lang"]));
    }

    #[test]
    fn test_unicode_letters_are_kept() {
        assert_eq!(tokenize("Diseño GRÁFICO"), set(&["diseño", "gráfico"]));
    }

    #[test]
    fn test_digits_are_alphanumeric() {
        assert_eq!(tokenize("3d printing, k8s"), set(&["3d", "printing", "k8s"]));
    }

    #[test]
    fn test_min_length_is_configurable() {
        let tokenizer = Tokenizer::new(1);
        assert!(tokenizer.tokenize("C and R").contains("c"));

        let strict = Tokenizer::new(4);
        assert_eq!(strict.tokenize("go sql python"), set(&["python"]));
    }

    #[test]
    fn test_stopwords_are_removed_case_insensitively() {
        let tokenizer = Tokenizer::default().with_stopwords(["And", " the "]);
        assert_eq!(
            tokenizer.tokenize("the Python and the SQL"),
            set(&["python", "sql"])
        );
    }

    #[test]
    fn test_control_characters_are_separators() {
        assert_eq!(tokenize("rust\u{0}\u{7}docker"), set(&["rust", "docker"]));
    }
}
