//! Case formats used to re-case capture groups during path transformation.
//!
//! Formatting only touches runs of alphanumerics and word joiners (`_`, `-`,
//! space). Everything else, such as `/` or `.`, is copied through unchanged,
//! so a whole path fragment can be re-cased without disturbing its structure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TransformError;

/// Target casing for a re-cased capture group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CaseFormat {
    /// `some source` -> `some source`
    Lower,
    /// `some source` -> `SOME SOURCE`
    Upper,
    /// `some_source` -> `SomeSource`
    Pascal,
    /// `some_source` -> `someSource`
    Camel,
    /// `SomeSource` -> `some_source`
    Snake,
    /// `SomeSource` -> `some-source`
    Kebab,
}

impl CaseFormat {
    /// All supported formats.
    pub const ALL: [CaseFormat; 6] = [
        CaseFormat::Lower,
        CaseFormat::Upper,
        CaseFormat::Pascal,
        CaseFormat::Camel,
        CaseFormat::Snake,
        CaseFormat::Kebab,
    ];

    /// Canonical configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            CaseFormat::Lower => "lowercase",
            CaseFormat::Upper => "UPPERCASE",
            CaseFormat::Pascal => "PascalCase",
            CaseFormat::Camel => "camelCase",
            CaseFormat::Snake => "snake_case",
            CaseFormat::Kebab => "kebab-case",
        }
    }

    /// Re-case `input` according to this format.
    pub fn apply(&self, input: &str) -> String {
        match self {
            CaseFormat::Lower => input.to_lowercase(),
            CaseFormat::Upper => input.to_uppercase(),
            CaseFormat::Pascal => WordStyle::Pascal.apply(input),
            CaseFormat::Camel => WordStyle::Camel.apply(input),
            CaseFormat::Snake => WordStyle::Snake.apply(input),
            CaseFormat::Kebab => WordStyle::Kebab.apply(input),
        }
    }
}

/// Formats that rebuild each segment from its words.
#[derive(Debug, Clone, Copy)]
enum WordStyle {
    Pascal,
    Camel,
    Snake,
    Kebab,
}

impl WordStyle {
    fn apply(self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut segment = String::new();

        for c in input.chars() {
            if is_word_char(c) {
                segment.push(c);
            } else {
                self.flush_segment(&mut segment, &mut out);
                out.push(c);
            }
        }
        self.flush_segment(&mut segment, &mut out);

        out
    }

    fn flush_segment(self, segment: &mut String, out: &mut String) {
        if segment.is_empty() {
            return;
        }

        let words = split_words(segment);
        if words.is_empty() {
            // Only joiners, nothing to re-case.
            out.push_str(segment);
        } else {
            out.push_str(&self.join_words(&words));
        }
        segment.clear();
    }

    fn join_words(self, words: &[String]) -> String {
        match self {
            WordStyle::Pascal => words.iter().map(|w| capitalize(w)).collect(),
            WordStyle::Camel => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
                .collect(),
            WordStyle::Snake => join_lower(words, "_"),
            WordStyle::Kebab => join_lower(words, "-"),
        }
    }
}

impl fmt::Display for CaseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CaseFormat {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !is_joiner(*c))
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "lowercase" | "lower" => Ok(CaseFormat::Lower),
            "uppercase" | "upper" => Ok(CaseFormat::Upper),
            "pascalcase" | "pascal" => Ok(CaseFormat::Pascal),
            "camelcase" | "camel" => Ok(CaseFormat::Camel),
            "snakecase" | "snake" => Ok(CaseFormat::Snake),
            "kebabcase" | "kebab" => Ok(CaseFormat::Kebab),
            _ => Err(TransformError::UnknownCaseFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for CaseFormat {
    type Error = TransformError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CaseFormat> for String {
    fn from(value: CaseFormat) -> Self {
        value.name().to_string()
    }
}

fn is_joiner(c: char) -> bool {
    matches!(c, '_' | '-' | ' ')
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || is_joiner(c)
}

/// Split a segment into words on joiners and on case transitions
/// (`someSource` -> `some`, `Source`; `HTTPServer` -> `HTTP`, `Server`).
fn split_words(segment: &str) -> Vec<String> {
    let chars: Vec<char> = segment.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if is_joiner(c) {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn join_lower(words: &[String], sep: &str) -> String {
    words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_strips_joiners() {
        assert_eq!(CaseFormat::Pascal.apply("some_source"), "SomeSource");
        assert_eq!(CaseFormat::Pascal.apply("some-source file"), "SomeSourceFile");
        assert_eq!(CaseFormat::Pascal.apply("someSource"), "SomeSource");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(CaseFormat::Camel.apply("Some_Source"), "someSource");
        assert_eq!(CaseFormat::Camel.apply("HTTPServer"), "httpServer");
    }

    #[test]
    fn test_snake_and_kebab() {
        assert_eq!(CaseFormat::Snake.apply("SomeSource"), "some_source");
        assert_eq!(CaseFormat::Kebab.apply("SomeSource"), "some-source");
        assert_eq!(CaseFormat::Snake.apply("HTTPServer2Go"), "http_server2_go");
    }

    #[test]
    fn test_upper_and_lower_touch_everything() {
        assert_eq!(CaseFormat::Upper.apply("file.js"), "FILE.JS");
        assert_eq!(CaseFormat::Lower.apply("Some_Source"), "some_source");
    }

    #[test]
    fn test_upper_and_lower_keep_word_boundaries() {
        assert_eq!(CaseFormat::Lower.apply("someSource file"), "somesource file");
        assert_eq!(CaseFormat::Upper.apply("some-source"), "SOME-SOURCE");
    }

    #[test]
    fn test_punctuation_and_separators_preserved() {
        assert_eq!(
            CaseFormat::Pascal.apply("classes/my_entity.spec"),
            "Classes/MyEntity.Spec"
        );
        assert_eq!(CaseFormat::Kebab.apply("a/--/b"), "a/--/b");
    }

    #[test]
    fn test_parse_accepts_common_spellings() {
        assert_eq!("PascalCase".parse::<CaseFormat>().unwrap(), CaseFormat::Pascal);
        assert_eq!("snake_case".parse::<CaseFormat>().unwrap(), CaseFormat::Snake);
        assert_eq!("kebab-case".parse::<CaseFormat>().unwrap(), CaseFormat::Kebab);
        assert_eq!("UPPERCASE".parse::<CaseFormat>().unwrap(), CaseFormat::Upper);
        for format in CaseFormat::ALL {
            assert_eq!(format.name().parse::<CaseFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_unknown_format_is_an_error() {
        let err = "SpongeCase".parse::<CaseFormat>().unwrap_err();
        assert!(matches!(err, TransformError::UnknownCaseFormat(ref s) if s == "SpongeCase"));
    }

    #[test]
    fn test_serde_rejects_unknown_format() {
        let ok: CaseFormat = serde_json::from_str("\"camelCase\"").unwrap();
        assert_eq!(ok, CaseFormat::Camel);
        assert!(serde_json::from_str::<CaseFormat>("\"title\"").is_err());
        assert_eq!(serde_json::to_string(&CaseFormat::Kebab).unwrap(), "\"kebab-case\"");
    }
}
