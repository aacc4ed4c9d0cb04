//! URL query-parameter round trip for answer sets.
//!
//! Each answered question becomes one `<question id>=<token>` parameter.
//! Decoding seeds raw tokens without checking them against the options;
//! stale tokens are dropped later by scoring.

use super::answers::AnswerSet;
use super::catalog::QuestionCatalog;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Anything that can answer "what is the value of parameter `name`".
pub trait ParameterSource {
    fn parameter(&self, name: &str) -> Option<&str>;
}

/// Ordered pairs; the first occurrence of a name wins.
impl ParameterSource for [(String, String)] {
    fn parameter(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl ParameterSource for Vec<(String, String)> {
    fn parameter(&self, name: &str) -> Option<&str> {
        self.as_slice().parameter(name)
    }
}

impl<S: BuildHasher> ParameterSource for HashMap<String, String, S> {
    fn parameter(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl ParameterSource for BTreeMap<String, String> {
    fn parameter(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl ParameterSource for AnswerSet {
    fn parameter(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}

impl<T: ParameterSource + ?Sized> ParameterSource for &T {
    fn parameter(&self, name: &str) -> Option<&str> {
        (**self).parameter(name)
    }
}

/// One `(question id, token)` pair per non-empty answer, ordered by id.
pub fn encode(answers: &AnswerSet) -> Vec<(String, String)> {
    answers
        .iter()
        .filter(|(_, token)| !token.is_empty())
        .map(|(id, token)| (id.clone(), token.clone()))
        .collect()
}

/// Seeds an answer set from every catalog question that has a non-empty parameter.
pub fn decode<P: ParameterSource + ?Sized>(source: &P, catalog: &QuestionCatalog) -> AnswerSet {
    catalog
        .questions()
        .iter()
        .filter_map(|question| {
            source
                .parameter(&question.id)
                .filter(|token| !token.is_empty())
                .map(|token| (question.id.clone(), token.to_string()))
        })
        .collect()
}

/// Form-urlencoded query text (without a leading `?`).
pub fn to_query_string(answers: &AnswerSet) -> Result<String, CodecError> {
    Ok(serde_urlencoded::to_string(encode(answers))?)
}

/// Parses query text into ordered pairs; a leading `?` is ignored.
pub fn parse_query(raw: &str) -> Result<Vec<(String, String)>, CodecError> {
    let trimmed = raw.trim();
    let query = trimmed.strip_prefix('?').unwrap_or(trimmed);
    Ok(serde_urlencoded::from_str(query)?)
}

/// `base_url` with the encoded answers appended; unchanged when nothing is answered.
pub fn share_link(base_url: &str, answers: &AnswerSet) -> Result<String, CodecError> {
    let query = to_query_string(answers)?;
    if query.is_empty() {
        return Ok(base_url.to_string());
    }

    let separator = if base_url.contains('?') { '&' } else { '?' };
    Ok(format!("{base_url}{separator}{query}"))
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode answers as a query string: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
    #[error("failed to parse query string: {0}")]
    Decode(#[from] serde_urlencoded::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_skips_empty_tokens() {
        let answers: AnswerSet = [("budget", "yes"), ("team_native", "")]
            .into_iter()
            .collect();
        assert_eq!(
            encode(&answers),
            vec![("budget".to_string(), "yes".to_string())]
        );
    }

    #[test]
    fn decode_ignores_parameters_outside_the_catalog() {
        let params = vec![
            ("utm_source".to_string(), "newsletter".to_string()),
            ("budget".to_string(), "some".to_string()),
            ("graphics_perf".to_string(), String::new()),
        ];
        let answers = decode(&params, &QuestionCatalog::standard());
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get("budget"), Some("some"));
    }

    #[test]
    fn decode_keeps_unknown_tokens_verbatim() {
        let mut params = HashMap::new();
        params.insert("os_features".to_string(), "sometimes".to_string());
        let answers = decode(&params, &QuestionCatalog::standard());
        assert_eq!(answers.get("os_features"), Some("sometimes"));
    }

    #[test]
    fn answer_sets_can_seed_other_answer_sets() {
        let posted: AnswerSet = [("budget", "no"), ("unrelated", "yes")].into_iter().collect();
        let answers = decode(&posted, &QuestionCatalog::standard());
        assert_eq!(answers, [("budget", "no")].into_iter().collect::<AnswerSet>());
    }

    #[test]
    fn first_repeated_parameter_wins() {
        let params = parse_query("?budget=no&budget=yes").expect("query parses");
        let answers = decode(params.as_slice(), &QuestionCatalog::standard());
        assert_eq!(answers.get("budget"), Some("no"));
    }

    #[test]
    fn query_string_escapes_reserved_characters() {
        let answers: AnswerSet = [("budget", "a&b c")].into_iter().collect();
        let query = to_query_string(&answers).expect("encodes");
        assert_eq!(query, "budget=a%26b+c");

        let params = parse_query(&query).expect("parses");
        assert_eq!(params, vec![("budget".to_string(), "a&b c".to_string())]);
    }

    #[test]
    fn share_link_appends_with_the_right_separator() {
        let answers: AnswerSet = [("budget", "yes")].into_iter().collect();
        assert_eq!(
            share_link("https://example.test/helper/", &answers).expect("link"),
            "https://example.test/helper/?budget=yes"
        );
        assert_eq!(
            share_link("https://example.test/?lang=en", &answers).expect("link"),
            "https://example.test/?lang=en&budget=yes"
        );
        assert_eq!(
            share_link("https://example.test/", &AnswerSet::new()).expect("link"),
            "https://example.test/"
        );
    }
}
