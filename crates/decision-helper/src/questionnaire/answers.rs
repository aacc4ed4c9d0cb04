use super::catalog::QuestionCatalog;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Sparse mapping of question id to the selected option token.
///
/// A question with no entry (or an empty token) is unanswered. Tokens are
/// stored as given; matching against the catalog happens at scoring time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    entries: BTreeMap<String, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `token` for `question_id`, returning the previous token.
    pub fn set(&mut self, question_id: impl Into<String>, token: impl Into<String>) -> Option<String> {
        self.entries.insert(question_id.into(), token.into())
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.entries.get(question_id).map(String::as_str)
    }

    /// The stored token when it is non-empty.
    pub fn answer(&self, question_id: &str) -> Option<&str> {
        self.get(question_id).filter(|token| !token.is_empty())
    }

    pub fn remove(&mut self, question_id: &str) -> Option<String> {
        self.entries.remove(question_id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.entries.iter()
    }

    /// Keeps only entries whose question still exists in `catalog`.
    pub fn restricted_to(&self, catalog: &QuestionCatalog) -> Self {
        self.entries
            .iter()
            .filter(|(id, _)| catalog.question(id).is_some())
            .map(|(id, token)| (id.clone(), token.clone()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut answers = Self::new();
        answers.extend(iter);
        answers
    }
}

impl<K, V> Extend<(K, V)> for AnswerSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (id, token) in iter {
            self.set(id, token);
        }
    }
}

impl<'a> IntoIterator for &'a AnswerSet {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
