use super::answers::AnswerSet;
use super::catalog::QuestionCatalog;
use super::codec::to_query_string;
use super::scoring::{
    aggregate, breakdown, normalize, recommend, QuestionContribution, Recommendation,
};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionScore {
    pub key: String,
    pub label: String,
    pub score: f64,
    pub percentage: i32,
}

/// Everything a caller needs to display the result of an answer set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub dimensions: Vec<DimensionScore>,
    pub recommendation: Recommendation,
    pub headline: String,
    pub answered: usize,
    pub unanswered: usize,
    pub total_questions: usize,
    pub share_query: String,
    pub breakdown: Vec<QuestionContribution>,
}

impl Assessment {
    /// Scores `answers` against `catalog`.
    ///
    /// `share_query` is left empty if the answers cannot be encoded.
    pub fn evaluate(catalog: &QuestionCatalog, answers: &AnswerSet) -> Self {
        let totals = aggregate(catalog, answers);
        let split = normalize(&totals);
        let recommendation = recommend(catalog, &split);

        let dimensions = catalog
            .dimensions()
            .iter()
            .enumerate()
            .map(|(index, dimension)| DimensionScore {
                key: dimension.key.clone(),
                label: dimension.label.clone(),
                score: totals.score(index),
                percentage: split.share(index).unwrap_or(0),
            })
            .collect();

        let share_query = to_query_string(&answers.restricted_to(catalog)).unwrap_or_else(|err| {
            warn!(error = %err, "unable to encode share query");
            String::new()
        });

        let total_questions = catalog.len();
        Self {
            dimensions,
            headline: recommendation.headline(),
            recommendation,
            answered: total_questions.saturating_sub(totals.unanswered),
            unanswered: totals.unanswered,
            total_questions,
            share_query,
            breakdown: breakdown(catalog, answers),
        }
    }

    pub fn dimension(&self, key: &str) -> Option<&DimensionScore> {
        self.dimensions.iter().find(|dimension| dimension.key == key)
    }

    pub fn percentage(&self, key: &str) -> Option<i32> {
        self.dimension(key).map(|dimension| dimension.percentage)
    }

    pub fn is_complete(&self) -> bool {
        self.unanswered == 0
    }
}
