use super::answers::AnswerSet;
use super::catalog::QuestionCatalog;
use serde::Serialize;
use tracing::debug;

/// Per-dimension weight sums plus the number of unanswered questions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub scores: Vec<f64>,
    pub unanswered: usize,
}

impl Totals {
    pub fn score(&self, index: usize) -> f64 {
        self.scores.get(index).copied().unwrap_or(0.0)
    }

    /// Combined weight across every dimension.
    pub fn base(&self) -> f64 {
        self.scores.iter().sum()
    }
}

/// Integer shares per dimension; always sums to exactly 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PercentageSplit {
    shares: Vec<i32>,
    even: bool,
}

impl PercentageSplit {
    /// True when the split came from a zero or negative base rather than from weights.
    pub fn is_even(&self) -> bool {
        self.even
    }

    pub fn shares(&self) -> &[i32] {
        &self.shares
    }

    pub fn share(&self, index: usize) -> Option<i32> {
        self.shares.get(index).copied()
    }

    pub fn total(&self) -> i32 {
        self.shares.iter().sum()
    }
}

/// Reduces `answers` against `catalog`.
///
/// Unanswered questions are counted. A token that matches none of the
/// question's options is skipped: it adds no weight and is not counted as
/// unanswered.
pub fn aggregate(catalog: &QuestionCatalog, answers: &AnswerSet) -> Totals {
    let mut scores = vec![0.0; catalog.dimensions().len()];
    let mut unanswered = 0;

    for question in catalog.questions() {
        let Some(token) = answers.answer(&question.id) else {
            unanswered += 1;
            continue;
        };

        match question.option(token) {
            Some(option) => option.weights.accumulate_into(&mut scores),
            None => debug!(question = %question.id, token, "ignoring answer with no matching option"),
        }
    }

    Totals { scores, unanswered }
}

/// Converts totals into integer percentages.
///
/// Every dimension but the last is rounded half-up; the last absorbs the
/// remainder. A combined base of zero or less yields an even split.
///
/// Signed weights can cancel into a tiny base and blow shares far past
/// 100. Leading shares are clamped to `±share_limit(n)` so the remainder
/// always fits in an `i32` and the split still sums to 100.
pub fn normalize(totals: &Totals) -> PercentageSplit {
    let Some((_, leading)) = totals.scores.split_last() else {
        return PercentageSplit {
            shares: Vec::new(),
            even: true,
        };
    };

    let base = totals.base();
    let even = !(base > 0.0 && base.is_finite());
    let mut shares: Vec<i32> = if even {
        let share = i32::try_from(100 / totals.scores.len()).unwrap_or(0);
        vec![share; leading.len()]
    } else {
        let limit = share_limit(totals.scores.len());
        leading
            .iter()
            .map(|score| round_half_up(score / base * 100.0, limit))
            .collect()
    };

    let assigned: i64 = shares.iter().map(|share| i64::from(*share)).sum();
    let remainder = i32::try_from(100 - assigned).unwrap_or(if assigned > 0 {
        i32::MIN
    } else {
        i32::MAX
    });
    shares.push(remainder);
    PercentageSplit { shares, even }
}

/// Largest magnitude a leading share may take when splitting across
/// `dimensions`; keeps `100 - sum(leading)` inside `i32`.
fn share_limit(dimensions: usize) -> i32 {
    let dimensions = i64::try_from(dimensions.max(1)).unwrap_or(i64::MAX);
    let limit = (i64::from(i32::MAX) - 100) / dimensions;
    i32::try_from(limit).unwrap_or(i32::MAX)
}

fn round_half_up(value: f64, limit: i32) -> i32 {
    let limit = f64::from(limit);
    (value + 0.5).floor().clamp(-limit, limit) as i32
}

/// Final verdict derived from a percentage split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Recommendation {
    Favors { key: String, label: String },
    Tie,
}

impl Recommendation {
    pub fn label(&self) -> &str {
        match self {
            Recommendation::Favors { label, .. } => label,
            Recommendation::Tie => "Tie",
        }
    }

    pub fn headline(&self) -> String {
        match self {
            Recommendation::Favors { label, .. } => format!("{label} looks like a better fit."),
            Recommendation::Tie => "It's a tie.".to_string(),
        }
    }

    pub fn is_tie(&self) -> bool {
        matches!(self, Recommendation::Tie)
    }
}

/// A strictly highest share wins; equality at the top is a tie.
///
/// An even split is always a tie, even when the remainder leaves the last
/// dimension a point ahead.
pub fn recommend(catalog: &QuestionCatalog, split: &PercentageSplit) -> Recommendation {
    if split.even {
        return Recommendation::Tie;
    }

    let Some(&highest) = split.shares.iter().max() else {
        return Recommendation::Tie;
    };

    let mut leaders = split
        .shares
        .iter()
        .enumerate()
        .filter(|(_, share)| **share == highest);

    match (leaders.next(), leaders.next()) {
        (Some((index, _)), None) => match catalog.dimensions().get(index) {
            Some(dimension) => Recommendation::Favors {
                key: dimension.key.clone(),
                label: dimension.label.clone(),
            },
            None => Recommendation::Tie,
        },
        _ => Recommendation::Tie,
    }
}

/// How a single question fed into the totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ContributionStatus {
    Answered {
        value: String,
        label: String,
        weights: Vec<f64>,
    },
    Unanswered,
    Stale {
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionContribution {
    pub number: usize,
    pub question_id: String,
    pub category: Option<String>,
    #[serde(flatten)]
    pub status: ContributionStatus,
}

/// Per-question view of [`aggregate`], in catalog order.
pub fn breakdown(catalog: &QuestionCatalog, answers: &AnswerSet) -> Vec<QuestionContribution> {
    catalog
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let status = match answers.answer(&question.id) {
                None => ContributionStatus::Unanswered,
                Some(token) => match question.option(token) {
                    Some(option) => ContributionStatus::Answered {
                        value: option.value.clone(),
                        label: option.label.clone(),
                        weights: option.weights.components().to_vec(),
                    },
                    None => ContributionStatus::Stale {
                        value: token.to_string(),
                    },
                },
            };

            QuestionContribution {
                number: index + 1,
                question_id: question.id.clone(),
                category: question.category.clone(),
                status,
            }
        })
        .collect()
}
