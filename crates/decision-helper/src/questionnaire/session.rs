use super::answers::AnswerSet;
use super::catalog::QuestionCatalog;
use super::codec::{decode, parse_query, CodecError, ParameterSource};
use super::report::Assessment;
use super::scoring::{aggregate, Totals};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Answer state for one person working through a catalog.
#[derive(Debug, Clone)]
pub struct QuestionnaireSession {
    catalog: Arc<QuestionCatalog>,
    answers: AnswerSet,
    submitted: bool,
}

impl QuestionnaireSession {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            catalog,
            answers: AnswerSet::new(),
            submitted: false,
        }
    }

    /// Seeds the session from shared link parameters.
    pub fn from_parameters<P: ParameterSource + ?Sized>(
        catalog: Arc<QuestionCatalog>,
        source: &P,
    ) -> Self {
        let answers = decode(source, &catalog);
        debug!(seeded = answers.len(), "seeded questionnaire from parameters");
        Self {
            catalog,
            answers,
            submitted: false,
        }
    }

    pub fn from_query(catalog: Arc<QuestionCatalog>, raw_query: &str) -> Result<Self, CodecError> {
        let params = parse_query(raw_query)?;
        Ok(Self::from_parameters(catalog, params.as_slice()))
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Records a selection; both the question and the option must exist.
    pub fn select(&mut self, question_id: &str, token: &str) -> Result<(), SelectionError> {
        let question = self
            .catalog
            .question(question_id)
            .ok_or_else(|| SelectionError::UnknownQuestion(question_id.to_string()))?;

        if question.option(token).is_none() {
            return Err(SelectionError::UnknownOption {
                question: question_id.to_string(),
                value: token.to_string(),
            });
        }

        self.answers.set(question_id, token);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.answers.clear();
        self.submitted = false;
    }

    pub fn totals(&self) -> Totals {
        aggregate(&self.catalog, &self.answers)
    }

    pub fn progress(&self) -> Progress {
        let totals = self.totals();
        let total = self.catalog.len();
        let answered = total.saturating_sub(totals.unanswered);
        let phase = if self.submitted {
            ProgressPhase::Submitted
        } else if totals.unanswered == 0 {
            ProgressPhase::Ready
        } else {
            ProgressPhase::Incomplete
        };

        Progress {
            answered,
            total,
            phase,
        }
    }

    pub fn assessment(&self) -> Assessment {
        Assessment::evaluate(&self.catalog, &self.answers)
    }

    /// Marks the questionnaire submitted once every question has an answer.
    /// Resubmitting after further changes is allowed.
    pub fn submit(&mut self) -> Result<(), SelectionError> {
        let unanswered = self.totals().unanswered;
        if unanswered > 0 {
            return Err(SelectionError::Incomplete { unanswered });
        }

        self.submitted = true;
        info!(answers = self.answers.len(), "questionnaire submitted");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressPhase {
    Incomplete,
    Ready,
    Submitted,
}

impl ProgressPhase {
    pub fn hint(self) -> &'static str {
        match self {
            ProgressPhase::Incomplete => "Answer remaining questions to enable submit.",
            ProgressPhase::Ready => "Ready to submit.",
            ProgressPhase::Submitted => "You can still adjust answers.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    pub phase: ProgressPhase,
}

impl Progress {
    pub fn all_answered(&self) -> bool {
        self.answered == self.total
    }

    pub fn summary(&self) -> String {
        format!(
            "{}/{} answered · {}",
            self.answered,
            self.total,
            self.phase.hint()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("unknown question '{0}'")]
    UnknownQuestion(String),
    #[error("'{value}' is not an option for question '{question}'")]
    UnknownOption { question: String, value: String },
    #[error("{unanswered} question(s) still need an answer")]
    Incomplete { unanswered: usize },
}
