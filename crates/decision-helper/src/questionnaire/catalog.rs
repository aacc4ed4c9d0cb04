use super::document::{CatalogDocument, DimensionDocument, OptionDocument, QuestionDocument};
use super::standard::standard_catalog;
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

/// Named axis that option weights contribute to (e.g. "React Native").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub key: String,
    pub label: String,
    pub abbreviation: Option<String>,
}

impl Dimension {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            abbreviation: None,
        }
    }

    pub fn with_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.abbreviation = Some(abbreviation.into());
        self
    }

    /// Compact name used for per-option weight hints.
    pub fn short_label(&self) -> &str {
        self.abbreviation.as_deref().unwrap_or(&self.label)
    }
}

/// Per-option contribution, one component per catalog dimension in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    pub fn new(components: Vec<f64>) -> Self {
        Self(components)
    }

    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    pub fn components(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn component(&self, index: usize) -> f64 {
        self.0.get(index).copied().unwrap_or(0.0)
    }

    pub fn accumulate_into(&self, totals: &mut [f64]) {
        for (total, weight) in totals.iter_mut().zip(&self.0) {
            *total += weight;
        }
    }
}

impl From<Vec<f64>> for WeightVector {
    fn from(value: Vec<f64>) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOption {
    pub label: String,
    pub value: String,
    pub weights: WeightVector,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub help: Option<String>,
    pub category: Option<String>,
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Lenient token lookup; the first option carrying `token` wins.
    pub fn option(&self, token: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.value == token)
    }

    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }
}

pub(crate) const DEFAULT_CATEGORY: &str = "Question";

/// Questions that share a display category, numbered by catalog position.
#[derive(Debug, Clone)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub questions: Vec<(usize, &'a Question)>,
}

/// Immutable, ordered set of questions plus the dimensions their weights target.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionCatalog {
    dimensions: Vec<Dimension>,
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Builds a catalog, enforcing the structural invariants that scoring relies on.
    ///
    /// Option tokens are not checked for uniqueness within a question.
    pub fn new(dimensions: Vec<Dimension>, questions: Vec<Question>) -> Result<Self, CatalogError> {
        if dimensions.is_empty() {
            return Err(CatalogError::NoDimensions);
        }

        let mut dimension_keys = HashSet::new();
        for dimension in &dimensions {
            if !dimension_keys.insert(dimension.key.as_str()) {
                return Err(CatalogError::DuplicateDimension(dimension.key.clone()));
            }
        }

        if questions.is_empty() {
            return Err(CatalogError::NoQuestions);
        }

        let mut question_ids = HashSet::new();
        for question in &questions {
            if !question_ids.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }

            for option in &question.options {
                if option.weights.len() != dimensions.len() {
                    return Err(CatalogError::WeightArity {
                        question: question.id.clone(),
                        option: option.value.clone(),
                        expected: dimensions.len(),
                        found: option.weights.len(),
                    });
                }
            }
        }

        Ok(Self {
            dimensions,
            questions,
        })
    }

    /// The reference React Native vs. Native questionnaire.
    pub fn standard() -> Self {
        standard_catalog()
    }

    pub(crate) fn from_parts_unchecked(dimensions: Vec<Dimension>, questions: Vec<Question>) -> Self {
        Self {
            dimensions,
            questions,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::from_document(document)
    }

    pub fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let dimensions: Vec<Dimension> = document
            .dimensions
            .into_iter()
            .map(|dimension| Dimension {
                key: dimension.key,
                label: dimension.label,
                abbreviation: dimension.abbreviation,
            })
            .collect();

        let mut questions = Vec::with_capacity(document.questions.len());
        for question in document.questions {
            let mut options = Vec::with_capacity(question.options.len());
            for option in question.options {
                let weights = resolve_weights(&dimensions, &question.id, &option)?;
                options.push(AnswerOption {
                    label: option.label,
                    value: option.value,
                    weights,
                });
            }

            questions.push(Question {
                id: question.id,
                text: question.text,
                help: question.help,
                category: question.category,
                options,
            });
        }

        Self::new(dimensions, questions)
    }

    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            dimensions: self
                .dimensions
                .iter()
                .map(|dimension| DimensionDocument {
                    key: dimension.key.clone(),
                    label: dimension.label.clone(),
                    abbreviation: dimension.abbreviation.clone(),
                })
                .collect(),
            questions: self
                .questions
                .iter()
                .map(|question| QuestionDocument {
                    id: question.id.clone(),
                    text: question.text.clone(),
                    help: question.help.clone(),
                    category: question.category.clone(),
                    options: question
                        .options
                        .iter()
                        .map(|option| OptionDocument {
                            label: option.label.clone(),
                            value: option.value.clone(),
                            weights: self
                                .dimensions
                                .iter()
                                .enumerate()
                                .map(|(index, dimension)| {
                                    (dimension.key.clone(), option.weights.component(index))
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension(&self, key: &str) -> Option<(usize, &Dimension)> {
        self.dimensions
            .iter()
            .enumerate()
            .find(|(_, dimension)| dimension.key == key)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Groups questions by category in order of first appearance, keeping
    /// their 1-based catalog numbering.
    pub fn grouped_by_category(&self) -> Vec<CategoryGroup<'_>> {
        let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
        for (index, question) in self.questions.iter().enumerate() {
            let category = question.category_label();
            match groups.iter_mut().find(|group| group.category == category) {
                Some(group) => group.questions.push((index + 1, question)),
                None => groups.push(CategoryGroup {
                    category,
                    questions: vec![(index + 1, question)],
                }),
            }
        }
        groups
    }
}

fn resolve_weights(
    dimensions: &[Dimension],
    question_id: &str,
    option: &OptionDocument,
) -> Result<WeightVector, CatalogError> {
    if let Some(unknown) = option
        .weights
        .keys()
        .find(|key| !dimensions.iter().any(|dimension| &dimension.key == *key))
    {
        return Err(CatalogError::UnknownDimension {
            question: question_id.to_string(),
            option: option.value.clone(),
            dimension: unknown.clone(),
        });
    }

    Ok(weights_in_dimension_order(dimensions, &option.weights))
}

fn weights_in_dimension_order(
    dimensions: &[Dimension],
    weights: &BTreeMap<String, f64>,
) -> WeightVector {
    dimensions
        .iter()
        .map(|dimension| weights.get(&dimension.key).copied().unwrap_or(0.0))
        .collect::<Vec<_>>()
        .into()
}

/// Reasons a catalog document or hand-built catalog is rejected.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog must declare at least one dimension")]
    NoDimensions,
    #[error("dimension '{0}' is declared more than once")]
    DuplicateDimension(String),
    #[error("catalog must contain at least one question")]
    NoQuestions,
    #[error("question id '{0}' is used more than once")]
    DuplicateQuestion(String),
    #[error("option '{option}' of question '{question}' weights unknown dimension '{dimension}'")]
    UnknownDimension {
        question: String,
        option: String,
        dimension: String,
    },
    #[error(
        "option '{option}' of question '{question}' has {found} weight(s), expected {expected}"
    )]
    WeightArity {
        question: String,
        option: String,
        expected: usize,
        found: usize,
    },
}
