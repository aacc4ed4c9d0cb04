//! Weighted questionnaire: catalog, scoring, and the shareable answer-set codec.

mod answers;
mod catalog;
pub mod codec;
pub mod document;
mod report;
pub mod scoring;
mod session;
mod standard;

pub use answers::AnswerSet;
pub use catalog::{
    AnswerOption, CatalogError, CategoryGroup, Dimension, Question, QuestionCatalog, WeightVector,
};
pub use codec::{decode, encode, parse_query, share_link, to_query_string, CodecError, ParameterSource};
pub use document::CatalogDocument;
pub use report::{Assessment, DimensionScore};
pub use scoring::{
    aggregate, breakdown, normalize, recommend, ContributionStatus, PercentageSplit,
    QuestionContribution, Recommendation, Totals,
};
pub use session::{Progress, ProgressPhase, QuestionnaireSession, SelectionError};
