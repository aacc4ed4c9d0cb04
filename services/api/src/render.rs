use crate::infra::{load_catalog, parse_assignment};
use clap::Args;
use decision_helper::config::AppConfig;
use decision_helper::error::AppError;
use decision_helper::questionnaire::{
    share_link, Assessment, ContributionStatus, Question, QuestionCatalog, QuestionnaireSession,
};
use std::path::PathBuf;

const BAR_WIDTH: usize = 40;
const BAR_GLYPHS: [char; 4] = ['#', '=', '*', '+'];

#[derive(Args, Debug, Default)]
pub(crate) struct AssessArgs {
    /// Answer in QUESTION=VALUE form; may be repeated and overrides --query
    #[arg(long = "answer", value_parser = parse_assignment)]
    pub(crate) answers: Vec<(String, String)>,
    /// Query string from a shared link (e.g. "os_features=yes&budget=no")
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Require every question to be answered before scoring
    #[arg(long)]
    pub(crate) submit: bool,
    /// Print the assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct LinkArgs {
    /// Answer in QUESTION=VALUE form; may be repeated
    #[arg(long = "answer", value_parser = parse_assignment)]
    pub(crate) answers: Vec<(String, String)>,
    /// Page the query string is appended to (defaults to APP_SHARE_BASE_URL)
    #[arg(long)]
    pub(crate) base_url: Option<String>,
}

pub(crate) fn run_questions(catalog_path: Option<PathBuf>) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = load_catalog(&config, catalog_path)?;

    for line in question_listing(&catalog) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_assess(args: AssessArgs, catalog_path: Option<PathBuf>) -> Result<(), AppError> {
    let AssessArgs {
        answers,
        query,
        submit,
        json,
    } = args;

    let config = AppConfig::load()?;
    let catalog = load_catalog(&config, catalog_path)?;

    let mut session = match query {
        Some(raw) => QuestionnaireSession::from_query(catalog, &raw)?,
        None => QuestionnaireSession::new(catalog),
    };
    for (question_id, token) in &answers {
        session.select(question_id, token)?;
    }
    if submit {
        session.submit()?;
    }

    let assessment = session.assessment();
    if json {
        match serde_json::to_string_pretty(&assessment) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("Assessment payload unavailable: {}", err),
        }
        return Ok(());
    }

    for line in assessment_report(session.catalog(), &assessment) {
        println!("{line}");
    }
    println!("\n{}", session.progress().summary());
    if let Some(base_url) = &config.catalog.share_base_url {
        println!("Share: {}", share_link(base_url, session.answers())?);
    } else if !assessment.share_query.is_empty() {
        println!("Share query: ?{}", assessment.share_query);
    }

    Ok(())
}

pub(crate) fn run_link(args: LinkArgs, catalog_path: Option<PathBuf>) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = load_catalog(&config, catalog_path)?;

    let mut session = QuestionnaireSession::new(catalog);
    for (question_id, token) in &args.answers {
        session.select(question_id, token)?;
    }

    let base_url = args
        .base_url
        .or_else(|| config.catalog.share_base_url.clone())
        .unwrap_or_default();
    println!("{}", share_link(&base_url, session.answers())?);
    Ok(())
}

pub(crate) fn question_listing(catalog: &QuestionCatalog) -> Vec<String> {
    let mut lines = Vec::new();
    for group in catalog.grouped_by_category() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(group.category.to_uppercase());
        for (number, question) in group.questions {
            lines.push(format!("{}. {}", number, question.text));
            if let Some(help) = &question.help {
                lines.push(format!("   {}", help));
            }
            lines.push(format!("   [{}]", question.id));
            for option in &question.options {
                lines.push(format!(
                    "   - {} ({}): {}",
                    option.label,
                    option.value,
                    weight_hint(catalog, option.weights.components())
                ));
            }
        }
    }
    lines
}

/// "RN 0 · Native 3" style hint for one option.
pub(crate) fn weight_hint(catalog: &QuestionCatalog, weights: &[f64]) -> String {
    catalog
        .dimensions()
        .iter()
        .zip(weights)
        .map(|(dimension, weight)| format!("{} {}", dimension.short_label(), weight))
        .collect::<Vec<_>>()
        .join(" · ")
}

pub(crate) fn split_bar(percentages: &[i32], width: usize) -> String {
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    let mut filled = 0;
    for (index, percentage) in percentages.iter().enumerate() {
        let cells = if index + 1 == percentages.len() {
            width.saturating_sub(filled)
        } else {
            let clamped = (*percentage).clamp(0, 100) as usize;
            (clamped * width / 100).min(width.saturating_sub(filled))
        };
        let glyph = BAR_GLYPHS[index % BAR_GLYPHS.len()];
        bar.extend(std::iter::repeat(glyph).take(cells));
        filled += cells;
    }
    bar.push(']');
    bar
}

pub(crate) fn assessment_report(catalog: &QuestionCatalog, assessment: &Assessment) -> Vec<String> {
    let mut lines = vec![
        "Current recommendation".to_string(),
        assessment.headline.clone(),
        assessment
            .dimensions
            .iter()
            .map(|dimension| format!("{} score: {:.1}", dimension.label, dimension.score))
            .collect::<Vec<_>>()
            .join(" · "),
    ];

    let percentages: Vec<i32> = assessment
        .dimensions
        .iter()
        .map(|dimension| dimension.percentage)
        .collect();
    lines.push(split_bar(&percentages, BAR_WIDTH));
    lines.push(
        assessment
            .dimensions
            .iter()
            .enumerate()
            .map(|(index, dimension)| {
                format!(
                    "{} {}: {}%",
                    BAR_GLYPHS[index % BAR_GLYPHS.len()],
                    dimension.label,
                    dimension.percentage
                )
            })
            .collect::<Vec<_>>()
            .join("   "),
    );

    lines.push(String::new());
    lines.push("Answers".to_string());
    for row in &assessment.breakdown {
        let text = catalog
            .question(&row.question_id)
            .map(question_summary)
            .unwrap_or_else(|| row.question_id.clone());
        let detail = match &row.status {
            ContributionStatus::Answered { label, weights, .. } => {
                format!("{} ({})", label, weight_hint(catalog, weights))
            }
            ContributionStatus::Unanswered => "unanswered".to_string(),
            ContributionStatus::Stale { value } => {
                format!("'{}' is no longer an option; ignored", value)
            }
        };
        lines.push(format!("  {}. {} -> {}", row.number, text, detail));
    }

    lines
}

fn question_summary(question: &Question) -> String {
    const LIMIT: usize = 60;
    if question.text.chars().count() <= LIMIT {
        return question.text.clone();
    }
    let truncated: String = question.text.chars().take(LIMIT - 1).collect();
    format!("{}…", truncated.trim_end())
}
