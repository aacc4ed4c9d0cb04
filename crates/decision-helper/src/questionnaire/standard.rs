use super::catalog::{AnswerOption, Dimension, Question, QuestionCatalog, WeightVector};

pub(crate) fn standard_catalog() -> QuestionCatalog {
    QuestionCatalog::from_parts_unchecked(standard_dimensions(), standard_questions())
}

fn standard_dimensions() -> Vec<Dimension> {
    vec![
        Dimension::new("rn", "React Native").with_abbreviation("RN"),
        Dimension::new("native", "Native"),
    ]
}

fn option(label: &str, value: &str, rn: f64, native: f64) -> AnswerOption {
    AnswerOption {
        label: label.to_string(),
        value: value.to_string(),
        weights: WeightVector::new(vec![rn, native]),
    }
}

fn question(id: &str, category: &str, text: &str, options: Vec<AnswerOption>) -> Question {
    Question {
        id: id.to_string(),
        text: text.to_string(),
        help: None,
        category: Some(category.to_string()),
        options,
    }
}

fn standard_questions() -> Vec<Question> {
    vec![
        question(
            "os_features",
            "Platform Requirements",
            "Will the app rely heavily on platform-specific OS features (e.g., NFC, Bluetooth LE, background services, CarPlay/Android Auto, widgets)?",
            vec![
                option("Yes, heavily", "yes", 0.0, 3.0),
                option("Somewhat", "somewhat", 0.0, 1.5),
                option("No", "no", 3.0, 0.0),
            ],
        ),
        question(
            "graphics_perf",
            "Performance & UI",
            "Do you need advanced 2D/3D graphics, AR/VR, or game-level performance?",
            vec![
                option("Yes", "yes", 0.0, 3.0),
                option("Maybe / unsure", "maybe", 0.0, 1.5),
                option("No", "no", 3.0, 0.0),
            ],
        ),
        question(
            "team_web_ts",
            "Team & Skills",
            "Do you already have web or TypeScript developers?",
            vec![
                option("Yes", "yes", 3.0, 0.0),
                option("Somewhat", "some", 1.5, 0.0),
                option("No", "no", 0.0, 1.0),
            ],
        ),
        question(
            "team_native",
            "Team & Skills",
            "Do you already have strong native iOS/Android developers?",
            vec![
                option("Yes", "yes", 0.0, 3.0),
                option("Somewhat", "some", 0.0, 1.5),
                option("No", "no", 1.0, 0.0),
            ],
        ),
        question(
            "budget",
            "Resourcing",
            "Are budget and hiring costs constrained (vs. funding two separate native teams)?",
            vec![
                option("Yes, constrained", "yes", 2.0, 0.0),
                option("Somewhat", "some", 1.0, 0.5),
                option("No", "no", 0.0, 1.5),
            ],
        ),
        question(
            "sdk_availability",
            "Dependencies",
            "Do you depend on third-party SDKs that are only available natively?",
            vec![
                option("Yes", "yes", 0.0, 3.0),
                option("Maybe", "maybe", 0.0, 1.5),
                option("No", "no", 1.0, 0.0),
            ],
        ),
    ]
}
