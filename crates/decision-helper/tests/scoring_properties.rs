//! Property-based tests for the scoring engine and answer codec.

use proptest::prelude::*;

use decision_helper::questionnaire::{
    aggregate, decode, encode, normalize, parse_query, recommend, to_query_string, AnswerSet,
    QuestionCatalog, Totals,
};

/// Strategy: for each standard question, either skip it or pick one of its tokens.
fn valid_answers() -> impl Strategy<Value = AnswerSet> {
    let catalog = QuestionCatalog::standard();
    let per_question: Vec<_> = catalog
        .questions()
        .iter()
        .map(|question| {
            let id = question.id.clone();
            let tokens: Vec<String> = question.options.iter().map(|o| o.value.clone()).collect();
            proptest::option::of(proptest::sample::select(tokens))
                .prop_map(move |token| token.map(|token| (id.clone(), token)))
        })
        .collect();

    per_question.prop_map(|entries| entries.into_iter().flatten().collect())
}

/// Strategy: every standard question answered with a valid token.
fn complete_answers() -> impl Strategy<Value = AnswerSet> {
    let catalog = QuestionCatalog::standard();
    let per_question: Vec<_> = catalog
        .questions()
        .iter()
        .map(|question| {
            let id = question.id.clone();
            let tokens: Vec<String> = question.options.iter().map(|o| o.value.clone()).collect();
            proptest::sample::select(tokens).prop_map(move |token| (id.clone(), token))
        })
        .collect();

    per_question.prop_map(|entries| entries.into_iter().collect())
}

/// Strategy: everyday weight sums mixed with magnitudes far past any catalog.
fn score() -> impl Strategy<Value = f64> {
    prop_oneof![-50.0..50.0f64, -1e12..1e12f64]
}

fn totals_strategy(
    dimensions: impl Into<prop::collection::SizeRange>,
) -> impl Strategy<Value = Totals> {
    prop::collection::vec(score(), dimensions).prop_map(|scores| Totals {
        scores,
        unanswered: 0,
    })
}

/// Strategy: signed totals whose last component nearly cancels the rest.
fn cancelling_totals() -> impl Strategy<Value = Totals> {
    (prop::collection::vec(score(), 1..6), 1e-6..1.0f64).prop_map(|(mut scores, slack)| {
        let sum: f64 = scores.iter().sum();
        scores.push(slack - sum);
        Totals {
            scores,
            unanswered: 0,
        }
    })
}

proptest! {
    // 1. Complete valid answers always split into exactly 100
    #[test]
    fn complete_answers_split_sums_to_100(answers in complete_answers()) {
        let catalog = QuestionCatalog::standard();
        let totals = aggregate(&catalog, &answers);
        prop_assert_eq!(totals.unanswered, 0);
        let split = normalize(&totals);
        prop_assert_eq!(split.shares().len(), 2);
        prop_assert_eq!(split.total(), 100);
    }

    // 2. Any totals, any dimension count: still 100
    #[test]
    fn normalize_always_sums_to_100(totals in totals_strategy(1..6)) {
        let split = normalize(&totals);
        prop_assert_eq!(split.shares().len(), totals.scores.len());
        prop_assert_eq!(split.total(), 100);
    }

    // 2b. A tiny positive base from cancelling signs must not overflow
    #[test]
    fn cancelling_totals_still_sum_to_100(totals in cancelling_totals()) {
        let split = normalize(&totals);
        prop_assert_eq!(split.shares().len(), totals.scores.len());
        prop_assert_eq!(split.total(), 100);
    }

    // 3. Non-negative totals give shares within 0..=100
    #[test]
    fn non_negative_totals_stay_in_range(totals in totals_strategy(2)) {
        let totals = Totals {
            scores: totals.scores.iter().map(|s| s.abs()).collect(),
            unanswered: 0,
        };
        let split = normalize(&totals);
        prop_assert!(split.shares().iter().all(|share| (0..=100).contains(share)));
    }

    // 4. Unanswered count matches the questions left out
    #[test]
    fn unanswered_counts_missing_questions(answers in valid_answers()) {
        let catalog = QuestionCatalog::standard();
        let totals = aggregate(&catalog, &answers);
        prop_assert_eq!(totals.unanswered, catalog.len() - answers.len());
    }

    // 5. decode(encode(A)) == A
    #[test]
    fn codec_round_trip(answers in valid_answers()) {
        let catalog = QuestionCatalog::standard();
        prop_assert_eq!(decode(&encode(&answers), &catalog), answers.clone());

        let query = to_query_string(&answers).expect("encodes");
        let params = parse_query(&query).expect("parses");
        prop_assert_eq!(decode(&params, &catalog), answers);
    }

    // 6. A stale token on top of valid answers changes nothing but the answered count
    #[test]
    fn stale_token_is_skipped(answers in valid_answers(), stale in "[a-z]{12}") {
        let catalog = QuestionCatalog::standard();
        let mut with_stale = answers.clone();
        with_stale.set("os_features", stale);
        let mut without = answers;
        without.remove("os_features");

        let skipped = aggregate(&catalog, &with_stale);
        let baseline = aggregate(&catalog, &without);
        prop_assert_eq!(&skipped.scores, &baseline.scores);
        prop_assert_eq!(skipped.unanswered + 1, baseline.unanswered);
    }

    // 7. Equal totals are always a tie
    #[test]
    fn equal_totals_tie(score in 0.0..100.0f64) {
        let catalog = QuestionCatalog::standard();
        let split = normalize(&Totals { scores: vec![score, score], unanswered: 0 });
        prop_assert!(recommend(&catalog, &split).is_tie());
    }
}
