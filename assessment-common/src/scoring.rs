//! Scoring engine
//!
//! Maps raw Typeform answers to per-answer scores, per-dimension aggregates,
//! a total score and a mastery level.
//!
//! Per-answer policy:
//! - `choice`: keyword scale on the lower-cased label (first match wins), then
//!   the label's position among the field's choices, then 50
//! - `number`: `value * 20`, clamped to 0..=100
//! - everything else (text, email, ...) is not scored
//!
//! Scoring never fails. Malformed input yields `Outcome::Degraded` carrying the
//! flat mid-range fallback (or the partial result when only some answers were
//! unusable).

use serde_json::Value;
use tracing::debug;

use crate::models::MasteryLevel;
use crate::outcome::Outcome;
use crate::questionnaire::Questionnaire;
use crate::typeform::{Answer, AnswerKind, FormResponse};

/// Score of a dimension with no answered questions
pub const EMPTY_DIMENSION_SCORE: f64 = 50.0;

/// Score of a choice answer that cannot be placed on the scale
pub const UNKNOWN_CHOICE_SCORE: f64 = 50.0;

/// Multiplier for 1–5 numeric answers
pub const NUMBER_SCALE_FACTOR: f64 = 20.0;

/// The 20..=100 ladder used for choice answers
const CHOICE_LADDER: [f64; 5] = [20.0, 40.0, 60.0, 80.0, 100.0];

/// Keyword → score, checked in order. Longer phrases precede their substrings.
const KEYWORD_SCALE: &[(&str, f64)] = &[
    ("strongly disagree", 20.0),
    ("disagree", 40.0),
    ("neutral", 60.0),
    ("strongly agree", 100.0),
    ("agree", 80.0),
    ("never", 20.0),
    ("rarely", 40.0),
    ("sometimes", 60.0),
    ("often", 80.0),
    ("always", 100.0),
];

/// Upper bound (inclusive), level, description, recommendation
const MASTERY_TABLE: &[(f64, u8, &str, &str)] = &[
    (
        20.0,
        1,
        "Basic: Early-stage knowledge of influencer marketing management",
        "Build fundamental skills in influencer selection, briefing and measurement",
    ),
    (
        40.0,
        2,
        "Developing: Growing capability in influencer marketing management",
        "Strengthen core capabilities through hands-on campaign experience",
    ),
    (
        60.0,
        3,
        "Competent: Solid foundation in influencer marketing",
        "Continue developing your skills in key dimensions",
    ),
    (
        80.0,
        4,
        "Advanced: High capability in influencer marketing management",
        "Focus on advanced analytics to reach expert level",
    ),
    (
        f64::INFINITY,
        5,
        "Expert: Excellence in influencer marketing management",
        "Innovate in the field and mentor other professionals",
    ),
];

/// Output of a scoring run
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringResult {
    pub dimension_scores: Vec<f64>,
    pub total_score: f64,
    pub mastery_level: MasteryLevel,
    /// Per-answer scores in answer order, before aggregation
    pub raw_scores: Vec<f64>,
}

impl ScoringResult {
    /// Build from dimension aggregates; total and level are derived here only
    pub fn from_dimension_scores(dimension_scores: Vec<f64>, raw_scores: Vec<f64>) -> Self {
        let total_score = mean(&dimension_scores);
        Self {
            mastery_level: classify(total_score),
            dimension_scores,
            total_score,
            raw_scores,
        }
    }

    /// Flat mid-range result used when the submission cannot be scored
    pub fn fallback(dimensions: usize) -> Self {
        Self::from_dimension_scores(vec![EMPTY_DIMENSION_SCORE; dimensions], Vec::new())
    }
}

/// Score a raw `form_response` JSON object
pub fn score(form_response: &Value, questionnaire: &Questionnaire) -> Outcome<ScoringResult> {
    match FormResponse::parse(form_response) {
        Ok(form) => score_form(&form, questionnaire),
        Err(e) => Outcome::degraded(
            ScoringResult::fallback(questionnaire.dimension_count()),
            e.to_string(),
        ),
    }
}

/// Score an already parsed form response
pub fn score_form(form: &FormResponse, questionnaire: &Questionnaire) -> Outcome<ScoringResult> {
    let (answers, answer_problems) = form.parse_answers();
    let mut problems = form.definition_problems.clone();
    problems.extend(answer_problems);

    let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); questionnaire.dimension_count()];
    let mut raw_scores = Vec::new();
    let mut ordinal = 0;

    for answer in &answers {
        let Some(value) = score_answer(answer, form) else {
            continue;
        };
        raw_scores.push(value);

        let dimension = match questionnaire
            .pinned_dimension(&answer.field.id, answer.field.reference.as_deref())
        {
            Some(pinned) => Some(pinned),
            None => {
                let assigned = questionnaire.sequential_dimension(ordinal);
                ordinal += 1;
                assigned
            }
        };

        match dimension.and_then(|d| buckets.get_mut(d)) {
            Some(bucket) => bucket.push(value),
            None => debug!(field = %answer.field.id, "Scored answer outside every dimension"),
        }
    }

    if raw_scores.is_empty() {
        let mut reason = "no scoreable answers".to_string();
        if !problems.is_empty() {
            reason = format!("{}; {}", reason, problems.join("; "));
        }
        return Outcome::degraded(ScoringResult::fallback(questionnaire.dimension_count()), reason);
    }

    let dimension_scores = buckets.iter().map(|b| aggregate(b)).collect();
    let result = ScoringResult::from_dimension_scores(dimension_scores, raw_scores);

    if problems.is_empty() {
        Outcome::Computed(result)
    } else {
        Outcome::degraded(
            result,
            format!("skipped {} malformed entr(ies): {}", problems.len(), problems.join("; ")),
        )
    }
}

/// Score of a single answer, or None for unscored answer types
pub fn score_answer(answer: &Answer, form: &FormResponse) -> Option<f64> {
    match answer.kind {
        AnswerKind::Choice => {
            let label = answer.choice.as_ref().and_then(|c| c.label.as_deref());
            Some(score_choice(label, form, &answer.field.id))
        }
        AnswerKind::Number => answer
            .number
            .filter(|n| n.is_finite())
            .map(|n| (n * NUMBER_SCALE_FACTOR).clamp(0.0, 100.0)),
        AnswerKind::Text | AnswerKind::Email | AnswerKind::Other => None,
    }
}

fn score_choice(label: Option<&str>, form: &FormResponse, field_id: &str) -> f64 {
    let Some(label) = label else {
        return UNKNOWN_CHOICE_SCORE;
    };

    if let Some(score) = keyword_score(label) {
        return score;
    }

    form.field(field_id)
        .and_then(|field| {
            field
                .choices
                .iter()
                .position(|c| c.label.trim().eq_ignore_ascii_case(label.trim()))
        })
        .map(|index| CHOICE_LADDER[index.min(CHOICE_LADDER.len() - 1)])
        .unwrap_or(UNKNOWN_CHOICE_SCORE)
}

/// Keyword-scale score for a choice label
pub fn keyword_score(label: &str) -> Option<f64> {
    let label = label.to_lowercase();
    KEYWORD_SCALE
        .iter()
        .find(|(keyword, _)| label.contains(keyword))
        .map(|(_, score)| *score)
}

/// Unweighted mean of a dimension's answers, 50 when empty
pub fn aggregate(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        EMPTY_DIMENSION_SCORE
    } else {
        mean(scores).clamp(0.0, 100.0)
    }
}

/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mastery level for a total score
///
/// Non-finite scores classify as Basic.
pub fn classify(total_score: f64) -> MasteryLevel {
    let score = if total_score.is_finite() { total_score } else { 0.0 };
    let (_, level, description, recommendations) = MASTERY_TABLE
        .iter()
        .find(|(upper, ..)| score <= *upper)
        .copied()
        .unwrap_or(MASTERY_TABLE[MASTERY_TABLE.len() - 1]);

    MasteryLevel {
        level,
        description: description.to_string(),
        recommendations: recommendations.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn choice(id: &str, label: &str) -> Value {
        json!({ "type": "choice", "field": { "id": id }, "choice": { "label": label } })
    }

    fn number(id: &str, n: f64) -> Value {
        json!({ "type": "number", "field": { "id": id }, "number": n })
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0.0).level, 1);
        assert_eq!(classify(20.0).level, 1);
        assert_eq!(classify(21.0).level, 2);
        assert_eq!(classify(40.0).level, 2);
        assert_eq!(classify(60.0).level, 3);
        assert_eq!(classify(60.5).level, 4);
        assert_eq!(classify(80.0).level, 4);
        assert_eq!(classify(81.0).level, 5);
        assert_eq!(classify(100.0).level, 5);
        assert_eq!(classify(f64::NAN).level, 1);
    }

    #[test]
    fn test_classify_is_monotonic() {
        let mut previous = 0;
        for step in 0..=1000 {
            let level = classify(step as f64 / 10.0).level;
            assert!(level >= previous, "level dropped at {}", step);
            previous = level;
        }
        assert_eq!(previous, 5);
    }

    #[test]
    fn test_seven_dimension_example() {
        let result = ScoringResult::from_dimension_scores(
            vec![74.0, 57.0, 68.0, 59.0, 38.0, 71.0, 85.0],
            Vec::new(),
        );
        assert!((result.total_score - 452.0 / 7.0).abs() < 1e-9);
        assert_eq!(round1(result.total_score), 64.6);
        assert_eq!(result.mastery_level.level, 4);
        assert!(result.mastery_level.description.starts_with("Advanced"));
    }

    #[test]
    fn test_keyword_scale() {
        assert_eq!(keyword_score("Never"), Some(20.0));
        assert_eq!(keyword_score("Almost always"), Some(100.0));
        assert_eq!(keyword_score("Strongly disagree"), Some(20.0));
        assert_eq!(keyword_score("Disagree"), Some(40.0));
        assert_eq!(keyword_score("Strongly Agree"), Some(100.0));
        assert_eq!(keyword_score("Agree"), Some(80.0));
        assert_eq!(keyword_score("Expert level"), None);
    }

    #[test]
    fn test_choice_position_fallback() {
        let form = FormResponse::parse(&json!({
            "answers": [choice("q1", "Level C"), choice("q2", "Whatever"), choice("q3", "Level F")],
            "definition": { "fields": [
                { "id": "q1", "title": "t", "choices": [
                    { "label": "Level A" }, { "label": "Level B" }, { "label": "Level C" }
                ]},
                { "id": "q3", "title": "t", "choices": [
                    { "label": "Level A" }, { "label": "Level B" }, { "label": "Level C" },
                    { "label": "Level D" }, { "label": "Level E" }, { "label": "Level F" }
                ]}
            ]}
        }))
        .unwrap();
        let (answers, _) = form.parse_answers();

        assert_eq!(score_answer(&answers[0], &form), Some(60.0));
        // No metadata for q2
        assert_eq!(score_answer(&answers[1], &form), Some(50.0));
        // Sixth position clamps to the top of the ladder
        assert_eq!(score_answer(&answers[2], &form), Some(100.0));
    }

    #[test]
    fn test_number_answers_scale_by_twenty() {
        let form = FormResponse::parse(&json!({
            "answers": [number("a", 1.0), number("b", 5.0), number("c", 9.0)]
        }))
        .unwrap();
        let (answers, _) = form.parse_answers();
        let scores: Vec<_> = answers.iter().filter_map(|a| score_answer(a, &form)).collect();
        assert_eq!(scores, vec![20.0, 100.0, 100.0]);
    }

    #[test]
    fn test_identity_answers_not_scored() {
        let payload = json!({
            "answers": [
                { "type": "text", "field": { "id": "n" }, "text": "Sam" },
                { "type": "email", "field": { "id": "e" }, "email": "sam@example.com" },
                choice("q1", "Always")
            ]
        });
        let outcome = score(&payload, &Questionnaire::default());
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.value().raw_scores, vec![100.0]);
    }

    #[test]
    fn test_dimension_aggregation_and_empty_default() {
        // First dimension: four answers, second: two answers, rest empty
        let payload = json!({
            "answers": [
                choice("a", "Never"), choice("b", "Always"), choice("c", "Often"), choice("d", "Sometimes"),
                number("e", 5.0), number("f", 3.0)
            ]
        });
        let q = Questionnaire::default();
        let result = score(&payload, &q).into_value();

        assert_eq!(result.dimension_scores.len(), 7);
        assert_eq!(result.dimension_scores[0], 65.0);
        assert_eq!(result.dimension_scores[1], 80.0);
        assert!(result.dimension_scores[2..].iter().all(|s| *s == EMPTY_DIMENSION_SCORE));
        assert!((result.total_score - mean(&result.dimension_scores)).abs() < 1e-9);
    }

    #[test]
    fn test_pinned_fields_do_not_shift_sequence() {
        let mut q = Questionnaire::default();
        q.field_map.insert("pinned".to_string(), 6);
        let payload = json!({
            "answers": [choice("pinned", "Never"), choice("a", "Always")]
        });
        let result = score(&payload, &q).into_value();

        assert_eq!(result.dimension_scores[0], 100.0);
        assert_eq!(result.dimension_scores[6], 20.0);
    }

    #[test]
    fn test_overflow_answers_kept_in_raw_scores() {
        let mut q = Questionnaire::default();
        q.questions_per_dimension = 1;
        q.dimensions.truncate(2);
        let payload = json!({
            "answers": [choice("a", "Never"), choice("b", "Never"), choice("c", "Always")]
        });
        let result = score(&payload, &q).into_value();

        assert_eq!(result.raw_scores.len(), 3);
        assert_eq!(result.dimension_scores, vec![20.0, 20.0]);
    }

    #[test]
    fn test_malformed_payload_degrades_to_flat_default() {
        let q = Questionnaire::default();
        for payload in [json!("nope"), json!({ "answers": "x" }), json!({})] {
            let outcome = score(&payload, &q);
            assert!(outcome.is_degraded());
            let result = outcome.value();
            assert_eq!(result.dimension_scores, vec![50.0; 7]);
            assert_eq!(result.total_score, 50.0);
            assert_eq!(result.mastery_level.level, 3);
            assert!(result.raw_scores.is_empty());
        }
    }

    #[test]
    fn test_empty_answers_degrade() {
        let outcome = score(&json!({ "answers": [] }), &Questionnaire::default());
        assert_eq!(outcome.reason(), Some("no scoreable answers"));
    }

    #[test]
    fn test_partial_malformed_answers_keep_scores() {
        let payload = json!({
            "answers": [choice("a", "Always"), { "type": "choice" }]
        });
        let outcome = score(&payload, &Questionnaire::default());
        assert!(outcome.is_degraded());
        assert!(outcome.reason().unwrap().contains("1 malformed"));
        assert_eq!(outcome.value().dimension_scores[0], 100.0);
    }

    #[test]
    fn test_malformed_definition_field_keeps_answer_scores() {
        let payload = json!({
            "token": "tok-def",
            "answers": [choice("a", "Always"), choice("b", "Always"), choice("c", "Always"), choice("d", "Always")],
            "definition": { "fields": [{ "title": "no id" }] }
        });
        let outcome = score(&payload, &Questionnaire::default());

        assert!(outcome.is_degraded());
        assert!(outcome.reason().unwrap().contains("definition field 0"));
        let result = outcome.value();
        assert_eq!(result.dimension_scores[0], 100.0);
        assert_eq!(result.raw_scores, vec![100.0; 4]);
    }

    #[test]
    fn test_dimension_scores_stay_in_range() {
        let answers: Vec<Value> = (0..28)
            .map(|i| number(&format!("q{}", i), (i % 7) as f64 - 1.0))
            .collect();
        let result = score(&json!({ "answers": answers }), &Questionnaire::default()).into_value();

        assert!(result.dimension_scores.iter().all(|s| (0.0..=100.0).contains(s)));
        assert!((result.total_score - mean(&result.dimension_scores)).abs() < 1e-9);
    }
}
