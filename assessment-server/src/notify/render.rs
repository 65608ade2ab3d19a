//! HTML rendering of the reviewer summary
//!
//! The body is a Tera template with HTML autoescaping, so submission and
//! questionnaire text is escaped on interpolation.

use assessment_common::recommendations::{dimensions_with, standing, Standing};
use assessment_common::scoring::round1;
use assessment_common::{AssessmentResult, Error, Questionnaire, Result};
use serde::Serialize;
use tera::{Context, Tera};

/// Interview questions suggested per strong or weak dimension
pub const QUESTIONS_PER_DIMENSION: usize = 2;

const STRENGTH_COLOR: &str = "#2e7d32";
const WEAKNESS_COLOR: &str = "#e65100";
const NEUTRAL_COLOR: &str = "#333333";

const SUMMARY_TEMPLATE_NAME: &str = "summary.html";
const SUMMARY_TEMPLATE: &str = include_str!("../../templates/summary.html");

pub fn subject(result: &AssessmentResult) -> String {
    let name = if result.user_name.trim().is_empty() {
        "Anonymous candidate"
    } else {
        result.user_name.trim()
    };
    format!(
        "New assessment: {} ({} / 100, level {})",
        name,
        round1(result.total_score),
        result.mastery_level.level
    )
}

/// Interview questions for the strong and weak dimensions, in dimension order
///
/// Returns `(dimension name, question)` pairs; strengths first.
pub fn select_interview_questions(
    dimension_scores: &[f64],
    questionnaire: &Questionnaire,
) -> Vec<(String, String)> {
    let mut selected = Vec::new();

    for index in dimensions_with(dimension_scores, Standing::Strength) {
        if let Some(dimension) = questionnaire.dimensions.get(index) {
            for question in dimension.strength_questions.iter().take(QUESTIONS_PER_DIMENSION) {
                selected.push((dimension.name.clone(), question.clone()));
            }
        }
    }

    for index in dimensions_with(dimension_scores, Standing::Weakness) {
        if let Some(dimension) = questionnaire.dimensions.get(index) {
            for question in dimension.weakness_questions.iter().take(QUESTIONS_PER_DIMENSION) {
                selected.push((dimension.name.clone(), question.clone()));
            }
        }
    }

    selected
}

#[derive(Serialize)]
struct DimensionRow {
    name: String,
    color: &'static str,
    score: String,
}

#[derive(Serialize)]
struct QuestionRow {
    dimension: String,
    question: String,
}

#[derive(Serialize)]
struct SummaryContext<'a> {
    candidate: &'a str,
    email: &'a str,
    response_id: &'a str,
    total_score: String,
    level: u8,
    level_description: &'a str,
    level_recommendations: &'a str,
    dimensions: Vec<DimensionRow>,
    strengths: Vec<String>,
    weaknesses: Vec<String>,
    questions: Vec<QuestionRow>,
    results_url: &'a str,
}

/// Full HTML body of the summary email
pub fn summary_html(
    result: &AssessmentResult,
    questionnaire: &Questionnaire,
    results_url: &str,
) -> Result<String> {
    let dimensions = result
        .dimension_scores
        .iter()
        .enumerate()
        .map(|(index, score)| DimensionRow {
            name: questionnaire.dimension_name(index),
            color: match standing(*score) {
                Standing::Strength => STRENGTH_COLOR,
                Standing::Weakness => WEAKNESS_COLOR,
                Standing::Neutral => NEUTRAL_COLOR,
            },
            score: round1(*score).to_string(),
        })
        .collect();

    let names = |wanted: Standing| -> Vec<String> {
        dimensions_with(&result.dimension_scores, wanted)
            .into_iter()
            .map(|index| questionnaire.dimension_name(index))
            .collect()
    };

    let questions = select_interview_questions(&result.dimension_scores, questionnaire)
        .into_iter()
        .map(|(dimension, question)| QuestionRow { dimension, question })
        .collect();

    let summary = SummaryContext {
        candidate: or_placeholder(&result.user_name, "Not provided"),
        email: or_placeholder(&result.user_email, "Not provided"),
        response_id: &result.response_id,
        total_score: round1(result.total_score).to_string(),
        level: result.mastery_level.level,
        level_description: &result.mastery_level.description,
        level_recommendations: &result.mastery_level.recommendations,
        dimensions,
        strengths: names(Standing::Strength),
        weaknesses: names(Standing::Weakness),
        questions,
        results_url,
    };

    // The .html suffix turns on autoescaping for every interpolated value
    let mut tera = Tera::default();
    tera.add_raw_template(SUMMARY_TEMPLATE_NAME, SUMMARY_TEMPLATE)
        .map_err(|e| Error::Internal(format!("Summary template parse failed: {}", e)))?;

    let context = Context::from_serialize(&summary)
        .map_err(|e| Error::Internal(format!("Summary context failed: {}", e)))?;

    tera.render(SUMMARY_TEMPLATE_NAME, &context)
        .map_err(|e| Error::Internal(format!("Summary render failed: {}", e)))
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assessment_common::scoring::ScoringResult;
    use assessment_common::typeform::Identity;
    use assessment_common::Recommendations;

    fn result_with(scores: Vec<f64>, name: &str) -> AssessmentResult {
        AssessmentResult::new(
            "r-1",
            ScoringResult::from_dimension_scores(scores, Vec::new()),
            Recommendations::default(),
            Identity {
                user_name: name.to_string(),
                user_email: String::new(),
            },
        )
    }

    #[test]
    fn test_subject_names_candidate() {
        let result = result_with(vec![74.0, 57.0, 68.0, 59.0, 38.0, 71.0, 85.0], "Ana");
        assert_eq!(subject(&result), "New assessment: Ana (64.6 / 100, level 4)");

        let anonymous = result_with(vec![50.0; 7], " ");
        assert!(subject(&anonymous).starts_with("New assessment: Anonymous candidate"));
    }

    #[test]
    fn test_interview_questions_two_per_standout_dimension() {
        let questionnaire = Questionnaire::default();
        let scores = vec![74.0, 57.0, 68.0, 59.0, 38.0, 71.0, 85.0];

        let questions = select_interview_questions(&scores, &questionnaire);

        // strengths: 0, 5, 6; weakness: 4
        assert_eq!(questions.len(), 8);
        assert_eq!(questions[0].0, questionnaire.dimensions[0].name);
        assert_eq!(questions[0].1, questionnaire.dimensions[0].strength_questions[0]);
        assert_eq!(questions[6].0, questionnaire.dimensions[4].name);
        assert_eq!(questions[6].1, questionnaire.dimensions[4].weakness_questions[0]);
    }

    #[test]
    fn test_summary_html_sections() {
        let questionnaire = Questionnaire::default();
        let result = result_with(vec![74.0, 57.0, 68.0, 59.0, 38.0, 71.0, 85.0], "Ana");

        let html = summary_html(&result, &questionnaire, "http://x/results?response_id=r-1").unwrap();

        assert!(html.contains("Overall score: 64.6 / 100"));
        assert!(html.contains("Level 4:"));
        assert!(html.contains(STRENGTH_COLOR));
        assert!(html.contains(WEAKNESS_COLOR));
        assert!(html.contains("Areas for improvement"));
        assert!(html.contains("href=\"http:&#x2F;&#x2F;x&#x2F;results?response_id=r-1\""));
        assert!(!html.contains("No significant strengths identified."));
    }

    #[test]
    fn test_summary_html_flat_scores_use_fallback_text() {
        let questionnaire = Questionnaire::default();
        let result = result_with(vec![60.0; 7], "Ana");

        let html = summary_html(&result, &questionnaire, "http://x/").unwrap();

        assert!(html.contains("No significant strengths identified."));
        assert!(html.contains("No significant areas for improvement identified."));
        assert!(html.contains("use the general interview guide"));
    }

    #[test]
    fn test_summary_html_escapes_submission_values() {
        let questionnaire = Questionnaire::default();
        let result = result_with(vec![60.0; 7], "<script>alert(1)</script>");

        let html = summary_html(&result, &questionnaire, "http://x/").unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_summary_html_escapes_quotes_and_template_syntax() {
        let mut questionnaire = Questionnaire::default();
        questionnaire.dimensions[0].name = "{{ candidate }} & \"Co\"".to_string();
        let result = result_with(vec![60.0; 7], "O'Brien");

        let html = summary_html(&result, &questionnaire, "http://x/\"onclick=\"x").unwrap();

        assert!(html.contains("O&#x27;Brien"));
        assert!(html.contains("{{ candidate }} &amp; &quot;Co&quot;"));
        assert!(!html.contains("\"onclick"));
    }
}
