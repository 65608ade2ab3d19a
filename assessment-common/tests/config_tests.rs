//! Config file loading tests
//!
//! Covers the TOML layer of configuration resolution: explicit paths, parse
//! failures and the `[questionnaire]` override table.

use assessment_common::config::{load_toml_config, AppConfig, ConfigOverrides};
use assessment_common::Error;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn test_load_explicit_config_file() {
    let file = write_config(
        r#"
        bind_address = "0.0.0.0:8080"
        sendgrid_api_key = "SG.from-file"
        sender_email = "noreply@example.com"
        interviewer_email = "reviewer@example.com"
        public_base_url = "https://assess.example.com"
        "#,
    );

    let toml = load_toml_config(Some(file.path())).unwrap();
    assert_eq!(toml.bind_address.as_deref(), Some("0.0.0.0:8080"));
    assert!(toml.questionnaire.is_none());

    let config = AppConfig::resolve(ConfigOverrides::default(), toml).unwrap();
    assert_eq!(config.bind_address, "0.0.0.0:8080");
    assert_eq!(config.email.sendgrid_api_key.as_deref(), Some("SG.from-file"));
    assert_eq!(config.questionnaire.dimension_count(), 7);
}

#[test]
fn test_questionnaire_override() {
    let file = write_config(
        r#"
        [questionnaire]
        questions_per_dimension = 2

        [[questionnaire.dimensions]]
        name = "Organizational"
        focus = "align initiatives with strategy"

        [[questionnaire.dimensions]]
        name = "Interpersonal"

        [questionnaire.field_map]
        leadership_q1 = 1
        "#,
    );

    let config =
        AppConfig::resolve(ConfigOverrides::default(), load_toml_config(Some(file.path())).unwrap())
            .unwrap();

    let q = &config.questionnaire;
    assert_eq!(q.dimension_count(), 2);
    assert_eq!(q.questions_per_dimension, 2);
    assert_eq!(q.dimensions[1].name, "Interpersonal");
    assert!(q.dimensions[1].strength_questions.is_empty());
    assert_eq!(q.pinned_dimension("leadership_q1", None), Some(1));
}

#[test]
fn test_missing_explicit_file_is_error() {
    let result = load_toml_config(Some(std::path::Path::new("/nonexistent/assessment.toml")));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_malformed_file_is_error() {
    let file = write_config("bind_address = [not toml");
    assert!(matches!(load_toml_config(Some(file.path())), Err(Error::Config(_))));
}

#[test]
fn test_questionnaire_pin_out_of_range_is_error() {
    let file = write_config(
        r#"
        [questionnaire]
        [[questionnaire.dimensions]]
        name = "Only"
        [questionnaire.field_map]
        q9 = 3
        "#,
    );
    let toml = load_toml_config(Some(file.path())).unwrap();
    assert!(matches!(
        AppConfig::resolve(ConfigOverrides::default(), toml),
        Err(Error::Config(_))
    ));
}
