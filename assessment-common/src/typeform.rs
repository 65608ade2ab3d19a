//! Typeform webhook payload model
//!
//! Only the parts of `form_response` the scoring pipeline reads are modelled.
//! Answers are kept as raw JSON until scored so one malformed answer does not
//! reject the whole submission.

use crate::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// `form_response` object of a Typeform webhook delivery
///
/// Only `answers` must be well formed. Definition fields are decoded one at a
/// time and the unusable ones are listed in `definition_problems`.
#[derive(Debug, Clone)]
pub struct FormResponse {
    /// Submission token, used as the response id
    pub token: Option<String>,
    pub answers: Vec<Value>,
    pub definition: FormDefinition,
    /// One message per definition field that could not be decoded
    pub definition_problems: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawFormResponse {
    #[serde(default)]
    token: Option<Value>,
    answers: Vec<Value>,
    #[serde(default)]
    definition: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct FormDefinition {
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub choices: Vec<ChoiceDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceDefinition {
    pub label: String,
}

/// Answer type tag as sent by Typeform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    Choice,
    Number,
    Text,
    Email,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldRef {
    pub id: String,
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceAnswer {
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Answer {
    #[serde(rename = "type")]
    pub kind: AnswerKind,
    pub field: FieldRef,
    #[serde(default)]
    pub choice: Option<ChoiceAnswer>,
    #[serde(default)]
    pub number: Option<f64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Self-reported identity found in the answers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub user_name: String,
    pub user_email: String,
}

impl FormResponse {
    /// Parse a `form_response` JSON object
    ///
    /// Fails only when the value is not an object or `answers` is not an
    /// array; everything else degrades per entry.
    pub fn parse(value: &Value) -> Result<Self> {
        let raw = RawFormResponse::deserialize(value)
            .map_err(|e| Error::InvalidInput(format!("malformed form_response: {}", e)))?;

        let mut fields = Vec::new();
        let mut definition_problems = Vec::new();
        match raw.definition.as_ref().and_then(|d| d.get("fields")) {
            None | Some(Value::Null) => {}
            Some(Value::Array(raw_fields)) => {
                for (index, field) in raw_fields.iter().enumerate() {
                    match FieldDefinition::deserialize(field) {
                        Ok(field) => fields.push(field),
                        Err(e) => {
                            definition_problems.push(format!("definition field {}: {}", index, e))
                        }
                    }
                }
            }
            Some(_) => definition_problems.push("definition fields is not an array".to_string()),
        }

        Ok(Self {
            token: raw.token.as_ref().and_then(token_text),
            answers: raw.answers,
            definition: FormDefinition { fields },
            definition_problems,
        })
    }

    /// Field definition by id
    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.definition.fields.iter().find(|f| f.id == id)
    }

    /// Decode every answer, collecting a message for each one that is malformed
    pub fn parse_answers(&self) -> (Vec<Answer>, Vec<String>) {
        let mut answers = Vec::with_capacity(self.answers.len());
        let mut problems = Vec::new();

        for (index, raw) in self.answers.iter().enumerate() {
            match Answer::deserialize(raw) {
                Ok(answer) => answers.push(answer),
                Err(e) => problems.push(format!("answer {}: {}", index, e)),
            }
        }

        (answers, problems)
    }

    /// Non-empty submission token
    pub fn response_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Name and email from identity questions
    ///
    /// `email` answers always set the email; `text` answers are classified by
    /// the title of the question they answer.
    pub fn identity(&self) -> Identity {
        let (answers, _) = self.parse_answers();
        let mut identity = Identity::default();

        for answer in answers {
            match answer.kind {
                AnswerKind::Email => {
                    if let Some(email) = answer.email {
                        identity.user_email = email;
                    }
                }
                AnswerKind::Text => {
                    let Some(text) = answer.text else { continue };
                    let title = self
                        .field(&answer.field.id)
                        .map(|f| f.title.to_lowercase())
                        .unwrap_or_default();

                    if title.contains("email") || title.contains("correo") {
                        identity.user_email = text;
                    } else if title.contains("name") || title.contains("nombre") {
                        identity.user_name = text;
                    }
                }
                _ => {}
            }
        }

        identity
    }
}

/// Submission token straight from a raw `form_response`
///
/// Independent of whether the rest of the payload parses, so a malformed
/// submission is still stored under the id the form host redirects with.
pub fn raw_token(form_response: &Value) -> Option<String> {
    form_response.get("token").and_then(token_text)
}

/// Non-blank token text; numeric tokens are taken as their decimal form
fn token_text(token: &Value) -> Option<String> {
    let text = match token {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Identity from a raw `form_response`; empty when it does not parse
pub fn extract_identity(form_response: &Value) -> Identity {
    FormResponse::parse(form_response)
        .map(|form| form.identity())
        .unwrap_or_default()
}
