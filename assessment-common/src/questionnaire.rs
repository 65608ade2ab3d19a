//! Questionnaire definition: capability dimensions and question→dimension mapping
//!
//! The default definition covers the seven dimensions of the influencer
//! marketing manager assessment, four questions per dimension. A TOML
//! `[questionnaire]` table may replace it (see `config`).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default number of scored questions per dimension when no field is pinned
pub const DEFAULT_QUESTIONS_PER_DIMENSION: usize = 4;

/// One capability axis measured by the questionnaire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    /// Development focus quoted in recommendations when the dimension is weak
    #[serde(default)]
    pub focus: String,
    /// Interview questions that validate a strong result
    #[serde(default)]
    pub strength_questions: Vec<String>,
    /// Interview questions that explore a development plan
    #[serde(default)]
    pub weakness_questions: Vec<String>,
}

impl Dimension {
    fn new(name: &str, focus: &str, strengths: [&str; 2], weaknesses: [&str; 2]) -> Self {
        Self {
            name: name.to_string(),
            focus: focus.to_string(),
            strength_questions: strengths.iter().map(|q| q.to_string()).collect(),
            weakness_questions: weaknesses.iter().map(|q| q.to_string()).collect(),
        }
    }
}

/// Static questionnaire layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Questionnaire {
    pub dimensions: Vec<Dimension>,
    /// Group size used for sequential assignment of scored answers
    #[serde(default = "default_questions_per_dimension")]
    pub questions_per_dimension: usize,
    /// Field id or ref → dimension index; pinned answers skip sequential assignment
    #[serde(default)]
    pub field_map: HashMap<String, usize>,
}

fn default_questions_per_dimension() -> usize {
    DEFAULT_QUESTIONS_PER_DIMENSION
}

impl Questionnaire {
    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    /// Dimension name, or a positional placeholder for out-of-range indices
    pub fn dimension_name(&self, index: usize) -> String {
        self.dimensions
            .get(index)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| format!("Dimension {}", index + 1))
    }

    /// Pinned dimension for a field, checked by id first and then by ref
    pub fn pinned_dimension(&self, field_id: &str, field_ref: Option<&str>) -> Option<usize> {
        self.field_map
            .get(field_id)
            .or_else(|| field_ref.and_then(|r| self.field_map.get(r)))
            .copied()
    }

    /// Dimension for the `ordinal`-th unpinned scored answer
    ///
    /// Returns None once the answer falls past the last group.
    pub fn sequential_dimension(&self, ordinal: usize) -> Option<usize> {
        if self.questions_per_dimension == 0 {
            return None;
        }
        let index = ordinal / self.questions_per_dimension;
        (index < self.dimensions.len()).then_some(index)
    }

    /// Reject layouts the scoring engine cannot aggregate
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.is_empty() {
            return Err(Error::Config(
                "questionnaire must define at least one dimension".to_string(),
            ));
        }
        if self.questions_per_dimension == 0 {
            return Err(Error::Config(
                "questionnaire questions_per_dimension must be greater than zero".to_string(),
            ));
        }
        if let Some((field, index)) = self
            .field_map
            .iter()
            .find(|(_, index)| **index >= self.dimensions.len())
        {
            return Err(Error::Config(format!(
                "questionnaire field '{}' is mapped to dimension {} but only {} dimensions exist",
                field,
                index,
                self.dimensions.len()
            )));
        }
        Ok(())
    }
}

impl Default for Questionnaire {
    fn default() -> Self {
        let dimensions = vec![
            Dimension::new(
                "Strategic Influencer Selection",
                "build a systematic method to evaluate brand congruence and audience quality before signing creators",
                [
                    "Describe the process you use to evaluate value alignment between an influencer and a consumer brand.",
                    "Tell me about a time you turned down a popular influencer because of brand fit. How did you defend the decision?",
                ],
                [
                    "What training or resources would improve how you evaluate influencer-brand fit?",
                    "How do you plan to make influencer authenticity checks more systematic?",
                ],
            ),
            Dimension::new(
                "Content & Campaign Management",
                "tighten briefing and approval workflows so creators keep their voice while the brand keeps control",
                [
                    "Share a briefing you consider especially successful. Which elements made the content both authentic and on-brand?",
                    "Describe a multi-market campaign you coordinated. How did you keep it coherent and locally relevant?",
                ],
                [
                    "Which parts of your content approval process need optimization?",
                    "What tools or methods would you adopt to run international campaigns more smoothly?",
                ],
            ),
            Dimension::new(
                "Audience Understanding",
                "deepen audience analysis beyond demographics into behaviour and cultural insight",
                [
                    "Describe an audience insight you found in the data and how it changed an influencer strategy.",
                    "How have you segmented an influencer's audience to personalize campaign messages?",
                ],
                [
                    "What limits your current audience analysis, and how will you overcome them?",
                    "How do you plan to get better at predicting audience behaviour?",
                ],
            ),
            Dimension::new(
                "Authenticity Cultivation",
                "foster genuine creator-brand connections and prepare for authenticity controversies",
                [
                    "Describe a strategy you used to build a genuine connection between an influencer and a brand.",
                    "How have you handled disclosure requirements without making the content feel forced?",
                ],
                [
                    "How would you strengthen an influencer's intrinsic motivation toward a brand?",
                    "How do you plan to improve your protocol for authenticity-related controversies?",
                ],
            ),
            Dimension::new(
                "Analysis & Optimization",
                "connect influencer activity to business results with attribution models and custom KPIs",
                [
                    "Describe an attribution model you built to link influencer activity to business results.",
                    "Share an example where data analysis let you significantly improve a campaign mid-flight.",
                ],
                [
                    "What limits your current measurement approach, and how will you address it?",
                    "Which technologies are you exploring to improve attribution?",
                ],
            ),
            Dimension::new(
                "Digital Ecosystem Adaptability",
                "track platform changes and run structured experiments with new formats",
                [
                    "Describe a trend you spotted early and how you used it before it went mainstream.",
                    "How did you adapt a strategy after a major algorithm change on a key platform?",
                ],
                [
                    "Which emerging technologies are you studying to anticipate their impact on influencer marketing?",
                    "How would you structure experiments with new platforms or formats?",
                ],
            ),
            Dimension::new(
                "Relationship Management",
                "turn transactional creator deals into long-term partnerships through better negotiation and communication",
                [
                    "Describe an ambassador program you built. What made it succeed?",
                    "Share how you turned a transactional relationship into a long-term alliance.",
                ],
                [
                    "Which aspects of your communication with influencers need improvement?",
                    "Which negotiation or conflict-resolution skills are you working to develop?",
                ],
            ),
        ];

        Self {
            dimensions,
            questions_per_dimension: DEFAULT_QUESTIONS_PER_DIMENSION,
            field_map: HashMap::new(),
        }
    }
}
