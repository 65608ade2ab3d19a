//! Recommendation generation
//!
//! Per-level template followed by one bullet per strong and per weak
//! dimension, in dimension order.

use crate::models::{MasteryLevel, Recommendations};
use crate::questionnaire::Questionnaire;

/// Dimension scores at or above this are strengths
pub const STRENGTH_THRESHOLD: f64 = 70.0;

/// Dimension scores at or below this are areas for improvement
pub const WEAKNESS_THRESHOLD: f64 = 50.0;

/// Classification of one dimension score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Strength,
    Neutral,
    Weakness,
}

pub fn standing(score: f64) -> Standing {
    if score >= STRENGTH_THRESHOLD {
        Standing::Strength
    } else if score <= WEAKNESS_THRESHOLD {
        Standing::Weakness
    } else {
        Standing::Neutral
    }
}

/// Indices of dimensions with the given standing
pub fn dimensions_with(dimension_scores: &[f64], wanted: Standing) -> Vec<usize> {
    dimension_scores
        .iter()
        .enumerate()
        .filter(|(_, score)| standing(**score) == wanted)
        .map(|(index, _)| index)
        .collect()
}

struct LevelTemplate {
    title: &'static str,
    description: &'static str,
    general: [&'static str; 4],
    interview: [&'static str; 4],
}

const TEMPLATES: [LevelTemplate; 5] = [
    LevelTemplate {
        title: "Getting Started as an Influencer Manager",
        description: "You are at the start of your influencer management path. Focus on fundamentals and on building an initial network.",
        general: [
            "Get familiar with the main social platforms and their basic metrics",
            "Learn the fundamentals of digital and influencer marketing",
            "Practice communication and relationship-building skills",
            "Study successful influencer campaigns and what made them work",
        ],
        interview: [
            "Research agencies and brands that work with influencers",
            "Prepare examples of campaigns you admire and explain why",
            "Show how quickly you learn and adapt",
            "Center your answers on your potential and motivation",
        ],
    },
    LevelTemplate {
        title: "Growing in Influencer Management",
        description: "You know the basics of influencer marketing. Now is the time to go deeper and gain hands-on experience.",
        general: [
            "Develop specific skills in managing creator relationships",
            "Learn the contractual and legal side of influencer marketing",
            "Practice campaign metrics analysis and reporting",
            "Grow your network in the creator ecosystem",
        ],
        interview: [
            "Prepare concrete examples of campaigns you took part in",
            "Highlight the tools and platforms you know well",
            "Explain how you solved specific problems with influencers",
            "Show that you understand strategic influencer selection",
        ],
    },
    LevelTemplate {
        title: "Professional Development Plan",
        description: "You have a solid base in influencer management. Specialize and stand out.",
        general: [
            "Specialize in specific niches or industries",
            "Sharpen your negotiation and budget management skills",
            "Adopt more sophisticated ROI measurement",
            "Keep up with emerging trends and new platforms",
        ],
        interview: [
            "Highlight campaigns where your contribution was decisive",
            "Explain how you evaluate campaign success",
            "Share examples of successful negotiations with influencers",
            "Show knowledge of current market trends",
        ],
    },
    LevelTemplate {
        title: "Leadership in Influencer Marketing",
        description: "You have a high level of expertise. Focus on advanced strategy and leadership.",
        general: [
            "Design integrated multichannel strategies with influencers",
            "Use advanced data approaches to optimize campaigns",
            "Lead teams and manage high-profile creator relationships",
            "Innovate in collaboration formats with creators",
        ],
        interview: [
            "Present detailed case studies of campaigns you led",
            "Explain your strategic view of where influencer marketing is going",
            "Highlight how you handled crises and complex situations",
            "Show how you integrated influencers into wider marketing strategy",
        ],
    },
    LevelTemplate {
        title: "Excellence in Influencer Management",
        description: "You are a reference in the field. Keep innovating and defining best practice.",
        general: [
            "Pioneer new strategies in the field",
            "Mentor other professionals and share knowledge",
            "Build strategic relationships with leading creators",
            "Help define industry standards and best practice",
        ],
        interview: [
            "Position yourself as a thought leader with original ideas",
            "Explain how you transformed teams or departments",
            "Highlight high-impact collaborations with well-known creators",
            "Share your vision for the role of influencers in marketing",
        ],
    },
];

/// Build the development plan for a mastery level and its dimension scores
pub fn recommend(
    mastery: &MasteryLevel,
    dimension_scores: &[f64],
    questionnaire: &Questionnaire,
) -> Recommendations {
    let index = usize::from(mastery.level.clamp(1, 5)) - 1;
    let template = &TEMPLATES[index];

    let mut general: Vec<String> = template.general.iter().map(|s| s.to_string()).collect();

    for index in dimensions_with(dimension_scores, Standing::Strength) {
        general.push(format!(
            "Build on your strength in {}: share what works with your team and lead initiatives in this area",
            questionnaire.dimension_name(index)
        ));
    }

    for index in dimensions_with(dimension_scores, Standing::Weakness) {
        let name = questionnaire.dimension_name(index);
        let focus = questionnaire
            .dimensions
            .get(index)
            .map(|d| d.focus.as_str())
            .filter(|f| !f.is_empty());
        general.push(match focus {
            Some(focus) => format!("Prioritize {}: {}", name, focus),
            None => format!("Prioritize {}: set up a focused learning plan", name),
        });
    }

    Recommendations {
        title: template.title.to_string(),
        description: template.description.to_string(),
        general_recommendations: general,
        interview_preparation: template.interview.iter().map(|s| s.to_string()).collect(),
    }
}
