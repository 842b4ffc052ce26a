//! Tercile bar plot specification.
//!
//! Turns a [`TercileSkill`] into what a renderer needs: one bar per category,
//! a reference line at the climatological probability and one score
//! annotation per category.

use serde::{Deserialize, Serialize};

use crate::tercile::constants::CLIMATOLOGICAL_PROBABILITY;
use crate::tercile::{Category, CategoryScore, TercileSkill};

/// How a score annotation is emphasised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    /// Skill significantly above chance. The ROC test is one-sided, so
    /// significant scores are always positive.
    Significant,
    Highlighted,
    Plain,
    /// No score: the category was never or always observed.
    Undefined,
}

impl Emphasis {
    /// Significance wins over the highlight threshold.
    pub fn of(score: &CategoryScore) -> Self {
        match (score.score, score.significant, score.highlighted) {
            (None, _, _) => Emphasis::Undefined,
            (Some(_), true, _) => Emphasis::Significant,
            (Some(_), false, true) => Emphasis::Highlighted,
            (Some(_), false, false) => Emphasis::Plain,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Emphasis::Significant => "#1a9641",
            Emphasis::Highlighted => "#2c7bb6",
            Emphasis::Plain => "#7f7f7f",
            Emphasis::Undefined => "#bdbdbd",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub category: Category,
    pub label: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAnnotation {
    pub category: Category,
    pub text: String,
    pub score: Option<f64>,
    pub emphasis: Emphasis,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TercileBarPlot {
    pub title: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
    /// Horizontal line at the climatological probability.
    pub reference_line: f64,
    pub annotations: Vec<ScoreAnnotation>,
}

impl TercileBarPlot {
    pub fn from_skill(skill: &TercileSkill) -> Self {
        let bars = Category::ALL
            .iter()
            .map(|&c| Bar {
                category: c,
                label: c.label().to_string(),
                probability: skill.probabilities.get(c),
            })
            .collect();
        let annotations = skill
            .scores
            .iter()
            .map(|s| {
                let emphasis = Emphasis::of(s);
                ScoreAnnotation {
                    category: s.category,
                    text: s.score.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}")),
                    score: s.score,
                    emphasis,
                    color: emphasis.color().to_string(),
                }
            })
            .collect();
        Self {
            title: format!("Tercile probabilities {}", skill.year_target),
            y_label: "Probability".to_string(),
            bars,
            reference_line: CLIMATOLOGICAL_PROBABILITY,
            annotations,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
