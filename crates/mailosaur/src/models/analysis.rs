//! Spam analysis results

use serde::{Deserialize, Serialize};

use super::MessageId;

/// A single SpamAssassin rule that fired for an email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamAssassinRule {
    pub rule: String,
    #[serde(default)]
    pub description: String,
    pub score: f64,
}

/// Per-rule spam scoring for one email
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpamAnalysisResult {
    pub email_id: MessageId,
    #[serde(default)]
    pub spam_assassin: Vec<SpamAssassinRule>,
}

impl SpamAnalysisResult {
    /// Sum of all rule scores
    pub fn total_score(&self) -> f64 {
        self.spam_assassin.iter().map(|r| r.score).sum()
    }
}
