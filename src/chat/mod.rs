//! Conversational guidance: a fixed-order state machine that collects a
//! profile over multiple turns, then hands it to the ranker.

pub mod service;

pub use service::ChatService;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::extract::AcademicInfo;
use crate::extract::CareerGoals;
use crate::matching::RankProfile;
use crate::models::MatchResult;

/// Conversation stages in fixed linear order. No skipping; `Followup` is
/// terminal but re-entrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Greeting,
    Interests,
    Skills,
    AcademicBackground,
    CareerGoals,
    ExperienceLevel,
    Recommendations,
    Followup,
}

impl Stage {
    /// The next stage in the fixed sequence; `Followup` stays put.
    pub fn next(self) -> Stage {
        match self {
            Stage::Greeting => Stage::Interests,
            Stage::Interests => Stage::Skills,
            Stage::Skills => Stage::AcademicBackground,
            Stage::AcademicBackground => Stage::CareerGoals,
            Stage::CareerGoals => Stage::ExperienceLevel,
            Stage::ExperienceLevel => Stage::Recommendations,
            Stage::Recommendations | Stage::Followup => Stage::Followup,
        }
    }

    /// Progress indicator reported by this stage's handler. Monotonically
    /// increasing across the sequence.
    pub fn progress(self) -> u8 {
        match self {
            Stage::Greeting => 10,
            Stage::Interests => 25,
            Stage::Skills => 40,
            Stage::AcademicBackground => 60,
            Stage::CareerGoals => 80,
            Stage::ExperienceLevel => 90,
            Stage::Recommendations | Stage::Followup => 100,
        }
    }
}

/// One message in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub sender: String, // "user" or "bot"
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Profile fragments collected across stages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectedData {
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub academic_background: Option<AcademicInfo>,
    pub career_goals: Option<CareerGoals>,
    pub experience_level: Option<String>,
    /// Raw user turn texts, in stage order; the concatenation is the
    /// retrieval query surface for conversational profiles
    pub free_text: Vec<String>,
}

impl CollectedData {
    /// The profile shape the ranker consumes.
    pub fn to_rank_profile(&self) -> RankProfile {
        RankProfile {
            skills: self.skills.iter().map(|s| s.to_lowercase()).collect(),
            interests: self.interests.clone(),
            query_text: self.free_text.join(" "),
        }
    }
}

/// One user's conversation state. Owned exclusively by its session id;
/// destroyed only by explicit reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    pub session_id: String,
    pub stage: Stage,
    pub collected_data: CollectedData,
    pub history: Vec<Turn>,
    pub created_at: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            stage: Stage::Greeting,
            collected_data: CollectedData::default(),
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn push_turn(&mut self, sender: &str, message: &str) {
        self.history.push(Turn {
            sender: sender.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        });
    }
}

/// Response payload for one processed turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub message: String,
    pub stage: Stage,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    /// Echo of the fragment extracted from this turn, for observability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<MatchResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
}

/// Session snapshot returned by the summary endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub stage: Stage,
    pub collected_data: CollectedData,
    pub conversation_length: usize,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_sequence_is_linear() {
        let mut stage = Stage::Greeting;
        let expected = [
            Stage::Interests,
            Stage::Skills,
            Stage::AcademicBackground,
            Stage::CareerGoals,
            Stage::ExperienceLevel,
            Stage::Recommendations,
            Stage::Followup,
        ];
        for next in expected {
            stage = stage.next();
            assert_eq!(stage, next);
        }
        // Followup is terminal but re-entrant
        assert_eq!(stage.next(), Stage::Followup);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let stages = [
            Stage::Greeting,
            Stage::Interests,
            Stage::Skills,
            Stage::AcademicBackground,
            Stage::CareerGoals,
            Stage::ExperienceLevel,
            Stage::Recommendations,
        ];
        let mut last = 0;
        for stage in stages {
            assert!(stage.progress() > last || stage.progress() == 100);
            last = stage.progress();
        }
        assert_eq!(Stage::Interests.progress(), 25);
        assert_eq!(Stage::Followup.progress(), 100);
    }

    #[test]
    fn test_collected_data_to_rank_profile() {
        let collected = CollectedData {
            interests: vec!["Technology".to_string()],
            skills: vec!["Python".to_string(), "sql".to_string()],
            free_text: vec!["I love coding".to_string(), "python and sql".to_string()],
            ..Default::default()
        };
        let profile = collected.to_rank_profile();
        assert!(profile.skills.contains("python"));
        assert!(profile.skills.contains("sql"));
        assert_eq!(profile.query_text, "I love coding python and sql");
    }
}
