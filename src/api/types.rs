//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::models::MatchResult;
use crate::models::SkillMatch;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub careers_loaded: usize,
    pub index_available: bool,
}

/// Career match request. Either a resume text or an explicit skill list
/// (or both) must be supplied; interests are optional labels.
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    5
}

/// Career match response
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub matches: Vec<MatchResult>,
    pub method_used: String,
    pub total_careers_considered: usize,
}

/// Single-career analysis request
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub career_title: String,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Single-career analysis response
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: SkillMatch,
}

/// Chat start request
#[derive(Debug, Deserialize, Default)]
pub struct ChatStartRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Chat turn request
#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    pub session_id: String,
    pub message: String,
}

/// Chat start/turn response: the session id plus the bot turn
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub turn: crate::chat::TurnResponse,
}

/// Statistics response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_careers: usize,
    pub total_distinct_skills: usize,
    pub skill_frequencies: Vec<SkillFrequency>,
    pub index_available: bool,
    pub indexed_careers: usize,
}

#[derive(Debug, Serialize)]
pub struct SkillFrequency {
    pub skill: String,
    pub careers: usize,
}
