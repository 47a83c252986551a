//! API request handlers

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::api::types::AnalyzeRequest;
use crate::api::types::AnalyzeResponse;
use crate::api::types::ApiResponse;
use crate::api::types::ChatMessageRequest;
use crate::api::types::ChatResponse;
use crate::api::types::ChatStartRequest;
use crate::api::types::HealthResponse;
use crate::api::types::MatchRequest;
use crate::api::types::MatchResponse;
use crate::api::types::SkillFrequency;
use crate::api::types::StatsResponse;
use crate::chat::ChatService;
use crate::chat::SessionSummary;
use crate::corpus::CorpusSnapshot;
use crate::errors::CareerPathError;
use crate::extract;
use crate::extract::ExtractorConfig;
use crate::index::IndexHolder;
use crate::matching::RankProfile;
use crate::matching::Ranker;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<CorpusSnapshot>,
    pub index: Arc<IndexHolder>,
    pub ranker: Arc<Ranker>,
    pub chat: Arc<ChatService>,
    pub extractor: Arc<ExtractorConfig>,
}

impl AppState {
    /// Build a ranking profile from a request's resume text and/or explicit
    /// skill and interest lists.
    fn profile_from_parts(
        &self,
        resume_text: Option<&str>,
        skills: &[String],
        interests: &[String],
    ) -> RankProfile {
        let mut profile = RankProfile::default();

        if let Some(text) = resume_text {
            let resume = extract::parse_resume_text(text, &self.extractor);
            profile.query_text = resume.query_text();
            profile.skills = resume.skills;
            profile
                .interests
                .extend(extract::extract_interests(text, &self.extractor));
        }

        for skill in skills {
            let skill = skill.trim().to_lowercase();
            if !skill.is_empty() {
                profile.skills.insert(skill);
            }
        }
        for interest in interests {
            if !profile.interests.contains(interest) {
                profile.interests.push(interest.clone());
            }
        }
        if profile.query_text.is_empty() {
            profile.query_text = profile
                .skills
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(" ");
        }
        profile
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        careers_loaded: state.snapshot.len(),
        index_available: state.index.available().is_some(),
    }))
}

/// Rank careers against a profile (POST /api/career/matches)
pub async fn career_matches(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<ApiResponse<MatchResponse>>, StatusCode> {
    info!("POST /api/career/matches");

    let profile = state.profile_from_parts(
        request.resume_text.as_deref(),
        &request.skills,
        &request.interests,
    );
    let top_n = request.top_n.clamp(1, 50);
    let ranked = state.ranker.rank(&profile, top_n).await;

    Ok(Json(ApiResponse::success(MatchResponse {
        method_used: ranked.method.label().to_string(),
        matches: ranked.results,
        total_careers_considered: state.snapshot.len(),
    })))
}

/// Analyze fit against one named career (POST /api/career/analyze)
pub async fn career_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<AnalyzeResponse>>, StatusCode> {
    info!("POST /api/career/analyze career={}", request.career_title);

    let profile =
        state.profile_from_parts(request.resume_text.as_deref(), &request.skills, &[]);

    match state.ranker.analyze(&profile, &request.career_title) {
        Ok(analysis) => Ok(Json(ApiResponse::success(AnalyzeResponse { analysis }))),
        Err(CareerPathError::CareerNotFound(title)) => Ok(Json(ApiResponse::error(format!(
            "Career '{title}' not found in the skills database"
        )))),
        Err(e) => {
            tracing::error!("Career analysis failed: {e}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Start a guidance conversation (POST /chat/start)
pub async fn chat_start(
    State(state): State<AppState>,
    Json(request): Json<ChatStartRequest>,
) -> Json<ApiResponse<ChatResponse>> {
    let session_id = request
        .session_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    info!("POST /chat/start session={session_id}");

    let turn = state.chat.start(&session_id).await;
    Json(ApiResponse::success(ChatResponse { session_id, turn }))
}

/// Process one conversation turn (POST /chat/message)
pub async fn chat_message(
    State(state): State<AppState>,
    Json(request): Json<ChatMessageRequest>,
) -> Json<ApiResponse<ChatResponse>> {
    info!("POST /chat/message session={}", request.session_id);

    let turn = state
        .chat
        .process_turn(&request.session_id, &request.message)
        .await;
    Json(ApiResponse::success(ChatResponse {
        session_id: request.session_id,
        turn,
    }))
}

/// Session snapshot (GET /chat/summary/:session_id)
pub async fn chat_summary(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<ApiResponse<SessionSummary>> {
    info!("GET /chat/summary/{session_id}");

    match state.chat.summary(&session_id).await {
        Some(summary) => Json(ApiResponse::success(summary)),
        None => Json(ApiResponse::error(format!(
            "Session '{session_id}' not found"
        ))),
    }
}

/// Drop a session (POST /chat/reset/:session_id)
pub async fn chat_reset(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<ApiResponse<serde_json::Value>> {
    info!("POST /chat/reset/{session_id}");

    if state.chat.reset(&session_id) {
        Json(ApiResponse::success(
            serde_json::json!({ "session_id": session_id, "reset": true }),
        ))
    } else {
        Json(ApiResponse::error(format!(
            "Session '{session_id}' not found"
        )))
    }
}

/// Corpus and index statistics (GET /stats)
pub async fn get_stats(State(state): State<AppState>) -> Json<ApiResponse<StatsResponse>> {
    info!("GET /stats");

    let distinct: BTreeSet<&str> = state
        .snapshot
        .skill_frequencies()
        .keys()
        .map(String::as_str)
        .collect();
    let mut frequencies: Vec<SkillFrequency> = state
        .snapshot
        .skill_frequencies()
        .iter()
        .map(|(skill, count)| SkillFrequency {
            skill: skill.clone(),
            careers: *count,
        })
        .collect();
    frequencies.sort_by(|a, b| b.careers.cmp(&a.careers).then(a.skill.cmp(&b.skill)));
    frequencies.truncate(50);

    let indexed = state.index.available().map_or(0, |index| index.len());

    Json(ApiResponse::success(StatsResponse {
        total_careers: state.snapshot.len(),
        total_distinct_skills: distinct.len(),
        skill_frequencies: frequencies,
        index_available: indexed > 0,
        indexed_careers: indexed,
    }))
}
