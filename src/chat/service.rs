//! Chat service: session store plus the stage handlers.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;

use super::ConversationSession;
use super::SessionSummary;
use super::Stage;
use super::TurnResponse;
use crate::extract;
use crate::extract::ExtractorConfig;
use crate::matching::Ranker;

/// Conversational guidance service.
///
/// Sessions are keyed by caller-supplied id; each session sits behind its
/// own mutex so concurrent turns for one session are serialized while
/// different sessions proceed independently. Sessions never expire on their
/// own; only an explicit reset removes them.
pub struct ChatService {
    sessions: DashMap<String, Arc<Mutex<ConversationSession>>>,
    extractor: ExtractorConfig,
    ranker: Arc<Ranker>,
}

impl ChatService {
    pub fn new(ranker: Arc<Ranker>, extractor: ExtractorConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            extractor,
            ranker,
        }
    }

    /// Start (or restart) a conversation for the given session id.
    pub async fn start(&self, session_id: &str) -> TurnResponse {
        let session = Arc::new(Mutex::new(ConversationSession::new(session_id)));
        self.sessions.insert(session_id.to_string(), session.clone());

        let mut session = session.lock().await;
        let response = greeting(&mut session);
        session.push_turn("bot", &response.message);
        info!("Started conversation session {session_id}");
        response
    }

    /// Process one user turn. Unknown session ids start a fresh conversation,
    /// mirroring the start path.
    pub async fn process_turn(&self, session_id: &str, message: &str) -> TurnResponse {
        let Some(session) = self.sessions.get(session_id).map(|s| s.value().clone()) else {
            return self.start(session_id).await;
        };

        let mut session = session.lock().await;
        session.push_turn("user", message);

        let response = match session.stage {
            Stage::Greeting => greeting(&mut session),
            Stage::Interests => self.handle_interests(&mut session, message),
            Stage::Skills => self.handle_skills(&mut session, message),
            Stage::AcademicBackground => self.handle_academic(&mut session, message),
            Stage::CareerGoals => handle_goals(&mut session, message),
            Stage::ExperienceLevel => handle_experience_level(&mut session, message),
            Stage::Recommendations => self.handle_recommendations(&mut session).await,
            Stage::Followup => handle_followup(message),
        };

        session.push_turn("bot", &response.message);
        response
    }

    /// Session snapshot, if the session exists.
    pub async fn summary(&self, session_id: &str) -> Option<SessionSummary> {
        let session = self.sessions.get(session_id)?.value().clone();
        let session = session.lock().await;
        Some(SessionSummary {
            session_id: session.session_id.clone(),
            stage: session.stage,
            collected_data: session.collected_data.clone(),
            conversation_length: session.history.len(),
            created_at: session.created_at,
        })
    }

    /// Remove a session entirely. Returns whether one existed.
    pub fn reset(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    fn handle_interests(&self, session: &mut ConversationSession, message: &str) -> TurnResponse {
        let interests = extract::extract_interests(message, &self.extractor);
        session.collected_data.interests = interests.clone();
        session.collected_data.free_text.push(message.to_string());
        session.stage = Stage::Skills;

        let text = format!(
            "Great! I can see you're interested in: {}.\n\n\
             Now, let's talk about your skills! What are you good at or what \
             technical/professional skills do you have? This could include \
             programming languages, software tools, soft skills or any \
             certifications. Share whatever you have, even the basics!",
            interests.join(", ")
        );

        TurnResponse {
            message: text,
            stage: Stage::Skills,
            progress: Stage::Interests.progress(),
            suggestions: None,
            extracted_data: serde_json::to_value(&interests).ok().map(|v| {
                serde_json::json!({ "interests": v })
            }),
            recommendations: None,
            method_used: None,
            actions: None,
        }
    }

    fn handle_skills(&self, session: &mut ConversationSession, message: &str) -> TurnResponse {
        let mut skills: Vec<String> = extract::extract_skills(message, &self.extractor)
            .into_iter()
            .collect();
        if skills.is_empty() {
            // Everyone brings something to the table
            skills = vec!["communication".to_string(), "problem solving".to_string()];
        }
        session.collected_data.skills = skills.clone();
        session.collected_data.free_text.push(message.to_string());
        session.stage = Stage::AcademicBackground;

        let shown = skills.iter().take(8).cloned().collect::<Vec<_>>().join(", ");
        let ellipsis = if skills.len() > 8 { "..." } else { "" };
        let text = format!(
            "Excellent! I've identified these skills: {shown}{ellipsis}.\n\n\
             Tell me about your academic background: your current education \
             level, your field or major, and any subjects you particularly \
             enjoyed."
        );

        TurnResponse {
            message: text,
            stage: Stage::AcademicBackground,
            progress: Stage::Skills.progress(),
            suggestions: None,
            extracted_data: Some(serde_json::json!({ "skills": skills })),
            recommendations: None,
            method_used: None,
            actions: None,
        }
    }

    fn handle_academic(&self, session: &mut ConversationSession, message: &str) -> TurnResponse {
        let info = extract::extract_academic_info(message, &self.extractor);
        let echo = serde_json::to_value(&info).ok();
        session.collected_data.academic_background = Some(info);
        session.collected_data.free_text.push(message.to_string());
        session.stage = Stage::CareerGoals;

        TurnResponse {
            message: "Thanks for sharing your academic background!\n\n\
                      Now, let's discuss your career aspirations: what type of \
                      work environment appeals to you (corporate, startup, \
                      remote), and what matters most in a career - salary, \
                      work-life balance, growth, or impact?"
                .to_string(),
            stage: Stage::CareerGoals,
            progress: Stage::AcademicBackground.progress(),
            suggestions: None,
            extracted_data: echo.map(|v| serde_json::json!({ "academic_background": v })),
            recommendations: None,
            method_used: None,
            actions: None,
        }
    }

    async fn handle_recommendations(&self, session: &mut ConversationSession) -> TurnResponse {
        let profile = session.collected_data.to_rank_profile();
        // Exactly one ranking call per conversation, on entering this stage
        let ranked = self.ranker.rank(&profile, 5).await;

        let mut text = String::from("Here are your personalized career recommendations:\n\n");
        if ranked.results.is_empty() {
            text.push_str(
                "I couldn't find strong matches yet - try adding more skills \
                 or upload your resume for a deeper analysis.\n",
            );
        }
        for (i, career) in ranked.results.iter().enumerate() {
            let key_skills = career
                .matched_skills
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            text.push_str(&format!(
                "{}. {} - match score {:.0}%\n   Key skills: {}\n   Why it fits: {}\n\n",
                i + 1,
                career.career_title,
                career.score * 100.0,
                key_skills,
                career.explanation.join("; ")
            ));
        }
        text.push_str(
            "What would you like to explore further? I can share career \
             details, suggest skills to develop, analyze your resume, or \
             recommend learning paths.",
        );

        session.stage = Stage::Followup;

        TurnResponse {
            message: text,
            stage: Stage::Followup,
            progress: Stage::Recommendations.progress(),
            suggestions: None,
            extracted_data: None,
            recommendations: Some(ranked.results),
            method_used: Some(ranked.method.label().to_string()),
            actions: Some(vec![
                "Career Details".to_string(),
                "Skill Development".to_string(),
                "Resume Analysis".to_string(),
                "Learning Path".to_string(),
            ]),
        }
    }
}

fn greeting(session: &mut ConversationSession) -> TurnResponse {
    session.stage = Stage::Interests;

    TurnResponse {
        message: "Hello! I'm your career guidance assistant. I'll ask a few \
                  questions about your interests, skills and goals, then \
                  recommend careers that fit your profile.\n\n\
                  To get started, tell me about your main interests - for \
                  example technology, business, creative arts, healthcare, \
                  education, or anything else you're passionate about!"
            .to_string(),
        stage: Stage::Interests,
        progress: Stage::Greeting.progress(),
        suggestions: Some(vec![
            "Technology".to_string(),
            "Business".to_string(),
            "Creative Arts".to_string(),
            "Healthcare".to_string(),
            "Education".to_string(),
            "Science".to_string(),
        ]),
        extracted_data: None,
        recommendations: None,
        method_used: None,
        actions: None,
    }
}

fn handle_goals(session: &mut ConversationSession, message: &str) -> TurnResponse {
    let goals = extract::extract_career_goals(message);
    let echo = serde_json::to_value(&goals).ok();
    session.collected_data.career_goals = Some(goals);
    session.collected_data.free_text.push(message.to_string());
    session.stage = Stage::ExperienceLevel;

    TurnResponse {
        message: "Perfect! One more question - what's your current experience \
                  level? Fresh graduate, some internship experience, 1-3 years \
                  professional, or 3+ years?"
            .to_string(),
        stage: Stage::ExperienceLevel,
        progress: Stage::CareerGoals.progress(),
        suggestions: None,
        extracted_data: echo.map(|v| serde_json::json!({ "career_goals": v })),
        recommendations: None,
        method_used: None,
        actions: None,
    }
}

fn handle_experience_level(session: &mut ConversationSession, message: &str) -> TurnResponse {
    let level = extract::extract_experience_level(message);
    session.collected_data.experience_level = Some(level.label().to_string());
    session.collected_data.free_text.push(message.to_string());
    session.stage = Stage::Recommendations;

    let collected = &session.collected_data;
    TurnResponse {
        message: format!(
            "Excellent! I now have everything I need.\n\n\
             Analyzing your profile: interests in {}, {} identified skills, \
             plus your academic background and goals. Send any message and \
             I'll generate your personalized recommendations.",
            collected.interests.join(", "),
            collected.skills.len()
        ),
        stage: Stage::Recommendations,
        progress: Stage::ExperienceLevel.progress(),
        suggestions: None,
        extracted_data: Some(serde_json::json!({ "experience_level": level.label() })),
        recommendations: None,
        method_used: None,
        actions: Some(vec!["generate_recommendations".to_string()]),
    }
}

/// Followup dispatch: stays in `Followup`, routing to a sub-handler by
/// keyword.
fn handle_followup(message: &str) -> TurnResponse {
    let lower = message.to_lowercase();

    let text = if lower.contains("career details") || lower.contains("more about") {
        "Which specific role would you like to know more about? I can share \
         responsibilities, required skills and growth prospects."
    } else if lower.contains("skills") || lower.contains("develop") {
        "Which career from your recommendations interests you most? I'll \
         outline the skills to develop for it."
    } else if lower.contains("resume") {
        "Upload your resume using the file upload feature and I'll analyze it \
         for more specific recommendations and skill gaps."
    } else if lower.contains("courses") || lower.contains("learning") {
        "I can suggest relevant courses and certifications. Which area would \
         you like to focus on?"
    } else {
        "I'm here to help with your career guidance! Ask me about career \
         paths, skills to develop, educational recommendations, or resume \
         analysis."
    };

    TurnResponse {
        message: text.to_string(),
        stage: Stage::Followup,
        progress: Stage::Followup.progress(),
        suggestions: None,
        extracted_data: None,
        recommendations: None,
        method_used: None,
        actions: None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::corpus::CorpusSnapshot;
    use crate::index::IndexHolder;

    fn service() -> ChatService {
        let snapshot = Arc::new(CorpusSnapshot::from_records([
            ("Software Engineer", "python, sql, git"),
            ("Data Analyst", "sql, excel, python"),
        ]));
        let ranker = Arc::new(Ranker::new(snapshot, Arc::new(IndexHolder::empty()), None));
        ChatService::new(ranker, ExtractorConfig::default())
    }

    #[tokio::test]
    async fn test_start_enters_interests_stage() {
        let service = service();
        let response = service.start("s1").await;
        assert_eq!(response.stage, Stage::Interests);
        assert_eq!(response.progress, 10);
        assert!(response.suggestions.is_some());
    }

    #[tokio::test]
    async fn test_first_turn_collects_interests() {
        let service = service();
        service.start("s1").await;
        let response = service.process_turn("s1", "I love coding and python").await;

        assert_eq!(response.stage, Stage::Skills);
        assert_eq!(response.progress, 25);

        let summary = service.summary("s1").await.unwrap();
        assert_eq!(summary.stage, Stage::Skills);
        assert!(summary
            .collected_data
            .interests
            .contains(&"Technology".to_string()));
    }

    #[tokio::test]
    async fn test_full_conversation_reaches_followup() {
        let service = service();
        service.start("s1").await;
        service.process_turn("s1", "technology and programming").await;
        service.process_turn("s1", "python, sql and git").await;
        service
            .process_turn("s1", "bachelor in computer science")
            .await;
        service.process_turn("s1", "remote work, growth").await;
        let response = service.process_turn("s1", "fresh graduate").await;
        assert_eq!(response.stage, Stage::Recommendations);
        assert_eq!(response.progress, 90);

        let response = service.process_turn("s1", "go ahead").await;
        assert_eq!(response.stage, Stage::Followup);
        assert_eq!(response.progress, 100);
        assert_eq!(response.method_used.as_deref(), Some("fallback"));
        let recommendations = response.recommendations.unwrap();
        assert!(!recommendations.is_empty());

        // Followup is re-entrant
        let response = service.process_turn("s1", "tell me about skills").await;
        assert_eq!(response.stage, Stage::Followup);
        let response = service.process_turn("s1", "career details please").await;
        assert_eq!(response.stage, Stage::Followup);
    }

    #[tokio::test]
    async fn test_skills_default_when_none_extracted() {
        let service = service();
        service.start("s1").await;
        service.process_turn("s1", "art and music").await;
        service.process_turn("s1", "um, nothing really").await;

        let summary = service.summary("s1").await.unwrap();
        assert!(summary
            .collected_data
            .skills
            .contains(&"communication".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_session_starts_fresh() {
        let service = service();
        let response = service.process_turn("brand-new", "hello").await;
        assert_eq!(response.stage, Stage::Interests);
        assert_eq!(response.progress, 10);
    }

    #[tokio::test]
    async fn test_reset_then_start_reinitializes() {
        let service = service();
        service.start("s1").await;
        service.process_turn("s1", "technology").await;
        assert!(service.reset("s1"));
        assert!(service.summary("s1").await.is_none());
        assert!(!service.reset("s1"));

        let response = service.start("s1").await;
        assert_eq!(response.stage, Stage::Interests);
        let summary = service.summary("s1").await.unwrap();
        // Greeting reply only; user history is gone
        assert_eq!(summary.conversation_length, 1);
        assert!(summary.collected_data.interests.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let service = service();
        service.start("a").await;
        service.start("b").await;
        service.process_turn("a", "technology").await;

        let a = service.summary("a").await.unwrap();
        let b = service.summary("b").await.unwrap();
        assert_eq!(a.stage, Stage::Skills);
        assert_eq!(b.stage, Stage::Interests);
    }
}
