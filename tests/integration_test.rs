use std::sync::Arc;

use careerpath::chat::ChatService;
use careerpath::chat::Stage;
use careerpath::corpus::CorpusStore;
use careerpath::extract::ExtractorConfig;
use careerpath::index::IndexHolder;
use careerpath::index::VectorIndex;
use careerpath::matching::RankProfile;
use careerpath::matching::Ranker;
use careerpath::models::MatchMethod;
use careerpath::CareerMatcher;
use careerpath::Result;

async fn seeded_store() -> Result<CorpusStore> {
    let store = CorpusStore::connect("sqlite::memory:", 1).await?;
    store.seed_sample_data().await?;
    Ok(store)
}

#[tokio::test]
async fn test_resume_match_end_to_end_fallback() -> Result<()> {
    let store = seeded_store().await?;
    let snapshot = Arc::new(store.load_snapshot().await?);
    let matcher = CareerMatcher::new(snapshot, Arc::new(IndexHolder::empty()), None);

    let resume = "PROFESSIONAL EXPERIENCE\n\
                  Software Developer | Acme Corp | 2021 - 2024\n\
                  Built services in Python with SQL databases, Git workflows\n\
                  and JavaScript front ends.\n\n\
                  EDUCATION\n\
                  Bachelor of Science in Computer Science";

    let ranked = matcher.match_resume(resume, 5).await;
    assert_eq!(ranked.method, MatchMethod::Fallback);
    assert!(!ranked.results.is_empty());
    assert!(ranked.results.len() <= 5);

    // A python/sql/git resume should surface Software Engineer near the top
    let titles: Vec<&str> = ranked
        .results
        .iter()
        .map(|r| r.career_title.as_str())
        .collect();
    assert!(titles.contains(&"Software Engineer"));

    for result in &ranked.results {
        assert!(result.score >= 0.1);
        assert!(result.score <= 1.0);
    }
    // Scores are non-increasing
    for pair in ranked.results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    Ok(())
}

#[tokio::test]
async fn test_match_skills_is_deterministic() -> Result<()> {
    let store = seeded_store().await?;
    let snapshot = Arc::new(store.load_snapshot().await?);
    let matcher = CareerMatcher::new(snapshot, Arc::new(IndexHolder::empty()), None);

    let first = matcher.match_skills(["python", "sql", "communication"], 10);
    let second = matcher.match_skills(["python", "sql", "communication"], 10);

    let a = serde_json::to_string(&first.results).unwrap();
    let b = serde_json::to_string(&second.results).unwrap();
    assert_eq!(a, b);
    Ok(())
}

#[tokio::test]
async fn test_semantic_ranking_with_prebuilt_index() -> Result<()> {
    let store = seeded_store().await?;
    let snapshot = Arc::new(store.load_snapshot().await?);

    // Hand-built unit vectors standing in for real embeddings
    let titles: Vec<String> = snapshot
        .all_entries()
        .iter()
        .map(|e| e.career_title.clone())
        .collect();
    let count = titles.len();
    let vectors: Vec<Vec<f32>> = (0..count)
        .map(|i| {
            let mut v = vec![0.0f32; count];
            v[i] = 1.0;
            v
        })
        .collect();
    let index = VectorIndex::from_vectors(titles.clone(), vectors)?;

    // Query identical to entry 2's vector must rank that title first with
    // similarity 1.0
    let mut query = vec![0.0f32; count];
    query[2] = 1.0;
    let hits = index.query_vector(&query, 3);
    assert_eq!(hits[0].0, titles[2]);
    assert!((hits[0].1 - 1.0).abs() < 1e-6);

    // Swapped into a holder the index becomes available to readers
    let holder = IndexHolder::empty();
    assert!(holder.available().is_none());
    holder.swap(index);
    assert!(holder.available().is_some());
    Ok(())
}

#[tokio::test]
async fn test_analyze_known_and_fuzzy_titles() -> Result<()> {
    let store = seeded_store().await?;
    let snapshot = Arc::new(store.load_snapshot().await?);
    let ranker = Ranker::new(snapshot, Arc::new(IndexHolder::empty()), None);

    let profile = RankProfile {
        skills: ["python", "sql"]
            .into_iter()
            .map(str::to_string)
            .collect(),
        ..RankProfile::default()
    };

    let exact = ranker.analyze(&profile, "Data Analyst")?;
    assert_eq!(exact.career_title, "Data Analyst");
    assert!(exact.matched_skills.contains(&"python".to_string()));

    // Misspelled title resolves through fuzzy lookup
    let fuzzy = ranker.analyze(&profile, "Data Analist")?;
    assert_eq!(fuzzy.career_title, "Data Analyst");

    // Nothing close enough
    let missing = ranker.analyze(&profile, "Zookeeper");
    assert!(missing.is_err());
    Ok(())
}

#[tokio::test]
async fn test_chat_flow_reset_round_trip() -> Result<()> {
    let store = seeded_store().await?;
    let snapshot = Arc::new(store.load_snapshot().await?);
    let ranker = Arc::new(Ranker::new(
        snapshot,
        Arc::new(IndexHolder::empty()),
        None,
    ));
    let chat = ChatService::new(ranker, ExtractorConfig::default());

    let start = chat.start("it-session").await;
    assert_eq!(start.stage, Stage::Interests);
    assert_eq!(start.progress, 10);

    let turn = chat
        .process_turn("it-session", "I love coding and python")
        .await;
    assert_eq!(turn.stage, Stage::Skills);
    assert_eq!(turn.progress, 25);

    let summary = chat.summary("it-session").await.unwrap();
    assert!(summary
        .collected_data
        .interests
        .iter()
        .any(|i| i == "Technology"));

    // Reset drops the session; a new start reinitializes cleanly
    assert!(chat.reset("it-session"));
    assert!(chat.summary("it-session").await.is_none());
    let restart = chat.start("it-session").await;
    assert_eq!(restart.stage, Stage::Interests);
    let summary = chat.summary("it-session").await.unwrap();
    assert!(summary.collected_data.interests.is_empty());
    assert_eq!(summary.conversation_length, 1);
    Ok(())
}

#[tokio::test]
async fn test_corpus_export_import_round_trip() -> Result<()> {
    let store = seeded_store().await?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("corpus.json");

    let exported = store.export_json(&path).await?;
    assert_eq!(exported as i64, store.career_count().await?);

    let fresh = CorpusStore::connect("sqlite::memory:", 1).await?;
    let imported = fresh.import_json(&path).await?;
    assert_eq!(imported, exported);
    assert_eq!(fresh.career_count().await?, store.career_count().await?);
    Ok(())
}
