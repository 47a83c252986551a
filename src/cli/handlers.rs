//! CLI command handlers

use std::sync::Arc;

use tracing::info;
use tracing::warn;

use crate::config::AppConfig;
use crate::corpus::CorpusStore;
use crate::embeddings::EmbeddingService;
use crate::errors::CareerPathError;
use crate::extract;
use crate::extract::ExtractorConfig;
use crate::index::IndexHolder;
use crate::index::VectorIndex;
use crate::matching::RankProfile;
use crate::matching::Ranker;
use crate::Result;

/// Start the HTTP API server
pub async fn handle_serve(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    println!("Starting careerpath API server on {host}:{port}");
    crate::api::serve_api(config, host, port).await
}

/// Embed the corpus and write the index artifact
pub async fn handle_index_build(config: &AppConfig) -> Result<()> {
    let store = CorpusStore::from_config(config).await?;
    let snapshot = store.load_snapshot().await?;
    if snapshot.is_empty() {
        return Err(CareerPathError::Custom(
            "Corpus is empty; seed it first with `corpus seed`".to_string(),
        ));
    }

    println!("Embedding {} careers...", snapshot.len());
    let embeddings = EmbeddingService::new(config)?;
    let index = VectorIndex::build(&snapshot, &embeddings).await?;
    index.save(&config.index.artifact_path)?;

    println!(
        "Index built: {} careers, dimension {} -> {}",
        index.len(),
        index.dimension(),
        config.index.artifact_path
    );
    Ok(())
}

/// Show artifact metadata
pub fn handle_index_info(config: &AppConfig) -> Result<()> {
    match VectorIndex::load(&config.index.artifact_path) {
        Ok(index) => {
            println!("Index artifact: {}", config.index.artifact_path);
            println!("  Careers:   {}", index.len());
            println!("  Dimension: {}", index.dimension());
        }
        Err(e) => {
            println!(
                "No usable index artifact at {} ({e}); matching runs in fallback mode",
                config.index.artifact_path
            );
        }
    }
    Ok(())
}

/// Rank careers for a skill list or resume file
pub async fn handle_match(
    config: &AppConfig,
    skills: Option<String>,
    resume: Option<String>,
    top_n: usize,
    no_semantic: bool,
) -> Result<()> {
    let extractor = ExtractorConfig::default();
    let profile = build_profile(skills.as_deref(), resume.as_deref(), &extractor)?;
    if profile.skills.is_empty() && profile.query_text.is_empty() {
        return Err(CareerPathError::Custom(
            "Provide --skills and/or --resume".to_string(),
        ));
    }

    let store = CorpusStore::from_config(config).await?;
    let snapshot = Arc::new(store.load_snapshot().await?);
    let index = Arc::new(IndexHolder::from_artifact(&config.index.artifact_path));
    let embeddings = match EmbeddingService::new(config) {
        Ok(service) => Some(Arc::new(service)),
        Err(e) => {
            warn!("Embedding service unavailable ({e})");
            None
        }
    };
    let ranker = Ranker::new(snapshot, index, embeddings);

    let ranked = if no_semantic {
        ranker.rank_fallback_only(&profile, top_n)
    } else {
        ranker.rank(&profile, top_n).await
    };

    println!("Method: {}", ranked.method.label());
    if ranked.results.is_empty() {
        println!("No careers matched above the score threshold.");
    }
    for (i, result) in ranked.results.iter().enumerate() {
        println!(
            "{}. {} - {:.1}% ({} confidence)",
            i + 1,
            result.career_title,
            result.score * 100.0,
            result.confidence.label()
        );
        if !result.matched_skills.is_empty() {
            println!("   matched: {}", join_skills(&result.matched_skills));
        }
        if !result.missing_skills.is_empty() {
            println!("   missing: {}", join_skills(&result.missing_skills));
        }
        for reason in &result.explanation {
            println!("   - {reason}");
        }
    }
    Ok(())
}

/// Analyze fit against one named career
pub async fn handle_analyze(
    config: &AppConfig,
    career: String,
    skills: Option<String>,
    resume: Option<String>,
) -> Result<()> {
    let extractor = ExtractorConfig::default();
    let profile = build_profile(skills.as_deref(), resume.as_deref(), &extractor)?;

    let store = CorpusStore::from_config(config).await?;
    let snapshot = Arc::new(store.load_snapshot().await?);
    let ranker = Ranker::new(snapshot, Arc::new(IndexHolder::empty()), None);

    let analysis = ranker.analyze(&profile, &career)?;
    println!("Career: {}", analysis.career_title);
    println!(
        "Match:  {:.1}% ({} of {} required skills)",
        analysis.match_percentage * 100.0,
        analysis.matched_skills.len(),
        analysis.total_required
    );
    if !analysis.matched_skills.is_empty() {
        println!("Matched: {}", join_skills(&analysis.matched_skills));
    }
    if !analysis.missing_skills.is_empty() {
        println!("Missing: {}", join_skills(&analysis.missing_skills));
    }
    println!("Key skills: {}", analysis.key_skills.join(", "));
    Ok(())
}

/// Seed the database with the sample corpus
pub async fn handle_corpus_seed(config: &AppConfig) -> Result<()> {
    let store = CorpusStore::from_config(config).await?;
    let inserted = store.seed_sample_data().await?;
    let total = store.career_count().await?;
    println!("Seeded {inserted} careers ({total} total in database)");
    Ok(())
}

/// Export the corpus as JSON
pub async fn handle_corpus_export(config: &AppConfig, path: String) -> Result<()> {
    let store = CorpusStore::from_config(config).await?;
    let exported = store.export_json(&path).await?;
    println!("Exported {exported} careers to {path}");
    Ok(())
}

/// Import careers from a JSON export
pub async fn handle_corpus_import(config: &AppConfig, path: String) -> Result<()> {
    let store = CorpusStore::from_config(config).await?;
    let imported = store.import_json(&path).await?;
    println!("Imported {imported} careers from {path}");
    Ok(())
}

/// Direct skill-list search over the corpus
pub async fn handle_corpus_search(config: &AppConfig, skills: String) -> Result<()> {
    let wanted: std::collections::BTreeSet<String> = skills
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if wanted.is_empty() {
        return Err(CareerPathError::Custom(
            "Provide at least one skill".to_string(),
        ));
    }

    let store = CorpusStore::from_config(config).await?;
    let snapshot = store.load_snapshot().await?;
    let hits = snapshot.search_by_skills(&wanted, 1);

    if hits.is_empty() {
        println!("No careers share any of those skills.");
    }
    for hit in hits {
        println!(
            "{} - {}/{} skills ({:.0}%): {}",
            hit.career_title,
            hit.match_count,
            hit.total_skills,
            hit.match_percentage * 100.0,
            join_skills(&hit.matching_skills)
        );
    }
    Ok(())
}

fn join_skills(skills: &std::collections::BTreeSet<String>) -> String {
    skills.iter().cloned().collect::<Vec<_>>().join(", ")
}

fn build_profile(
    skills: Option<&str>,
    resume: Option<&str>,
    extractor: &ExtractorConfig,
) -> Result<RankProfile> {
    let mut profile = RankProfile::default();

    if let Some(path) = resume {
        let text = std::fs::read_to_string(path)?;
        let parsed = extract::parse_resume_text(&text, extractor);
        profile.query_text = parsed.query_text();
        profile.skills = parsed.skills;
        profile.interests = extract::extract_interests(&text, extractor);
        info!("Parsed {} skills from {path}", profile.skills.len());
    }

    if let Some(list) = skills {
        for skill in list.split(',') {
            let skill = skill.trim().to_lowercase();
            if !skill.is_empty() {
                profile.skills.insert(skill);
            }
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
    Ok(profile)
}
