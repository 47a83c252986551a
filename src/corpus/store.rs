//! SQLite-backed corpus storage.
//!
//! The ingestion pipeline writes one row per (career, skill) mention; this
//! store re-aggregates those rows into a [`CorpusSnapshot`] on load.

use std::collections::BTreeMap;
use std::path::Path;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::Row;
use sqlx::SqlitePool;
use tracing::info;

use super::CorpusSnapshot;
use crate::config::AppConfig;
use crate::errors::Result;

pub struct CorpusStore {
    pool: SqlitePool,
}

impl CorpusStore {
    /// Connect to the corpus database and ensure the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        Self::connect(config.database_url(), config.database.max_connections).await
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r"CREATE TABLE IF NOT EXISTS skills (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                career TEXT NOT NULL,
                skill TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Add a career with its skills, skipping (career, skill) pairs that
    /// already exist.
    pub async fn add_career_skills(&self, career: &str, skills: &[String]) -> Result<()> {
        let career = career.trim();
        for skill in skills {
            let skill = skill.trim().to_lowercase();
            if skill.len() <= 1 {
                continue;
            }
            let exists =
                sqlx::query("SELECT id FROM skills WHERE career = ?1 AND skill = ?2")
                    .bind(career)
                    .bind(&skill)
                    .fetch_optional(&self.pool)
                    .await?;
            if exists.is_none() {
                sqlx::query("INSERT INTO skills (career, skill) VALUES (?1, ?2)")
                    .bind(career)
                    .bind(&skill)
                    .execute(&self.pool)
                    .await?;
            }
        }
        Ok(())
    }

    /// Load an immutable snapshot of the whole corpus, aggregated per title
    /// in first-insertion order.
    pub async fn load_snapshot(&self) -> Result<CorpusSnapshot> {
        let rows = sqlx::query(
            r"SELECT career, GROUP_CONCAT(skill) AS skills
              FROM skills
              GROUP BY career
              ORDER BY MIN(id)",
        )
        .fetch_all(&self.pool)
        .await?;

        let records: Vec<(String, String)> = rows
            .into_iter()
            .map(|row| {
                let career: String = row.get("career");
                let skills: Option<String> = row.get("skills");
                (career, skills.unwrap_or_default())
            })
            .collect();

        let snapshot = CorpusSnapshot::from_records(records);
        info!("Loaded corpus snapshot with {} careers", snapshot.len());
        Ok(snapshot)
    }

    /// Number of distinct careers in storage.
    pub async fn career_count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(DISTINCT career) AS n FROM skills")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Seed the store with a small starter corpus.
    pub async fn seed_sample_data(&self) -> Result<usize> {
        let sample: &[(&str, &[&str])] = &[
            (
                "Software Engineer",
                &["python", "javascript", "java", "sql", "git", "agile", "problem solving"],
            ),
            (
                "Data Scientist",
                &["python", "r", "sql", "machine learning", "statistics", "pandas", "numpy"],
            ),
            (
                "Frontend Developer",
                &["javascript", "html", "css", "react", "angular", "vue", "responsive design"],
            ),
            (
                "Backend Developer",
                &["python", "java", "node.js", "sql", "api", "microservices", "docker"],
            ),
            (
                "DevOps Engineer",
                &["docker", "kubernetes", "aws", "jenkins", "git", "linux", "ci/cd"],
            ),
            (
                "Product Manager",
                &["project management", "agile", "scrum", "user research", "data analysis", "communication"],
            ),
            (
                "UX Designer",
                &["user research", "wireframing", "prototyping", "figma", "user testing", "design thinking"],
            ),
            (
                "Data Analyst",
                &["sql", "excel", "python", "tableau", "power bi", "statistics", "data visualization"],
            ),
            (
                "Marketing Manager",
                &["digital marketing", "seo", "social media", "content marketing", "analytics", "strategy"],
            ),
            (
                "Sales Representative",
                &["sales", "crm", "negotiation", "communication", "lead generation", "customer service"],
            ),
        ];

        for (career, skills) in sample {
            let skills: Vec<String> = skills.iter().map(|s| (*s).to_string()).collect();
            self.add_career_skills(career, &skills).await?;
        }
        info!("Seeded {} sample careers", sample.len());
        Ok(sample.len())
    }

    /// Export the corpus as a career → skills JSON map.
    pub async fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let snapshot = self.load_snapshot().await?;
        let map: BTreeMap<&str, Vec<&str>> = snapshot
            .all_entries()
            .iter()
            .map(|e| {
                (
                    e.career_title.as_str(),
                    e.skills.iter().map(String::as_str).collect(),
                )
            })
            .collect();
        let json = serde_json::to_string_pretty(&map)?;
        std::fs::write(path, json)?;
        Ok(map.len())
    }

    /// Import careers from a career → skills JSON map.
    pub async fn import_json<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let content = std::fs::read_to_string(path)?;
        let map: BTreeMap<String, Vec<String>> = serde_json::from_str(&content)?;
        for (career, skills) in &map {
            self.add_career_skills(career, skills).await?;
        }
        Ok(map.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> CorpusStore {
        CorpusStore::connect("sqlite::memory:", 1).await.unwrap()
    }

    #[tokio::test]
    async fn test_add_and_load_snapshot() {
        let store = memory_store().await;
        store
            .add_career_skills("Data Analyst", &["SQL".to_string(), "excel".to_string()])
            .await
            .unwrap();
        store
            .add_career_skills("Data Analyst", &["sql".to_string(), "python".to_string()])
            .await
            .unwrap();

        let snapshot = store.load_snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        let entry = snapshot.entry_for("data analyst").unwrap();
        assert_eq!(entry.skills.len(), 3);
    }

    #[tokio::test]
    async fn test_seed_sample_data() {
        let store = memory_store().await;
        let seeded = store.seed_sample_data().await.unwrap();
        assert_eq!(seeded, 10);
        assert_eq!(store.career_count().await.unwrap(), 10);

        let snapshot = store.load_snapshot().await.unwrap();
        // Insertion order follows seeding order
        assert_eq!(snapshot.all_entries()[0].career_title, "Software Engineer");
        assert!(snapshot.document_frequency("python") >= 3);
    }

    #[tokio::test]
    async fn test_empty_store_loads_empty_snapshot() {
        let store = memory_store().await;
        let snapshot = store.load_snapshot().await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let store = memory_store().await;
        store.seed_sample_data().await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let exported = store.export_json(&path).await.unwrap();
        assert_eq!(exported, 10);

        let other = memory_store().await;
        let imported = other.import_json(&path).await.unwrap();
        assert_eq!(imported, 10);
        assert_eq!(other.career_count().await.unwrap(), 10);
    }
}
