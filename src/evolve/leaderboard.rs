//! Persisted top-k leaderboard, one entry per problem.
//!
//! Full-rewrite, last-writer-wins store. Each update loads the file,
//! upserts, re-sorts, truncates to `k`, and rewrites atomically (temp file
//! + rename). Concurrent writers must be serialized by the caller; the
//! controller does so.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::schema::LeaderboardConfig;

/// Best-known result for one problem.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// Problem text; the leaderboard key.
    pub problem: String,
    /// Best fitness achieved.
    pub score: f64,
    /// Solved when the score crossed the configured threshold.
    pub status: SolveStatus,
    /// Artifact path of the best candidate.
    pub solution_file: PathBuf,
    /// Whether the best candidate descends from a mutation.
    pub mutation_used: bool,
}

/// Solved/unsolved marker derived from the score threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    Solved,
    Unsolved,
}

/// Leaderboard persistence errors. These surface to the caller; a corrupt
/// or unwritable store must not be papered over.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("leaderboard io: {0}")]
    Io(#[from] io::Error),
    #[error("leaderboard format: {0}")]
    Format(#[from] serde_json::Error),
}

/// On-disk value for one problem key.
#[derive(Serialize, Deserialize)]
struct StoredEntry {
    score: f64,
    status: SolveStatus,
    solution_file: PathBuf,
    mutation_used: bool,
}

/// Top-k leaderboard store.
pub struct LeaderboardStore {
    path: PathBuf,
    top_k: usize,
    solved_threshold: f64,
}

impl LeaderboardStore {
    /// Create a store from config.
    pub fn new(config: &LeaderboardConfig) -> Self {
        Self {
            path: config.path.clone(),
            top_k: config.top_k,
            solved_threshold: config.solved_threshold,
        }
    }

    /// Upsert the entry for `problem` and persist the re-ranked top k.
    pub fn update(
        &self,
        problem: &str,
        score: f64,
        solution_file: &Path,
        mutation_used: bool,
    ) -> Result<(), StoreError> {
        let mut entries = self.load()?;

        let status = if score >= self.solved_threshold {
            SolveStatus::Solved
        } else {
            SolveStatus::Unsolved
        };
        let entry = LeaderboardEntry {
            problem: problem.to_string(),
            score,
            status,
            solution_file: solution_file.to_path_buf(),
            mutation_used,
        };

        // Replacing in place keeps the original insertion position, which
        // is what breaks ties after the stable sort below.
        match entries.iter_mut().find(|e| e.problem == problem) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }

        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        entries.truncate(self.top_k);

        self.persist(&entries)
    }

    /// Load persisted entries; a missing or empty file is the empty map.
    pub fn load(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&text)?;
        map.into_iter()
            .map(|(problem, value)| {
                let stored: StoredEntry = serde_json::from_value(value)?;
                Ok(LeaderboardEntry {
                    problem,
                    score: stored.score,
                    status: stored.status,
                    solution_file: stored.solution_file,
                    mutation_used: stored.mutation_used,
                })
            })
            .collect()
    }

    fn persist(&self, entries: &[LeaderboardEntry]) -> Result<(), StoreError> {
        let mut map = serde_json::Map::new();
        for entry in entries {
            let stored = StoredEntry {
                score: entry.score,
                status: entry.status,
                solution_file: entry.solution_file.clone(),
                mutation_used: entry.mutation_used,
            };
            map.insert(entry.problem.clone(), serde_json::to_value(stored)?);
        }

        let json = serde_json::to_string_pretty(&serde_json::Value::Object(map))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_at(dir: &tempfile::TempDir, k: usize) -> LeaderboardStore {
        LeaderboardStore::new(&LeaderboardConfig {
            path: dir.path().join("leaderboard.json"),
            top_k: k,
            solved_threshold: 90.0,
        })
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_at(&dir, 5).load().unwrap().is_empty());
    }

    #[test]
    fn test_top_k_retention() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir, 3);
        let file = Path::new("s.py");

        store.update("Problem 1", 100.0, file, false).unwrap();
        store.update("Problem 2", 80.0, file, false).unwrap();
        store.update("Problem 3", 90.0, file, false).unwrap();
        store.update("Problem 4", 70.0, file, false).unwrap();

        let entries = store.load().unwrap();
        assert_eq!(entries.len(), 3);
        let scores: Vec<f64> = entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![100.0, 90.0, 80.0]);
        assert!(!entries.iter().any(|e| e.problem == "Problem 4"));
    }

    #[test]
    fn test_upsert_overwrites_single_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir, 5);

        store.update("Problem", 40.0, Path::new("a.py"), false).unwrap();
        store.update("Problem", 95.0, Path::new("b.py"), true).unwrap();

        let entries = store.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].score, 95.0);
        assert_eq!(entries[0].status, SolveStatus::Solved);
        assert_eq!(entries[0].solution_file, PathBuf::from("b.py"));
        assert!(entries[0].mutation_used);
    }

    #[test]
    fn test_solved_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir, 5);
        let file = Path::new("s.py");

        store.update("Low", 89.9, file, false).unwrap();
        store.update("High", 90.0, file, false).unwrap();

        let entries = store.load().unwrap();
        let by_name = |name: &str| entries.iter().find(|e| e.problem == name).unwrap();
        assert_eq!(by_name("Low").status, SolveStatus::Unsolved);
        assert_eq!(by_name("High").status, SolveStatus::Solved);
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir, 5);
        let file = Path::new("s.py");

        store.update("First", 50.0, file, false).unwrap();
        store.update("Second", 50.0, file, false).unwrap();
        store.update("Third", 60.0, file, false).unwrap();

        let entries = store.load().unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.problem.as_str()).collect();
        assert_eq!(names, vec!["Third", "First", "Second"]);
    }

    #[test]
    fn test_persisted_file_is_valid_json_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir, 5);

        store.update("Problem", 75.0, Path::new("s.py"), true).unwrap();

        let text = fs::read_to_string(dir.path().join("leaderboard.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["Problem"]["score"], 75.0);
        assert_eq!(value["Problem"]["status"], "unsolved");
        assert_eq!(value["Problem"]["mutation_used"], true);
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        fs::write(&path, "").unwrap();

        let store = LeaderboardStore::new(&LeaderboardConfig {
            path,
            top_k: 5,
            solved_threshold: 90.0,
        });
        assert!(store.load().unwrap().is_empty());
    }

    proptest::proptest! {
        /// After any update sequence the store holds at most k entries,
        /// sorted by score descending.
        #[test]
        fn prop_top_k_sorted(
            updates in proptest::collection::vec((0usize..8, 0.0f64..100.0), 1..24),
            k in 1usize..6,
        ) {
            let dir = tempfile::tempdir().unwrap();
            let store = store_at(&dir, k);

            for (problem, score) in updates {
                store
                    .update(&format!("Problem {problem}"), score, Path::new("s.py"), false)
                    .unwrap();
            }

            let entries = store.load().unwrap();
            proptest::prop_assert!(entries.len() <= k);
            proptest::prop_assert!(
                entries.windows(2).all(|pair| pair[0].score >= pair[1].score)
            );
        }
    }

    #[test]
    fn test_corrupt_file_surfaces_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        fs::write(&path, "not json").unwrap();

        let store = LeaderboardStore::new(&LeaderboardConfig {
            path,
            top_k: 5,
            solved_threshold: 90.0,
        });
        assert!(matches!(store.load(), Err(StoreError::Format(_))));
    }
}
