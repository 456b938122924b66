//! The content store: ordered course and challenge collections.
//!
//! Built once at start-up (from a content directory or in memory) and never
//! mutated afterwards.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::fs;

use crate::domain::{Challenge, Course};

/// Collection file for courses, relative to the content directory
pub const COURSES_FILE: &str = "courses.yaml";

/// Collection file for challenges, relative to the content directory
pub const CHALLENGES_FILE: &str = "challenges.yaml";

/// Errors from content lookups and store construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("Course not found: {0}")]
    CourseNotFound(String),

    #[error("Duplicate {kind} slug: {slug}")]
    DuplicateSlug { kind: &'static str, slug: String },

    #[error("Content store has not been installed")]
    NotInitialized,

    #[error("Content store is already installed")]
    AlreadyInstalled,
}

/// Read-only course and challenge collections
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    courses: Vec<Course>,
    challenges: Vec<Challenge>,
}

impl ContentStore {
    /// Build a store from in-memory collections.
    ///
    /// Slugs must be unique within each collection.
    pub fn new(courses: Vec<Course>, challenges: Vec<Challenge>) -> Result<Self, ContentError> {
        ensure_unique("course", courses.iter().map(|c| c.slug.as_str()))?;
        ensure_unique("challenge", challenges.iter().map(|c| c.slug.as_str()))?;

        Ok(Self {
            courses,
            challenges,
        })
    }

    /// Load a store from a content directory.
    ///
    /// ```text
    /// <dir>/
    /// ├── courses.yaml        # sequence of courses
    /// ├── courses/*.yaml      # one course per file, appended by file name
    /// ├── challenges.yaml     # sequence of challenges
    /// └── challenges/*.yaml   # one challenge per file, appended by file name
    /// ```
    ///
    /// Missing files and directories yield empty collections.
    pub async fn load(dir: &Path) -> Result<Self> {
        let courses: Vec<Course> = load_collection(dir, COURSES_FILE, "courses").await?;
        let challenges: Vec<Challenge> =
            load_collection(dir, CHALLENGES_FILE, "challenges").await?;

        let store = Self::new(courses, challenges)
            .with_context(|| format!("Invalid content in {}", dir.display()))?;

        tracing::info!(
            courses = store.courses.len(),
            challenges = store.challenges.len(),
            "Loaded content from {}",
            dir.display()
        );

        Ok(store)
    }

    /// Borrow the course collection in source order
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Borrow the challenge collection in source order
    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    /// Number of courses
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Number of challenges
    pub fn challenge_count(&self) -> usize {
        self.challenges.len()
    }
}

fn ensure_unique<'a>(
    kind: &'static str,
    slugs: impl Iterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for slug in slugs {
        if !seen.insert(slug) {
            return Err(ContentError::DuplicateSlug {
                kind,
                slug: slug.to_string(),
            });
        }
    }
    Ok(())
}

/// Read `<dir>/<file>` as a sequence, then append `<dir>/<subdir>/*.yaml`
/// entries sorted by file name.
async fn load_collection<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    subdir: &str,
) -> Result<Vec<T>> {
    let mut items = Vec::new();

    let path = dir.join(file);
    let exists = fs::try_exists(&path)
        .await
        .with_context(|| format!("Failed to check {}", path.display()))?;
    if exists {
        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        // An empty file is an empty collection
        if !content.trim().is_empty() {
            let parsed: Vec<T> = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            items.extend(parsed);
        }
    }

    for entry in entry_files(&dir.join(subdir)).await? {
        let content = fs::read_to_string(&entry)
            .await
            .with_context(|| format!("Failed to read {}", entry.display()))?;
        let item: T = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", entry.display()))?;
        items.push(item);
    }

    Ok(items)
}

/// `*.yaml` / `*.yml` / `*.json` files directly under `dir`, sorted by name
async fn entry_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let is_dir = fs::metadata(dir).await.map(|m| m.is_dir()).unwrap_or(false);
    if !is_dir {
        return Ok(Vec::new());
    }

    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();

    for ext in ["yaml", "yml", "json"] {
        let pattern = format!("{}/*.{}", escaped, ext);
        for entry in glob::glob(&pattern).context("Invalid content glob pattern")? {
            files.push(entry.context("Failed to read content directory entry")?);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_course_slug_rejected() {
        let result = ContentStore::new(
            vec![Course::new("rust"), Course::new("rust")],
            Vec::new(),
        );

        assert_eq!(
            result.unwrap_err(),
            ContentError::DuplicateSlug {
                kind: "course",
                slug: "rust".to_string()
            }
        );
    }

    #[test]
    fn test_same_slug_allowed_across_collections() {
        let store =
            ContentStore::new(vec![Course::new("anchor")], vec![Challenge::new("anchor")])
                .unwrap();

        assert_eq!(store.course_count(), 1);
        assert_eq!(store.challenge_count(), 1);
    }

    #[tokio::test]
    async fn test_load_missing_dir_is_empty() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = ContentStore::load(&temp.path().join("nope")).await.unwrap();

        assert_eq!(store.course_count(), 0);
        assert_eq!(store.challenge_count(), 0);
    }

    #[tokio::test]
    async fn test_entry_path_that_is_a_file_is_ignored() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("courses.yaml"), "- slug: anchor\n").unwrap();
        std::fs::write(temp.path().join("courses"), "not a directory").unwrap();

        let store = ContentStore::load(temp.path()).await.unwrap();

        assert_eq!(store.course_count(), 1);
        assert_eq!(store.courses()[0].slug, "anchor");
    }
}
