//! Tag title resolution: human-entered titles to canonical tag ids.
//!
//! # Responsibility
//! - Trim, drop blanks, and deduplicate incoming title lists.
//! - Find-or-create each canonical tag, retrying lookups that lose a
//!   concurrent creation race.
//!
//! # Invariants
//! - Matching is case-sensitive after a surrounding-whitespace trim; `"ai"`
//!   and `"AI"` are distinct tags, `" ai "` and `"ai"` are the same tag.
//! - The returned id list never contains duplicates; first-occurrence
//!   order is kept.
//! - A lost insert race is resolved by re-reading, never surfaced to the
//!   caller.

use std::collections::BTreeSet;

use crate::model::content::TagId;
use crate::repo::tag_repo::TagRepository;
use crate::repo::{RepoError, RepoResult};

/// Resolves tag titles against one canonical tag store.
pub struct TagResolver<'r, R: TagRepository> {
    repo: &'r R,
}

impl<'r, R: TagRepository> TagResolver<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    /// Maps an ordered title list to deduplicated canonical tag ids.
    ///
    /// Blank and whitespace-only entries are dropped silently.
    pub fn resolve(&self, titles: &[String]) -> RepoResult<Vec<TagId>> {
        let mut ids = Vec::new();
        let mut seen = BTreeSet::new();

        for raw in titles {
            let title = raw.trim();
            if title.is_empty() {
                continue;
            }

            let tag_id = self.find_or_create(title)?;
            if seen.insert(tag_id) {
                ids.push(tag_id);
            }
        }

        Ok(ids)
    }

    fn find_or_create(&self, title: &str) -> RepoResult<TagId> {
        if let Some(tag_id) = self.repo.find_tag_by_title(title)? {
            return Ok(tag_id);
        }

        match self.repo.insert_tag(title) {
            Ok(tag_id) => Ok(tag_id),
            // Lost the creation race: another request (possibly another
            // process) inserted the title between lookup and insert.
            Err(RepoError::Conflict(_)) => {
                self.repo.find_tag_by_title(title)?.ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "tag `{title}` missing after insert conflict"
                    ))
                })
            }
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TagResolver;
    use crate::db::open_db_in_memory;
    use crate::repo::tag_repo::{SqliteTagRepository, TagRepository};

    fn titles(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn drops_blank_titles_and_deduplicates_ids() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteTagRepository::new(&conn);
        let resolver = TagResolver::new(&repo);

        let ids = resolver
            .resolve(&titles(&["rust", "", "   ", "rust", " rust "]))
            .unwrap();
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn trims_but_keeps_case_distinctions() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteTagRepository::new(&conn);
        let resolver = TagResolver::new(&repo);

        let ids = resolver.resolve(&titles(&["ai", "AI", " ai ", ""])).unwrap();
        assert_eq!(ids.len(), 2);

        let stored: Vec<String> = repo
            .list_tags()
            .unwrap()
            .into_iter()
            .map(|tag| tag.title)
            .collect();
        assert_eq!(stored, vec!["AI".to_string(), "ai".to_string()]);
    }

    #[test]
    fn reuses_existing_tags_across_calls() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteTagRepository::new(&conn);
        let resolver = TagResolver::new(&repo);

        let first = resolver.resolve(&titles(&["music"])).unwrap();
        let second = resolver.resolve(&titles(&["music", "films"])).unwrap();
        assert_eq!(first[0], second[0]);
        assert_eq!(repo.list_tags().unwrap().len(), 2);
    }
}
