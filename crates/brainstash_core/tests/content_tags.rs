use std::sync::{Arc, Barrier};
use std::thread;

use brainstash_core::db::{open_db, open_db_in_memory};
use brainstash_core::{
    ContentKind, ContentService, ContentServiceError, NewContent, SqliteContentRepository,
    SqliteTagRepository, TagRepository, TagResolver,
};
use rusqlite::params;
use uuid::Uuid;

fn new_content(title: &str, tags: &[&str]) -> NewContent {
    NewContent {
        link: format!("https://example.com/{}", title.replace(' ', "-")),
        kind: ContentKind::Article,
        title: title.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

#[test]
fn tag_canonicalization_trims_drops_blanks_and_keeps_case() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = Uuid::new_v4();

    let created = {
        let repo = SqliteContentRepository::new(&mut conn);
        let mut service = ContentService::new(repo);
        service
            .create_content(owner, new_content("ml reading list", &["ai", "AI", " ai ", ""]))
            .unwrap()
    };

    // "ai" and " ai " collapse after trim; "AI" stays distinct; "" drops.
    assert_eq!(created.tags, vec!["AI".to_string(), "ai".to_string()]);

    let stored: Vec<String> = {
        let repo = SqliteTagRepository::new(&conn);
        repo.list_tags()
            .unwrap()
            .into_iter()
            .map(|tag| tag.title)
            .collect()
    };
    assert_eq!(stored, vec!["AI".to_string(), "ai".to_string()]);
}

#[test]
fn duplicate_titles_across_contents_share_one_tag_row() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = Uuid::new_v4();

    {
        let repo = SqliteContentRepository::new(&mut conn);
        let mut service = ContentService::new(repo);
        service
            .create_content(owner, new_content("first", &["rust"]))
            .unwrap();
        service
            .create_content(owner, new_content("second", &["rust", "tooling"]))
            .unwrap();
    }

    let tag_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM tags;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(tag_count, 2);
}

#[test]
fn concurrent_resolution_of_one_new_title_yields_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    drop(open_db(&path).unwrap());

    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for _ in 0..2 {
        let barrier = Arc::clone(&barrier);
        let path = path.clone();
        handles.push(thread::spawn(move || {
            let conn = open_db(&path).unwrap();
            let repo = SqliteTagRepository::new(&conn);
            let resolver = TagResolver::new(&repo);
            barrier.wait();
            resolver.resolve(&["contended".to_string()]).unwrap()
        }));
    }

    let ids: Vec<Vec<i64>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert_eq!(ids[0], ids[1]);

    let conn = open_db(&path).unwrap();
    let tag_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM tags WHERE title = 'contended';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tag_count, 1);
}

#[test]
fn blank_title_or_link_is_rejected_before_any_mutation() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = Uuid::new_v4();

    {
        let repo = SqliteContentRepository::new(&mut conn);
        let mut service = ContentService::new(repo);

        let err = service
            .create_content(owner, new_content("   ", &["rust"]))
            .unwrap_err();
        assert!(matches!(err, ContentServiceError::InvalidInput(_)));

        let mut input = new_content("valid title", &["rust"]);
        input.link = "  ".to_string();
        let err = service.create_content(owner, input).unwrap_err();
        assert!(matches!(err, ContentServiceError::InvalidInput(_)));
    }

    let content_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM contents;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(content_count, 0);
    let tag_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM tags;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(tag_count, 0);
}

#[test]
fn list_returns_owner_rows_newest_first() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let (first_id, second_id) = {
        let repo = SqliteContentRepository::new(&mut conn);
        let mut service = ContentService::new(repo);
        let first = service
            .create_content(owner, new_content("older", &[]))
            .unwrap();
        let second = service
            .create_content(owner, new_content("newer", &[]))
            .unwrap();
        service
            .create_content(stranger, new_content("foreign", &[]))
            .unwrap();
        (first.content_id.to_string(), second.content_id.to_string())
    };

    conn.execute(
        "UPDATE contents SET updated_at = 2000 WHERE uuid = ?1;",
        params![second_id],
    )
    .unwrap();
    conn.execute(
        "UPDATE contents SET updated_at = 1000 WHERE uuid = ?1;",
        params![first_id],
    )
    .unwrap();

    let repo = SqliteContentRepository::new(&mut conn);
    let service = ContentService::new(repo);
    let listed = service.list_contents(owner).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].content_id.to_string(), second_id);
    assert_eq!(listed[1].content_id.to_string(), first_id);
}

#[test]
fn delete_is_owner_scoped() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let repo = SqliteContentRepository::new(&mut conn);
    let mut service = ContentService::new(repo);
    let created = service
        .create_content(owner, new_content("to delete", &["tmp"]))
        .unwrap();

    let err = service
        .delete_content(stranger, created.content_id)
        .unwrap_err();
    assert!(matches!(err, ContentServiceError::ContentNotFound(_)));

    service.delete_content(owner, created.content_id).unwrap();
    assert!(service.list_contents(owner).unwrap().is_empty());

    let err = service
        .delete_content(owner, created.content_id)
        .unwrap_err();
    assert!(matches!(err, ContentServiceError::ContentNotFound(_)));
}
