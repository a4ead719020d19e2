use brainstash_core::db::open_db_in_memory;
use brainstash_core::{
    ContentKind, ContentService, NewContent, ShareService, ShareServiceError,
    SqliteContentRepository, SqliteShareLinkRepository,
};
use uuid::Uuid;

fn article(title: &str) -> NewContent {
    NewContent {
        link: format!("https://example.com/{}", title.replace(' ', "-")),
        kind: ContentKind::Article,
        title: title.to_string(),
        tags: vec![],
    }
}

#[test]
fn issued_token_is_32_hex_chars_and_resolves_to_owner() {
    let conn = open_db_in_memory().unwrap();
    let owner = Uuid::new_v4();
    let service = ShareService::new(SqliteShareLinkRepository::new(&conn));

    let token = service.issue(owner).unwrap();
    assert_eq!(token.len(), 32);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    assert_eq!(service.resolve(&token).unwrap(), owner);
}

#[test]
fn second_issue_without_revoke_fails() {
    let conn = open_db_in_memory().unwrap();
    let owner = Uuid::new_v4();
    let service = ShareService::new(SqliteShareLinkRepository::new(&conn));

    service.issue(owner).unwrap();
    let err = service.issue(owner).unwrap_err();
    assert!(matches!(err, ShareServiceError::AlreadyIssued(id) if id == owner));
}

#[test]
fn revoke_then_issue_returns_a_fresh_token() {
    let conn = open_db_in_memory().unwrap();
    let owner = Uuid::new_v4();
    let service = ShareService::new(SqliteShareLinkRepository::new(&conn));

    let first = service.issue(owner).unwrap();
    service.revoke(owner).unwrap();

    let err = service.resolve(&first).unwrap_err();
    assert!(matches!(err, ShareServiceError::LinkNotFound));

    let second = service.issue(owner).unwrap();
    assert_ne!(first, second);
    assert_eq!(service.resolve(&second).unwrap(), owner);
}

#[test]
fn revoke_without_active_link_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ShareService::new(SqliteShareLinkRepository::new(&conn));

    let err = service.revoke(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, ShareServiceError::LinkNotFound));
}

#[test]
fn unknown_and_malformed_tokens_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ShareService::new(SqliteShareLinkRepository::new(&conn));

    for token in [
        "0123456789abcdef0123456789abcdef", // well-formed but never issued
        "not-a-token",
        "",
        "0123456789ABCDEF0123456789ABCDEF", // wrong case
    ] {
        let err = service.resolve(token).unwrap_err();
        assert!(matches!(err, ShareServiceError::LinkNotFound), "token: {token:?}");
    }
}

#[test]
fn shared_view_tracks_owner_content_live() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let token = {
        let service = ShareService::new(SqliteShareLinkRepository::new(&conn));
        service.issue(owner).unwrap()
    };

    {
        let service = ShareService::new(SqliteShareLinkRepository::new(&conn));
        assert!(service.shared_contents(&token).unwrap().is_empty());
    }

    // Content created after issuance must appear on the next read.
    let created_id = {
        let repo = SqliteContentRepository::new(&mut conn);
        let mut contents = ContentService::new(repo);
        contents
            .create_content(stranger, article("not yours"))
            .unwrap();
        contents
            .create_content(owner, article("added later"))
            .unwrap()
            .content_id
    };

    let service = ShareService::new(SqliteShareLinkRepository::new(&conn));
    let shared = service.shared_contents(&token).unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].content_id, created_id);
    assert_eq!(shared[0].owner_id, owner);
}
