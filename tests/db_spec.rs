use jotter::db::Database;
use jotter::models::*;

fn setup() -> Database {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    db
}

fn create_simple(db: &Database, title: &str, content: &str) -> Note {
    db.create_note(title.to_string(), content.to_string(), vec![], None, None)
        .expect("Failed to create note")
}

mod open {
    use super::*;

    #[test]
    fn opens_on_disk_and_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("jotter.db");

        let db = Database::open(path).unwrap();
        db.migrate().unwrap();
        let created = create_simple(&db, "Persisted", "On disk");

        assert_eq!(db.get_note(created.id).unwrap().unwrap().title, "Persisted");
    }
}

mod create_and_get {
    use super::*;

    #[test]
    fn create_then_get_returns_matching_note() {
        let db = setup();
        let created = create_simple(&db, "Groceries", "Milk and eggs");

        let fetched = db.get_note(created.id).unwrap().expect("note missing");
        assert_eq!(fetched.title, "Groceries");
        assert_eq!(fetched.content, "Milk and eggs");
        assert!(fetched.tags.is_empty());
    }

    #[test]
    fn timestamps_are_equal_at_creation() {
        let db = setup();
        let created = create_simple(&db, "A", "B");

        let fetched = db.get_note(created.id).unwrap().unwrap();
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[test]
    fn get_unknown_id_returns_none() {
        let db = setup();
        assert!(db.get_note(999).unwrap().is_none());
    }

    #[test]
    fn stores_tags_and_event_fields() {
        let db = setup();
        let created = db
            .create_note(
                "Meeting".to_string(),
                "With Bob".to_string(),
                vec!["work".to_string(), "urgent".to_string()],
                Some("2026-09-01".to_string()),
                Some("15:00".to_string()),
            )
            .unwrap();

        let fetched = db.get_note(created.id).unwrap().unwrap();
        assert_eq!(fetched.tags, vec!["work", "urgent"]);
        assert_eq!(fetched.event_date.as_deref(), Some("2026-09-01"));
        assert_eq!(fetched.event_time.as_deref(), Some("15:00"));
    }
}

mod update {
    use super::*;

    #[test]
    fn content_only_update_preserves_other_fields() {
        let db = setup();
        let created = db
            .create_note(
                "Title".to_string(),
                "Old content".to_string(),
                vec!["keep".to_string()],
                Some("2026-09-01".to_string()),
                Some("09:00".to_string()),
            )
            .unwrap();

        let updated = db
            .update_note(
                created.id,
                UpdateNoteInput {
                    content: Some("New content".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .expect("note missing");

        assert_eq!(updated.title, "Title");
        assert_eq!(updated.content, "New content");
        assert_eq!(updated.tags, vec!["keep"]);
        assert_eq!(updated.event_date.as_deref(), Some("2026-09-01"));
        assert_eq!(updated.event_time.as_deref(), Some("09:00"));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[test]
    fn explicit_null_clears_tri_state_fields() {
        let db = setup();
        let created = db
            .create_note(
                "T".to_string(),
                "C".to_string(),
                vec!["a".to_string()],
                Some("2026-09-01".to_string()),
                None,
            )
            .unwrap();

        let updated = db
            .update_note(
                created.id,
                UpdateNoteInput {
                    tags: Patch::Null,
                    event_date: Patch::Null,
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert!(updated.tags.is_empty());
        assert!(updated.event_date.is_none());
    }

    #[test]
    fn empty_tag_list_clears_tags() {
        let db = setup();
        let created = db
            .create_note(
                "T".to_string(),
                "C".to_string(),
                vec!["a".to_string()],
                None,
                None,
            )
            .unwrap();

        let updated = db
            .update_note(
                created.id,
                UpdateNoteInput {
                    tags: Patch::Value(vec![]),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert!(updated.tags.is_empty());
    }

    #[test]
    fn update_unknown_id_returns_none() {
        let db = setup();
        let result = db.update_note(1, UpdateNoteInput::default()).unwrap();
        assert!(result.is_none());
    }
}

mod delete {
    use super::*;

    #[test]
    fn delete_removes_the_note() {
        let db = setup();
        let created = create_simple(&db, "Gone", "Soon");

        assert!(db.delete_note(created.id).unwrap());
        assert!(db.get_note(created.id).unwrap().is_none());
    }

    #[test]
    fn delete_unknown_id_leaves_store_unchanged() {
        let db = setup();
        create_simple(&db, "Stays", "Here");

        assert!(!db.delete_note(999).unwrap());
        assert_eq!(db.list_notes().unwrap().len(), 1);
    }
}

mod listing_and_search {
    use super::*;

    #[test]
    fn list_orders_by_most_recently_updated() {
        let db = setup();
        let first = create_simple(&db, "First", "x");
        create_simple(&db, "Second", "x");

        // Touch the first note so it becomes the most recently updated.
        db.update_note(
            first.id,
            UpdateNoteInput {
                content: Some("touched".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let notes = db.list_notes().unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].title, "First");
        assert_eq!(notes[1].title, "Second");
    }

    #[test]
    fn search_matches_title_content_and_tag_text() {
        let db = setup();
        create_simple(&db, "foo in title", "plain");
        create_simple(&db, "plain", "foo in content");
        db.create_note(
            "plain".to_string(),
            "plain".to_string(),
            vec!["foo-tag".to_string()],
            None,
            None,
        )
        .unwrap();
        create_simple(&db, "unrelated", "nothing here");

        let matches = db.search_notes("foo").unwrap();
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn search_orders_newest_updated_first() {
        let db = setup();
        let first = create_simple(&db, "foo one", "x");
        create_simple(&db, "foo two", "x");

        db.update_note(
            first.id,
            UpdateNoteInput {
                content: Some("bumped".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let matches = db.search_notes("foo").unwrap();
        assert_eq!(matches[0].title, "foo one");
        assert_eq!(matches[1].title, "foo two");
    }

    #[test]
    fn search_without_match_returns_empty() {
        let db = setup();
        create_simple(&db, "Something", "Else");
        assert!(db.search_notes("zzz").unwrap().is_empty());
    }
}
