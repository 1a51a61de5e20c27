//! Integration tests for the conversion and posting engine

mod common;

use common::{HEADER, MockClient, fixture_path, note, note_type, type_index};
use modnote_importer::Error;
use modnote_importer::convert::{ConvertOptions, Converter, RecordOutcome, convert, import};
use modnote_importer::labels::{LabelMap, ModNoteLabel};
use modnote_importer::platform::FailureClass;
use modnote_importer::snoonotes::parse;

#[tokio::test]
async fn test_fixture_end_to_end() {
    let export = parse(fixture_path()).unwrap();
    assert_eq!(export.notes.len(), 1);
    assert_eq!(export.note_types.len(), 10);

    let mut client = MockClient::new().with_submission("quln8b", Some("Techman"));
    let report = import(
        &mut client,
        &export,
        &LabelMap::default(),
        ConvertOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(client.created.len(), 1);
    let created = &client.created[0];
    assert_eq!(created.label, Some(ModNoteLabel::SolidContributor));
    assert_eq!(created.reddit_id.as_deref(), Some("t3_quln8b"));
    assert_eq!(created.subreddit, "Techman");
    assert_eq!(created.user, "Techman-");
    assert_eq!(created.note, format!("{}Test message", HEADER));

    assert_eq!(report.parsed, 1);
    assert_eq!(report.posted, 1);
    assert_eq!(report.notes_created, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.skipped.deleted_accounts, 1);
}

#[tokio::test]
async fn test_long_message_is_split_in_order() {
    let message: String = (0..800)
        .map(|i| char::from(b'a' + (i % 26) as u8))
        .collect();
    let types = [note_type(14, "Abuse Warning")];
    let notes = [note(1, 14, "troll", &message, "")];

    let mut client = MockClient::new();
    let report = convert(&notes, &type_index(&types), &mut client)
        .await
        .unwrap();

    let header_len = HEADER.chars().count();
    let expected = 800usize.div_ceil(250 - header_len);
    assert_eq!(client.created.len(), expected);
    assert_eq!(report.notes_created, expected);
    assert_eq!(report.posted, 1);

    for created in &client.created {
        assert!(created.note.chars().count() <= 250);
        assert!(created.note.starts_with(HEADER));
        assert_eq!(created.label, Some(ModNoteLabel::AbuseWarning));
    }
    let rebuilt: String = client
        .created
        .iter()
        .map(|n| &n.note[HEADER.len()..])
        .collect();
    assert_eq!(rebuilt, message);
}

#[tokio::test]
async fn test_unresolvable_url_posts_without_reference() {
    let types = [note_type(11, "Spam Watch")];
    let notes = [note(1, 11, "someone", "watching", "https://reddit.com/r/DestinyTheGame/")];

    let mut client = MockClient::new();
    let report = convert(&notes, &type_index(&types), &mut client)
        .await
        .unwrap();

    assert_eq!(client.created.len(), 1);
    assert_eq!(client.created[0].reddit_id, None);
    assert_eq!(
        report.outcomes,
        vec![RecordOutcome::Posted {
            note_id: 1,
            label: Some(ModNoteLabel::SpamWatch),
            notes_created: 1,
            reference: None,
            reference_dropped: false,
        }]
    );
}

#[tokio::test]
async fn test_missing_user_is_dropped_without_retry() {
    let types = [note_type(15, "Ban")];
    let notes = [
        note(1, 15, "gone-user", "ban evasion", "https://redd.it/abc123"),
        note(2, 15, "spammer", "spam", ""),
    ];

    let mut client = MockClient::new()
        .with_submission("abc123", Some("Techman"))
        .failing_user("gone-user", "USER_DOESNT_EXIST");
    let report = convert(&notes, &type_index(&types), &mut client)
        .await
        .unwrap();

    let attempts_for_gone: Vec<_> = client
        .attempts
        .iter()
        .filter(|n| n.user == "gone-user")
        .collect();
    assert_eq!(attempts_for_gone.len(), 1);

    assert_eq!(client.created.len(), 1);
    assert_eq!(client.created[0].user, "spammer");
    assert_eq!(report.failed, 1);
    assert_eq!(report.posted, 1);
    assert!(matches!(
        report.outcomes[0],
        RecordOutcome::Dropped {
            note_id: 1,
            class: FailureClass::TargetNotFound,
            notes_created: 0,
            ..
        }
    ));
}

#[tokio::test]
async fn test_rejected_reference_is_retried_once_without_it() {
    let types = [note_type(13, "Spam Warn")];
    let notes = [note(
        1,
        13,
        "spammer",
        "posting referral links",
        "https://www.reddit.com/r/Techman/comments/x3ejz2/title/imow4h4/",
    )];

    let mut client = MockClient::new()
        .with_comment("imow4h4", Some("Techman"))
        .rejecting_reference("t1_imow4h4");
    let report = convert(&notes, &type_index(&types), &mut client)
        .await
        .unwrap();

    assert_eq!(client.attempts.len(), 2);
    assert_eq!(client.attempts[0].reddit_id.as_deref(), Some("t1_imow4h4"));
    assert_eq!(client.attempts[1].reddit_id, None);
    assert_eq!(client.created.len(), 1);
    assert_eq!(report.retried_without_reference, 1);
    assert!(matches!(
        report.outcomes[0],
        RecordOutcome::Posted {
            reference: None,
            reference_dropped: true,
            ..
        }
    ));
}

#[tokio::test]
async fn test_reference_retry_is_bounded() {
    let types = [note_type(13, "Spam Warn")];
    let notes = [note(1, 13, "cursed", "text", "https://redd.it/abc123")];

    let mut client = MockClient::new()
        .with_submission("abc123", Some("Techman"))
        .failing_user("cursed", "INVALID_REDDIT_ID");
    let report = convert(&notes, &type_index(&types), &mut client)
        .await
        .unwrap();

    assert_eq!(client.attempts.len(), 2);
    assert!(client.created.is_empty());
    assert!(matches!(
        report.outcomes[0],
        RecordOutcome::Dropped {
            class: FailureClass::ReferenceInvalid,
            ..
        }
    ));
}

#[tokio::test]
async fn test_unknown_error_drops_note_and_continues() {
    let types = [note_type(10, "None")];
    let notes = [
        note(1, 10, "first", "one", ""),
        note(2, 10, "second", "two", ""),
    ];

    let mut client = MockClient::new().failing_user("first", "SUBREDDIT_NOTALLOWED");
    let report = convert(&notes, &type_index(&types), &mut client)
        .await
        .unwrap();

    assert_eq!(client.attempts.len(), 2);
    assert_eq!(client.created.len(), 1);
    assert_eq!(client.created[0].label, None);
    assert!(matches!(
        report.outcomes[0],
        RecordOutcome::Dropped {
            class: FailureClass::Unknown,
            ..
        }
    ));
}

#[tokio::test]
async fn test_split_note_for_missing_user_is_attempted_once() {
    let types = [note_type(15, "Ban")];
    let message = "x".repeat(500);
    let notes = [note(1, 15, "someone", &message, "")];

    let mut client = MockClient::new();
    let report = convert(&notes, &type_index(&types), &mut client)
        .await
        .unwrap();
    let chunks = client.created.len();
    assert!(chunks > 1);
    assert_eq!(report.notes_created, chunks);

    // Same note for a user that no longer exists: the first chunk fails and the rest are not tried
    let mut client = MockClient::new().failing_user("someone", "USER_DOESNT_EXIST");
    let report = convert(&notes, &type_index(&types), &mut client)
        .await
        .unwrap();
    assert_eq!(client.attempts.len(), 1);
    assert!(client.created.is_empty());
    assert_eq!(report.notes_created, 0);
}

#[tokio::test]
async fn test_subreddit_filter_and_resume() {
    let types = [note_type(15, "Ban")];
    let mut other = note(3, 15, "c", "three", "");
    other.sub_name = "OtherSub".to_string();
    let notes = [
        note(1, 15, "a", "one", ""),
        note(2, 15, "b", "two", ""),
        other,
        note(4, 15, "d", "four", ""),
    ];
    let labels = LabelMap::default();

    let mut client = MockClient::new();
    let report = Converter::new(&mut client, &labels)
        .with_options(ConvertOptions {
            subreddit: Some("techman".to_string()),
            resume_after: Some(1),
            ..Default::default()
        })
        .convert(&notes, &type_index(&types))
        .await
        .unwrap();

    let users: Vec<&str> = client.created.iter().map(|n| n.user.as_str()).collect();
    assert_eq!(users, vec!["b", "d"]);
    assert_eq!(report.filtered, 2);
    assert_eq!(report.posted, 2);
}

#[tokio::test]
async fn test_missing_type_in_index_is_fatal() {
    let notes = [note(1, 42, "someone", "text", "")];
    let mut client = MockClient::new();

    let err = convert(&notes, &type_index(&[]), &mut client)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::IndexInconsistency { note_id: 1, note_type_id: 42 }));
    assert!(client.attempts.is_empty());
}

#[tokio::test]
async fn test_header_too_long_drops_only_that_note() {
    let types = [note_type(15, "Ban")];
    let mut long_name = note(2, 15, "b", &"y".repeat(80), "");
    long_name.submitter = "abcdefghijklmnopqrst".to_string();
    let notes = [
        note(1, 15, "a", "one", ""),
        long_name,
        note(3, 15, "c", "three", ""),
    ];
    let labels = LabelMap::default();

    let mut client = MockClient::new();
    let report = Converter::new(&mut client, &labels)
        .with_options(ConvertOptions {
            max_note_length: 50,
            ..Default::default()
        })
        .convert(&notes, &type_index(&types))
        .await
        .unwrap();

    let users: Vec<&str> = client.created.iter().map(|n| n.user.as_str()).collect();
    assert_eq!(users, vec!["a", "c"]);
    assert_eq!(report.posted, 2);
    assert_eq!(report.failed, 1);
    match &report.outcomes[1] {
        RecordOutcome::Dropped {
            note_id,
            class,
            notes_created,
            error,
        } => {
            assert_eq!(*note_id, 2);
            assert_eq!(*class, FailureClass::HeaderTooLong);
            assert_eq!(*notes_created, 0);
            assert!(error.contains("53 characters"));
        }
        other => panic!("expected Dropped, got {:?}", other),
    }
}

#[tokio::test]
async fn test_blank_long_message_posts_header_only() {
    let types = [note_type(15, "Ban")];
    let notes = [note(1, 15, "a", &" ".repeat(300), "")];

    let mut client = MockClient::new();
    let report = convert(&notes, &type_index(&types), &mut client)
        .await
        .unwrap();

    assert_eq!(client.attempts.len(), 1);
    assert_eq!(client.created[0].note, HEADER.trim_end());
    assert_eq!(report.posted, 1);
    assert_eq!(report.notes_created, 1);
}

#[tokio::test]
async fn test_authentication_failure_stops_before_posting() {
    let export = parse(fixture_path()).unwrap();
    let mut client = MockClient {
        fail_authentication: true,
        ..Default::default()
    };

    let err = import(
        &mut client,
        &export,
        &LabelMap::default(),
        ConvertOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Authentication(_)));
    assert!(client.attempts.is_empty());
    assert!(client.lookups.is_empty());
}
