// File: tests/diary_store.rs
use chrono::NaiveDate;
use daybook::context::{AppContext, TestContext};
use daybook::diary::{self, DiaryStore};
use std::fs;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_entries_come_back_newest_first_and_trimmed() {
    let ctx = TestContext::new();
    let root = ctx.get_data_dir().unwrap();
    let date = day(2024, 5, 1);

    for text in ["  first  \n\n", "second\n\n", "\tthird\n\n"] {
        assert!(DiaryStore::append_entry(&root, date, text));
    }

    assert_eq!(
        DiaryStore::list_entries(&root, date),
        vec!["third".to_string(), "second".to_string(), "first".to_string()]
    );
}

#[test]
fn test_missing_file_lists_empty() {
    let ctx = TestContext::new();
    let root = ctx.get_data_dir().unwrap();

    assert!(DiaryStore::list_entries(&root, day(2024, 5, 2)).is_empty());
    assert!(!DiaryStore::path_for(&root, day(2024, 5, 2)).exists());
}

#[test]
fn test_clear_is_idempotent() {
    let ctx = TestContext::new();
    let root = ctx.get_data_dir().unwrap();
    let date = day(2024, 5, 3);

    // Nothing there yet: clearing creates an empty file.
    assert!(DiaryStore::clear_file(&root, date));
    assert!(DiaryStore::list_entries(&root, date).is_empty());

    assert!(DiaryStore::append_entry(&root, date, "note\n\n"));
    assert!(DiaryStore::clear_file(&root, date));
    assert!(DiaryStore::clear_file(&root, date));

    let path = DiaryStore::path_for(&root, date);
    assert!(path.exists(), "cleared files are emptied, not deleted");
    assert_eq!(fs::read_to_string(path).unwrap(), "");
    assert!(DiaryStore::list_entries(&root, date).is_empty());
}

#[test]
fn test_single_newline_stays_in_one_entry() {
    let ctx = TestContext::new();
    let root = ctx.get_data_dir().unwrap();
    let date = day(2024, 5, 4);

    assert!(DiaryStore::append_entry(&root, date, "line one\nline two\n\n"));
    assert!(DiaryStore::append_entry(&root, date, "other\n\n"));

    let entries = DiaryStore::list_entries(&root, date);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1], "line one\nline two");
}

#[test]
fn test_dates_do_not_share_files() {
    let ctx = TestContext::new();
    let root = ctx.get_data_dir().unwrap();

    assert!(DiaryStore::append_entry(&root, day(2024, 5, 5), "a\n\n"));
    assert!(DiaryStore::append_entry(&root, day(2024, 5, 6), "b\n\n"));

    assert_eq!(DiaryStore::list_entries(&root, day(2024, 5, 5)), vec!["a"]);
    assert_eq!(DiaryStore::list_entries(&root, day(2024, 5, 6)), vec!["b"]);
}

#[test]
fn test_io_failures_collapse_to_fallbacks() {
    let ctx = TestContext::new();
    let root = ctx.get_data_dir().unwrap();
    let date = day(2024, 5, 7);

    // A directory where the diary file should be: reads and writes fail.
    fs::create_dir_all(DiaryStore::path_for(&root, date)).unwrap();
    assert!(DiaryStore::list_entries(&root, date).is_empty());
    assert!(!DiaryStore::append_entry(&root, date, "lost\n\n"));
    assert!(!DiaryStore::clear_file(&root, date));

    // A plain file used as the storage root.
    let not_a_dir = root.join("plain");
    fs::write(&not_a_dir, "x").unwrap();
    assert!(!DiaryStore::append_entry(&not_a_dir, date, "lost\n\n"));
    assert!(DiaryStore::list_entries(&not_a_dir, date).is_empty());
}

#[test]
fn test_composed_entries_round_trip() {
    let ctx = TestContext::new();
    let root = ctx.get_data_dir().unwrap();
    let date = day(2024, 5, 8);

    let record = diary::compose_entry("2024-05-08 21:40", "Dinner\n\n\nthen a film").unwrap();
    assert!(DiaryStore::append_entry(&root, date, &record));

    assert_eq!(
        DiaryStore::list_entries(&root, date),
        vec!["2024-05-08 21:40\nDinner\nthen a film".to_string()]
    );
}

#[test]
fn test_written_dates_skips_empty_and_foreign_files() {
    let ctx = TestContext::new();
    let root = ctx.get_data_dir().unwrap();

    assert!(DiaryStore::append_entry(&root, day(2024, 6, 2), "b\n\n"));
    assert!(DiaryStore::append_entry(&root, day(2024, 6, 1), "a\n\n"));
    assert!(DiaryStore::clear_file(&root, day(2024, 6, 3)));
    fs::write(root.join("notes.txt"), "not a date\n\n").unwrap();
    fs::write(root.join("2024-06-04.md"), "wrong extension\n\n").unwrap();
    daybook::usage::UsageCache::save(&root, day(2024, 6, 5), 12);

    assert_eq!(
        DiaryStore::written_dates(&root),
        vec![day(2024, 6, 1), day(2024, 6, 2)]
    );
}

#[test]
fn test_timestamp_shape() {
    let stamp = diary::format_timestamp_now();
    let bytes = stamp.as_bytes();

    assert_eq!(bytes.len(), 16, "unexpected timestamp: {}", stamp);
    for (i, b) in bytes.iter().enumerate() {
        match i {
            4 | 7 => assert_eq!(*b, b'-'),
            10 => assert_eq!(*b, b' '),
            13 => assert_eq!(*b, b':'),
            _ => assert!(b.is_ascii_digit(), "non-digit at {} in {}", i, stamp),
        }
    }
}

#[test]
fn test_undecodable_file_lists_empty() {
    let ctx = TestContext::new();
    let root = ctx.get_data_dir().unwrap();
    let date = day(2024, 5, 9);

    fs::write(DiaryStore::path_for(&root, date), b"ok\n\n\xff\xfe").unwrap();

    assert!(DiaryStore::list_entries(&root, date).is_empty());
    assert!(DiaryStore::written_dates(&root).is_empty());
}
