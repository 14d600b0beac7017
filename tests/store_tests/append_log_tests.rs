//! Tests for the Append Log Store
//!
//! These tests verify:
//! - Appending records (file and in-memory storage)
//! - Scanning in encounter order, with and without filters
//! - Distinguishing an empty log from a filter with no matches
//! - Tolerance of garbage and torn tails in the log
//! - Log statistics
//! - Serialized concurrent appends

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use postlog::storage::{LogStorage, MemoryLog};
use postlog::store::field_equals;
use postlog::{AppendLog, Config, LogStats, PostlogError, Record, SyncStrategy};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_log() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("posts").join("posts.txt");
    (temp_dir, log_path)
}

fn open_file_log(path: &PathBuf) -> AppendLog {
    let config = Config::builder()
        .log_path(path)
        .sync_strategy(SyncStrategy::EveryAppend)
        .build();
    AppendLog::open(&config).unwrap()
}

fn comment(user: &str, msg: &str) -> Record {
    Record::new().with("user", user).with("msg", msg)
}

fn users(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.get("user").unwrap()).collect()
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_append_writes_one_line_per_record() {
    let (_temp, log_path) = setup_temp_log();
    let log = open_file_log(&log_path);

    log.append(&comment("alice", "hello")).unwrap();
    log.append(&comment("bob", "hi")).unwrap();

    let contents = fs::read_to_string(&log_path).unwrap();
    assert_eq!(
        contents,
        "{\"msg\":\"hello\",\"user\":\"alice\"}\n{\"msg\":\"hi\",\"user\":\"bob\"}\n"
    );
}

#[test]
fn test_append_line_returns_written_bytes() {
    let (_temp, log_path) = setup_temp_log();
    let log = open_file_log(&log_path);

    let first = log.append_line(&comment("alice", "say \"hi\"")).unwrap();
    let second = log.append_line(&comment("bob", "ok")).unwrap();

    assert_eq!(first, b"{\"msg\":\"say \\\"hi\\\"\",\"user\":\"alice\"}\n".to_vec());
    assert_eq!(fs::read(&log_path).unwrap(), [first, second].concat());
}

#[test]
fn test_open_creates_missing_file() {
    let (_temp, log_path) = setup_temp_log();
    assert!(!log_path.exists());

    let log = open_file_log(&log_path);
    assert!(log_path.exists());

    let result = log.scan(None).unwrap();
    assert!(result.is_empty_log());
}

#[test]
fn test_append_invalid_field_writes_nothing() {
    let (_temp, log_path) = setup_temp_log();
    let log = open_file_log(&log_path);

    let bad = comment("alice", "hi").with("_offset", "3");
    match log.append(&bad) {
        Err(PostlogError::InvalidFieldName(name)) => assert_eq!(name, "_offset"),
        other => panic!("Expected InvalidFieldName, got {:?}", other),
    }

    assert_eq!(fs::metadata(&log_path).unwrap().len(), 0);
}

#[test]
fn test_append_preserves_existing_content() {
    let (_temp, log_path) = setup_temp_log();
    fs::create_dir_all(log_path.parent().unwrap()).unwrap();
    fs::write(&log_path, "{\"msg\":\"old\",\"user\":\"zed\"}\n").unwrap();

    let log = open_file_log(&log_path);
    log.append(&comment("alice", "new")).unwrap();

    let records = log.scan_all().unwrap();
    assert_eq!(users(&records), vec!["zed", "alice"]);
}

#[test]
fn test_append_fails_when_file_removed() {
    let (_temp, log_path) = setup_temp_log();
    let log = open_file_log(&log_path);

    fs::remove_dir_all(log_path.parent().unwrap()).unwrap();

    assert!(matches!(
        log.append(&comment("alice", "hi")),
        Err(PostlogError::Io(_))
    ));
    assert!(matches!(log.scan(None), Err(PostlogError::Io(_))));
}

// =============================================================================
// Scan Tests
// =============================================================================

#[test]
fn test_filter_by_user() {
    let (_temp, log_path) = setup_temp_log();
    let log = open_file_log(&log_path);

    log.append(&comment("alice", "first")).unwrap();
    log.append(&comment("bob", "second")).unwrap();
    log.append(&comment("alice", "third")).unwrap();

    let result = log.scan_field_eq("user", "alice").unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result.scanned(), 3);
    assert_eq!(result.records()[0], comment("alice", "first"));
    assert_eq!(result.records()[1], comment("alice", "third"));

    let carol = log.scan_field_eq("user", "carol").unwrap();
    assert!(carol.is_empty());
    assert!(carol.is_no_match());
    assert!(!carol.is_empty_log());
}

#[test]
fn test_empty_log_distinct_from_no_match() {
    let log = AppendLog::with_storage(MemoryLog::new());

    let result = log.scan_field_eq("user", "carol").unwrap();
    assert!(result.is_empty());
    assert!(result.is_empty_log());
    assert!(!result.is_no_match());
}

#[test]
fn test_scan_without_predicate_returns_all_in_order() {
    let log = AppendLog::with_storage(MemoryLog::new());
    for user in ["c", "a", "b", "a"] {
        log.append(&comment(user, "m")).unwrap();
    }

    let records = log.scan_all().unwrap();
    assert_eq!(users(&records), vec!["c", "a", "b", "a"]);
}

#[test]
fn test_scan_with_custom_predicate() {
    let log = AppendLog::with_storage(MemoryLog::new());
    log.append(&comment("alice", "short")).unwrap();
    log.append(&comment("bob", "a much longer message")).unwrap();
    log.append(&Record::new().with("msg", "anonymous")).unwrap();

    let long = |r: &Record| r.get("msg").map_or(false, |m| m.len() > 10);
    let result = log.scan(Some(&long)).unwrap();
    assert_eq!(users(result.records()), vec!["bob"]);

    let by_alice = field_equals("user", "alice");
    let result = log.scan(Some(&by_alice)).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.scanned(), 3);
}

#[test]
fn test_scan_is_idempotent() {
    let (_temp, log_path) = setup_temp_log();
    let log = open_file_log(&log_path);
    for i in 0..10 {
        log.append(&comment(&format!("user{}", i % 3), &format!("msg {}", i)))
            .unwrap();
    }

    let first = log.scan(None).unwrap();
    let second = log.scan(None).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 10);
}

#[test]
fn test_scan_reads_multiline_values() {
    let (_temp, log_path) = setup_temp_log();
    let log = open_file_log(&log_path);

    log.append(&comment("alice", "line one\nline two\n")).unwrap();
    log.append(&comment("bob", "{\"user\":\"mallory\"}")).unwrap();

    let records = log.scan_all().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("msg"), Some("line one\nline two\n"));
    assert_eq!(records[1].get("user"), Some("bob"));

    let mallory = log.scan_field_eq("user", "mallory").unwrap();
    assert!(mallory.is_no_match());
}

#[test]
fn test_scan_skips_garbage_and_torn_tail() {
    let (_temp, log_path) = setup_temp_log();
    let log = open_file_log(&log_path);

    log.append(&comment("alice", "ok")).unwrap();
    {
        let mut file = OpenOptions::new().append(true).open(&log_path).unwrap();
        file.write_all(b"some stray text {not valid}\n").unwrap();
    }
    log.append(&comment("bob", "ok")).unwrap();
    {
        // Simulates a write cut off mid-record
        let mut file = OpenOptions::new().append(true).open(&log_path).unwrap();
        file.write_all(b"{\"msg\":\"cut off").unwrap();
    }

    let records = log.scan_all().unwrap();
    assert_eq!(users(&records), vec!["alice", "bob"]);
}

#[test]
fn test_scan_recovers_record_after_torn_write() {
    let log = AppendLog::with_storage(MemoryLog::from_bytes("{\"msg\":\"torn\n"));
    log.append(&comment("alice", "after")).unwrap();

    let records = log.scan_all().unwrap();
    assert_eq!(records, vec![comment("alice", "after")]);
}

#[test]
fn test_scan_skips_line_with_reserved_field() {
    let (_temp, log_path) = setup_temp_log();
    let log = open_file_log(&log_path);

    log.append(&comment("alice", "first")).unwrap();
    {
        let mut file = OpenOptions::new().append(true).open(&log_path).unwrap();
        file.write_all(b"{\"_x\":\"1\",\"user\":\"a\"}\n").unwrap();
    }
    log.append(&comment("bob", "third")).unwrap();

    let result = log.scan(None).unwrap();
    assert_eq!(result.scanned(), 2);
    assert_eq!(
        result.records(),
        &[comment("alice", "first"), comment("bob", "third")][..]
    );

    // Every scanned record can be written back out
    for record in result.records() {
        postlog::codec::encode_record(record).unwrap();
    }
}

#[test]
fn test_scanned_records_carry_spans() {
    let log = AppendLog::with_storage(MemoryLog::from_bytes("xx\n"));
    log.append(&comment("a", "1")).unwrap();
    log.append(&comment("b", "2")).unwrap();

    let records = log.scan_all().unwrap();
    let encoded_len = br#"{"msg":"1","user":"a"}"#.len();

    assert_eq!(records[0].offset(), Some(3));
    assert_eq!(records[0].length(), Some(encoded_len));
    assert_eq!(records[1].offset(), Some(1));
    assert_eq!(records[1].length(), Some(encoded_len));
}

// =============================================================================
// Stats Tests
// =============================================================================

#[test]
fn test_stats_clean_log() {
    let log = AppendLog::with_storage(MemoryLog::new());
    log.append(&comment("a", "1")).unwrap();
    log.append(&comment("b", "2")).unwrap();

    let stats = log.stats().unwrap();
    let encoded_len = br#"{"msg":"1","user":"a"}"#.len();

    assert_eq!(stats.records, 2);
    assert_eq!(stats.record_bytes, 2 * encoded_len);
    assert_eq!(stats.total_bytes, 2 * (encoded_len + 1));
    assert_eq!(stats.garbage_bytes, 0);
    assert!(stats.is_clean());
}

#[test]
fn test_stats_counts_garbage() {
    let log = AppendLog::with_storage(MemoryLog::from_bytes("junk\n"));
    log.append(&comment("a", "1")).unwrap();
    log.storage().append_bytes(b"{\"msg\":").unwrap();

    let stats = log.stats().unwrap();
    assert_eq!(stats.records, 1);
    assert_eq!(stats.garbage_bytes, 4 + 7);
    assert!(!stats.is_clean());
}

#[test]
fn test_stats_empty_log() {
    let log = AppendLog::with_storage(MemoryLog::new());
    let stats = log.stats().unwrap();
    assert_eq!(stats, LogStats::default());
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_appends_do_not_interleave() {
    let (_temp, log_path) = setup_temp_log();
    let log = Arc::new(open_file_log(&log_path));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                for i in 0..50 {
                    let msg = format!("thread {} message {} {}", t, i, "x".repeat(200));
                    log.append(&comment(&format!("t{}", t), &msg)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let stats = log.stats().unwrap();
    assert_eq!(stats.records, 400);
    assert!(stats.is_clean());

    for t in 0..8 {
        let result = log.scan_field_eq("user", &format!("t{}", t)).unwrap();
        assert_eq!(result.len(), 50);
        // Per-thread order is preserved
        for (i, record) in result.records().iter().enumerate() {
            let prefix = format!("thread {} message {} ", t, i);
            assert!(record.get("msg").unwrap().starts_with(&prefix));
        }
    }
}

#[test]
fn test_scan_concurrent_with_appends() {
    let log = Arc::new(AppendLog::with_storage(MemoryLog::new()));

    let writer = {
        let log = Arc::clone(&log);
        thread::spawn(move || {
            for i in 0..200 {
                log.append(&comment("w", &i.to_string())).unwrap();
            }
        })
    };

    let mut last_seen = 0;
    for _ in 0..20 {
        let seen = log.scan(None).unwrap().len();
        assert!(seen >= last_seen);
        last_seen = seen;
    }

    writer.join().unwrap();
    assert_eq!(log.scan_all().unwrap().len(), 200);
}
