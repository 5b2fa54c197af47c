//! Tests for indexed and resource scans

use super::*;
use crate::error::{FlowError, ResourceError, UsageError};
use crate::value::Val;
use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::rc::Rc;

// ============================================================================
// Helper Functions
// ============================================================================

/// In-memory source that counts opens and releases
struct Counted {
    records: Vec<i32>,
    opened: Rc<Cell<usize>>,
    released: Rc<Cell<usize>>,
    reads: Rc<Cell<usize>>,
}

struct CountedResource {
    records: std::vec::IntoIter<i32>,
    released: Rc<Cell<usize>>,
    reads: Rc<Cell<usize>>,
}

impl Counted {
    fn new(records: Vec<i32>) -> Self {
        Self {
            records,
            opened: Rc::new(Cell::new(0)),
            released: Rc::new(Cell::new(0)),
            reads: Rc::new(Cell::new(0)),
        }
    }
}

impl Source for Counted {
    type Resource = CountedResource;

    fn open(
        &self,
        _path: &Path,
        _options: &ScanOptions,
    ) -> Result<Option<CountedResource>, ResourceError> {
        self.opened.set(self.opened.get() + 1);
        Ok(Some(CountedResource {
            records: self.records.clone().into_iter(),
            released: self.released.clone(),
            reads: self.reads.clone(),
        }))
    }
}

impl Resource for CountedResource {
    type Record = i32;

    fn read_one(&mut self) -> Result<Record<i32>, ResourceError> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.records.next().map_or(Record::Eof, Record::Item))
    }

    fn release(&mut self) -> Result<(), ResourceError> {
        self.released.set(self.released.get() + 1);
        Ok(())
    }
}

fn temp_file(contents: &str) -> PathBuf {
    let name = format!("flowkit-{}.txt", uuid::Uuid::new_v4());
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, contents).expect("Failed to write temp file");
    path
}

fn missing_path() -> PathBuf {
    let name = format!("flowkit-missing-{}.txt", uuid::Uuid::new_v4());
    std::env::temp_dir().join(name)
}

// ============================================================================
// Indexed Scan
// ============================================================================

#[test]
fn test_indexed_whole_sequence() {
    let data = vec!["a", "b", "c"];
    let mut seen = vec![];
    Indexed::new(&data).each(|i, v| seen.push((i, *v))).unwrap();
    assert_eq!(seen, vec![(0, "a"), (1, "b"), (2, "c")]);
}

#[test]
fn test_indexed_window_reports_absolute_indices() {
    let data = [10, 20, 30, 40, 50];
    let mut seen = vec![];
    Indexed::new(&data).start(1).end(4).each(|i, v| seen.push((i, *v))).unwrap();
    assert_eq!(seen, vec![(1, 20), (2, 30), (3, 40)]);
}

#[test]
fn test_indexed_empty_window() {
    let data = [1, 2, 3];
    let mut calls = 0;
    Indexed::new(&data).start(3).each(|_, _| calls += 1).unwrap();
    assert_eq!(calls, 0);
}

#[test]
fn test_indexed_bad_bounds_rejected_before_body() {
    let data = [1, 2, 3];
    let mut calls = 0;
    let err = Indexed::new(&data).end(4).each(|_, _| calls += 1).unwrap_err();
    assert_eq!(err, UsageError::BadBounds { start: 0, end: 4, len: 3 });

    let err = Indexed::new(&data).start(2).end(1).each(|_, _| calls += 1).unwrap_err();
    assert_eq!(err, UsageError::BadBounds { start: 2, end: 1, len: 3 });
    assert_eq!(calls, 0);
}

#[test]
fn test_indexed_try_each_stops_early() {
    let data = vec![Val::Num(1.0), Val::Null, Val::Num(3.0)];
    let found = Indexed::new(&data)
        .try_each(|i, v| {
            if *v == Val::Null {
                ControlFlow::Break(i)
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();
    assert_eq!(found, Some(1));
}

// ============================================================================
// Resource Scan: release guarantees
// ============================================================================

#[test]
fn test_scan_reads_until_eof_and_releases_once() {
    let source = Counted::new(vec![1, 2, 3]);
    let mut seen = vec![];
    let options = ScanOptions::default();
    let count = scan_each(&source, "mem", &options, |r| seen.push(r)).unwrap();

    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(count, 3);
    assert_eq!(source.opened.get(), 1);
    assert_eq!(source.released.get(), 1);
    // Three records plus the end sentinel
    assert_eq!(source.reads.get(), 4);
}

#[test]
fn test_scan_break_skips_remaining_reads() {
    let source = Counted::new(vec![1, 2, 3, 4]);
    let result = scan(&source, "mem", &ScanOptions::default(), |r| {
        Ok::<_, FlowError>(if r == 2 {
            ControlFlow::Break(r * 100)
        } else {
            ControlFlow::Continue(())
        })
    })
    .unwrap();

    assert_eq!(result, Some(200));
    assert_eq!(source.reads.get(), 2);
    assert_eq!(source.released.get(), 1);
}

#[derive(Debug)]
#[allow(dead_code)]
enum BodyError {
    Resource(ResourceError),
    Rejected(i32),
}

impl From<ResourceError> for BodyError {
    fn from(err: ResourceError) -> Self {
        BodyError::Resource(err)
    }
}

#[test]
fn test_scan_body_error_propagates_after_release() {
    let source = Counted::new(vec![1, 2, 3]);
    let released = source.released.clone();
    let err = scan(&source, "mem", &ScanOptions::default(), |r| {
        if r == 2 {
            // Release must not have happened yet
            assert_eq!(released.get(), 0);
            return Err(BodyError::Rejected(r));
        }
        Ok(ControlFlow::<()>::Continue(()))
    })
    .unwrap_err();

    assert!(matches!(err, BodyError::Rejected(2)));
    assert_eq!(source.released.get(), 1);
    assert_eq!(source.reads.get(), 2);
}

#[test]
fn test_scan_body_panic_still_releases() {
    let source = Counted::new(vec![1, 2, 3]);
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        scan_each(&source, "mem", &ScanOptions::default(), |r| {
            if r == 2 {
                panic!("body failed");
            }
        })
    }));

    assert!(outcome.is_err());
    assert_eq!(source.released.get(), 1);
}

// ============================================================================
// Resource Scan: missing policy
// ============================================================================

#[test]
fn test_scan_missing_tolerated_runs_zero_times() {
    let mut calls = 0;
    let count = scan_each(
        &LineSource,
        missing_path(),
        &ScanOptions::default().tolerate_missing(),
        |_| calls += 1,
    )
    .unwrap();
    assert_eq!(count, 0);
    assert_eq!(calls, 0);
}

#[test]
fn test_scan_missing_fails_by_default() {
    let path = missing_path();
    let err = scan_each(&LineSource, &path, &ScanOptions::default(), |_| {}).unwrap_err();
    let ResourceError::Missing { path: reported } = err else {
        unreachable!("Expected ResourceError::Missing, got {:?}", err);
    };
    assert_eq!(reported, path);
}

// ============================================================================
// File Sources
// ============================================================================

#[test]
fn test_line_source_strips_line_endings() {
    let path = temp_file("first\r\nsecond\n\nlast");
    let mut lines = vec![];
    scan_each(&LineSource, &path, &ScanOptions::default(), |l| lines.push(l)).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(lines, vec!["first", "second", "", "last"]);
}

#[test]
fn test_line_source_read_after_release_is_eof() {
    let path = temp_file("only\n");
    let mut lines = LineSource
        .open(&path, &ScanOptions::default())
        .unwrap()
        .expect("file exists");
    lines.release().unwrap();
    assert_eq!(lines.read_one().unwrap(), Record::Eof);
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_json_lines_decode_and_skip_blank() {
    let path = temp_file("{\"id\": 1}\n\n{\"id\": 2, \"ok\": false}\n");
    let records = RefCell::new(vec![]);
    scan_each(
        &JsonLinesSource::<Val>::new(),
        &path,
        &ScanOptions::default(),
        |r| records.borrow_mut().push(r),
    )
    .unwrap();
    std::fs::remove_file(&path).ok();

    let records = records.into_inner();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].to_string(), r#"{"id":2.0,"ok":false}"#);
}

#[test]
fn test_json_lines_decode_error_reports_record() {
    let path = temp_file("{\"id\": 1}\nnot json\n");
    let mut seen = 0;
    let source = JsonLinesSource::<Val>::new();
    let options = ScanOptions::default();
    let err = scan_each(&source, &path, &options, |_| seen += 1).unwrap_err();
    std::fs::remove_file(&path).ok();

    assert_eq!(seen, 1);
    let ResourceError::Decode { record, .. } = err else {
        unreachable!("Expected ResourceError::Decode, got {:?}", err);
    };
    assert_eq!(record, 2);
}

#[test]
fn test_scan_typed_json_records_into_flow_error() {
    #[derive(serde::Deserialize)]
    struct Row {
        n: u32,
    }

    let path = temp_file("{\"n\": 4}\n{\"n\": 5}\n{\"n\": 6}\n");
    let total = scan(
        &JsonLinesSource::<Row>::new(),
        &path,
        &ScanOptions::default(),
        |row| {
            Ok::<_, FlowError>(if row.n == 6 {
                ControlFlow::Break(row.n)
            } else {
                ControlFlow::Continue(())
            })
        },
    )
    .unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(total, Some(6));
}
