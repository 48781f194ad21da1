//! Integration tests for the storage crate.
//!
//! Uses in-memory SQLite for fast, isolated tests.

use whosaid_eval::{EvalReport, EvalReportRepository, Evaluator, WindowConfig};
use whosaid_storage::{Database, StorageError};
use whosaid_timeline::{Annotation, Segment};

fn create_test_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

fn annotation(turns: &[(u64, u64, &str)]) -> Annotation {
    let mut ann = Annotation::new();
    for &(start_ms, end_ms, speaker) in turns {
        ann.add(Segment::new(start_ms, end_ms), speaker).unwrap();
    }
    ann
}

fn create_test_report(uri: &str) -> EvalReport {
    let reference = annotation(&[(0, 30_000, "alice"), (30_000, 60_000, "bob")]);
    let hypothesis = annotation(&[(0, 32_000, "spk1"), (32_000, 60_000, "spk2")]);
    Evaluator::standard(WindowConfig::default())
        .unwrap()
        .evaluate(uri, &reference, &hypothesis)
        .unwrap()
}

mod initialization {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        assert!(Database::open_in_memory().is_ok());
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reports.db");

        let db = Database::open(&db_path);
        assert!(db.is_ok(), "Should create file-based database");
        assert!(db_path.exists(), "Database file should exist");
    }

    #[test]
    fn test_reopen_existing_database() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reports.db");

        {
            let db = Database::open(&db_path).unwrap();
            db.save(&create_test_report("ep-11")).unwrap();
        }

        {
            let db = Database::open(&db_path).unwrap();
            assert_eq!(db.list().unwrap().len(), 1, "Report should persist after reopen");
        }
    }

    #[test]
    fn test_invalid_path_fails() {
        let result = Database::open(&PathBuf::from("/nonexistent/path/reports.db"));
        assert!(result.is_err());
    }
}

mod reports {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_save_and_get_report() {
        let db = create_test_db();
        let report = create_test_report("ep-11");
        let id = report.id;

        db.save(&report).unwrap();

        let retrieved = db.get(&id).unwrap();
        assert_eq!(retrieved.id, id);
        assert_eq!(retrieved.uri, "ep-11");
        assert_eq!(retrieved.curves.len(), report.curves.len());
        assert_eq!(retrieved.der, report.der);
    }

    #[test]
    fn test_get_nonexistent_report() {
        let db = create_test_db();
        let result = db.get(&Uuid::new_v4());
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_list_empty() {
        let db = create_test_db();
        assert!(db.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_ordered_newest_first() {
        let db = create_test_db();

        for uri in ["ep-1", "ep-2", "ep-3"] {
            std::thread::sleep(std::time::Duration::from_millis(5));
            db.save(&create_test_report(uri)).unwrap();
        }

        let reports = db.list().unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].uri, "ep-3");
        assert_eq!(reports[2].uri, "ep-1");
    }

    #[test]
    fn test_save_twice_overwrites() {
        let db = create_test_db();
        let report = create_test_report("ep-11");

        db.save(&report).unwrap();
        db.save(&report).unwrap();

        assert_eq!(db.list().unwrap().len(), 1);
    }

    #[test]
    fn test_list_by_uri() {
        let db = create_test_db();
        db.save(&create_test_report("ep-11")).unwrap();
        db.save(&create_test_report("ep-12")).unwrap();
        db.save(&create_test_report("ep-11")).unwrap();

        assert_eq!(db.list_by_uri("ep-11").unwrap().len(), 2);
        assert_eq!(db.list_by_uri("ep-12").unwrap().len(), 1);
        assert!(db.list_by_uri("ep-99").unwrap().is_empty());
    }

    #[test]
    fn test_delete_report() {
        let db = create_test_db();
        let report = create_test_report("ep-11");
        let id = report.id;

        db.save(&report).unwrap();
        db.delete(&id).unwrap();
        assert!(matches!(db.get(&id), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_delete_nonexistent_report() {
        let db = create_test_db();
        let result = db.delete(&Uuid::new_v4());
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_curve_points_survive_round_trip() {
        let db = create_test_db();
        let report = create_test_report("ep-11");
        db.save(&report).unwrap();

        let retrieved = db.get(&report.id).unwrap();
        for (a, b) in report.curves.iter().zip(retrieved.curves.iter()) {
            assert_eq!(a.metric, b.metric);
            assert_eq!(a.points, b.points);
            assert_eq!(a.overall_pct, b.overall_pct);
        }
    }
}

mod concurrency {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_reads() {
        let db = Arc::new(create_test_db());
        for _ in 0..10 {
            db.save(&create_test_report("ep-11")).unwrap();
        }

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let db = Arc::clone(&db);
                thread::spawn(move || {
                    for _ in 0..10 {
                        assert_eq!(db.list().unwrap().len(), 10);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread panicked");
        }
    }

    #[test]
    fn test_concurrent_writes() {
        let db = Arc::new(create_test_db());

        let handles: Vec<_> = (0..5)
            .map(|i| {
                let db = Arc::clone(&db);
                thread::spawn(move || {
                    for j in 0..10 {
                        db.save(&create_test_report(&format!("ep-{i}-{j}"))).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(db.list().unwrap().len(), 50);
    }
}
