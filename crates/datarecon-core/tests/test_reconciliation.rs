use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tempfile::tempdir;

use datarecon_core::{
    CheckStatus, ColumnMapping, MappingSet, Orchestrator, RunOptions, TablePair,
};

struct RunDirs {
    _root: tempfile::TempDir,
    source: std::path::PathBuf,
    target: std::path::PathBuf,
    output: std::path::PathBuf,
    log: std::path::PathBuf,
}

fn run_dirs() -> RunDirs {
    let root = tempdir().unwrap();
    let source = root.path().join("source_files");
    let target = root.path().join("target_files");
    let output = root.path().join("mismatch");
    let log = root.path().join("test_execution_result.csv");
    fs::create_dir_all(&source).unwrap();
    fs::create_dir_all(&target).unwrap();
    RunDirs {
        _root: root,
        source,
        target,
        output,
        log,
    }
}

fn write_file(dir: &Path, name: &str, lines: &[&str]) {
    let mut file = File::create(dir.join(name)).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
}

fn identity_mapping(table: &str, columns: &[&str]) -> ColumnMapping {
    let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    ColumnMapping::new(table.to_string(), columns.clone(), columns).unwrap()
}

fn pair(source: &str, target: &str, keys: &[&str]) -> TablePair {
    TablePair {
        source_table: source.to_string(),
        target_table: target.to_string(),
        key_columns: keys.iter().map(|k| k.to_string()).collect(),
    }
}

#[test]
fn test_end_to_end_duplicate_missing_and_mismatch() {
    let dirs = run_dirs();
    // Source: Alice, Bob, Carl. Target: Alice, Bobby twice (duplicate key 2),
    // no Carl. Row counts tie at 3 physical rows.
    write_file(
        &dirs.source,
        "people.csv",
        &["id,name", "1,Alice", "2,Bob", "3,Carl"],
    );
    write_file(
        &dirs.target,
        "people.csv",
        &["id,name", "1,Alice", "2,Bobby", "2,Bobby"],
    );

    let mut mappings = MappingSet::default();
    mappings.insert(identity_mapping("people", &["id", "name"]));

    let options = RunOptions::new(
        dirs.source.clone(),
        dirs.target.clone(),
        dirs.output.clone(),
        dirs.log.clone(),
    );
    let summary = Orchestrator::new(options, mappings)
        .run(&[pair("people", "people", &["id"])])
        .unwrap();

    assert_eq!(summary.tasks_total, 1);
    assert_eq!(summary.tasks_skipped, 0);

    // Records arrive in check order 1, 3, 4, 2 for the single task.
    let records = &summary.records;
    assert_eq!(records.len(), 4);
    let check_ids: Vec<u32> = records.iter().map(|r| r.check_id).collect();
    assert_eq!(check_ids, vec![1, 3, 4, 2]);
    assert!(records.iter().all(|r| r.execution_id == 1));

    // 3 vs 3 physical rows: row-count check passes.
    assert_eq!(records[0].status, CheckStatus::Passed);

    // Duplicate key 2 flagged once.
    assert_eq!(records[1].status, CheckStatus::Failed);
    let duplicate_file = dirs.output.join("Duplicates/people_duplicates.csv");
    let duplicates = fs::read_to_string(duplicate_file).unwrap();
    assert_eq!(
        duplicates.lines().collect::<Vec<_>>(),
        vec!["Duplicate_Row_IDs", "2"]
    );

    // Carl (key 3) missing from the target.
    assert_eq!(records[2].status, CheckStatus::Failed);
    let missing_file = dirs.output.join("Missing_Rows/people_missing_in_target.csv");
    let missing = fs::read_to_string(missing_file).unwrap();
    assert_eq!(missing.lines().collect::<Vec<_>>(), vec!["id,name", "3,Carl"]);

    // Keys 1 and 2 survive dedup on both sides; Bob vs Bobby mismatches.
    assert_eq!(records[3].status, CheckStatus::Failed);
    let mismatch_file = dirs.output.join("people_runid_1.csv");
    let mismatches = fs::read_to_string(mismatch_file).unwrap();
    assert!(mismatches.contains("Data Mismatch - name"));
    assert!(mismatches.contains("RowID: 2, Source: Bob, Target: Bobby"));

    // The consolidated log holds the same four records.
    let log = fs::read_to_string(&dirs.log).unwrap();
    assert_eq!(log.lines().count(), 5);
    assert!(log.starts_with("TEST_EXECUTION_ID,TEST_CASE_ID"));
}

#[test]
fn test_identical_tables_all_checks_pass() {
    let dirs = run_dirs();
    let lines = ["id,name,amount", "1,Alice,10.5", "2,Bob,20", "3,Carl,"];
    write_file(&dirs.source, "orders.csv", &lines);
    write_file(&dirs.target, "orders.csv", &lines);

    let mut mappings = MappingSet::default();
    mappings.insert(identity_mapping("orders", &["id", "name", "amount"]));

    let options = RunOptions::new(
        dirs.source.clone(),
        dirs.target.clone(),
        dirs.output.clone(),
        dirs.log.clone(),
    );
    let summary = Orchestrator::new(options, mappings)
        .run(&[pair("orders", "orders", &["id"])])
        .unwrap();

    // Only the always-recorded checks appear: row count and mismatch scan.
    assert_eq!(summary.records.len(), 2);
    assert!(summary
        .records
        .iter()
        .all(|r| r.status == CheckStatus::Passed));
    assert!(!dirs.output.join("Duplicates").exists());
    assert!(!dirs.output.join("Missing_Rows").exists());
}

#[test]
fn test_execution_ids_continue_across_runs() {
    let dirs = run_dirs();
    let lines = ["id,name", "1,Alice"];
    write_file(&dirs.source, "orders.csv", &lines);
    write_file(&dirs.target, "orders.csv", &lines);

    let mut mappings = MappingSet::default();
    mappings.insert(identity_mapping("orders", &["id", "name"]));

    let options = RunOptions::new(
        dirs.source.clone(),
        dirs.target.clone(),
        dirs.output.clone(),
        dirs.log.clone(),
    );
    let orchestrator = Orchestrator::new(options, mappings);
    let pairs = [pair("orders", "orders", &["id"])];

    let first = orchestrator.run(&pairs).unwrap();
    let second = orchestrator.run(&pairs).unwrap();

    assert!(first.records.iter().all(|r| r.execution_id == 1));
    assert!(second.records.iter().all(|r| r.execution_id == 2));
}

#[test]
fn test_missing_snapshot_skips_task_without_failing_siblings() {
    let dirs = run_dirs();
    let lines = ["id,name", "1,Alice"];
    write_file(&dirs.source, "orders.csv", &lines);
    write_file(&dirs.target, "orders.csv", &lines);
    // "ghost" has no snapshot files at all.

    let mut mappings = MappingSet::default();
    mappings.insert(identity_mapping("orders", &["id", "name"]));
    mappings.insert(identity_mapping("ghost", &["id"]));

    let options = RunOptions::new(
        dirs.source.clone(),
        dirs.target.clone(),
        dirs.output.clone(),
        dirs.log.clone(),
    );
    let summary = Orchestrator::new(options, mappings)
        .run(&[
            pair("ghost", "ghost", &["id"]),
            pair("orders", "orders", &["id"]),
        ])
        .unwrap();

    assert_eq!(summary.tasks_total, 2);
    assert_eq!(summary.tasks_skipped, 1);
    // The surviving task keeps its pre-assigned id 2, untouched by the skip.
    assert!(summary.records.iter().all(|r| r.execution_id == 2));
}

#[test]
fn test_unmapped_table_aborts_only_that_task() {
    let dirs = run_dirs();
    let lines = ["id,name", "1,Alice"];
    write_file(&dirs.source, "orders.csv", &lines);
    write_file(&dirs.target, "orders.csv", &lines);
    write_file(&dirs.source, "unmapped.csv", &lines);
    write_file(&dirs.target, "unmapped.csv", &lines);

    let mut mappings = MappingSet::default();
    mappings.insert(identity_mapping("orders", &["id", "name"]));

    let options = RunOptions::new(
        dirs.source.clone(),
        dirs.target.clone(),
        dirs.output.clone(),
        dirs.log.clone(),
    );
    let summary = Orchestrator::new(options, mappings)
        .run(&[
            pair("unmapped", "unmapped", &["id"]),
            pair("orders", "orders", &["id"]),
        ])
        .unwrap();

    assert_eq!(summary.tasks_skipped, 1);
    assert!(summary.records.iter().all(|r| r.table_name == "orders"));
}

#[test]
fn test_zero_chunk_size_is_clamped() {
    let dirs = run_dirs();
    write_file(&dirs.source, "orders.csv", &["id,name", "1,Alice", "2,Bob"]);
    write_file(&dirs.target, "orders.csv", &["id,name", "1,Alice", "2,Bobby"]);

    let mut mappings = MappingSet::default();
    mappings.insert(identity_mapping("orders", &["id", "name"]));

    let options = RunOptions::new(
        dirs.source.clone(),
        dirs.target.clone(),
        dirs.output.clone(),
        dirs.log.clone(),
    )
    .with_chunk_size(0);
    assert_eq!(options.chunk_size, 1);

    // The run completes and scans single-row chunks instead of panicking.
    let summary = Orchestrator::new(options, mappings)
        .run(&[pair("orders", "orders", &["id"])])
        .unwrap();
    let mismatch = fs::read_to_string(dirs.output.join("orders_runid_1.csv")).unwrap();
    assert!(mismatch.contains("RowID: 2"));
    assert_eq!(summary.failed(), 1);
}

#[test]
fn test_no_enabled_pairs_is_fatal() {
    let dirs = run_dirs();
    let options = RunOptions::new(
        dirs.source.clone(),
        dirs.target.clone(),
        dirs.output.clone(),
        dirs.log.clone(),
    );
    let err = Orchestrator::new(options, MappingSet::default())
        .run(&[])
        .unwrap_err();
    assert!(matches!(err, datarecon_core::ReconError::NoEnabledPairs));
}

#[test]
fn test_composite_key_pair() {
    let dirs = run_dirs();
    write_file(
        &dirs.source,
        "ledger.csv",
        &["account,entry,amount", "a,1,10", "a,2,20"],
    );
    write_file(
        &dirs.target,
        "ledger.csv",
        &["account,entry,amount", "a,1,10", "a,2,25"],
    );

    let mut mappings = MappingSet::default();
    mappings.insert(identity_mapping("ledger", &["account", "entry", "amount"]));

    let options = RunOptions::new(
        dirs.source.clone(),
        dirs.target.clone(),
        dirs.output.clone(),
        dirs.log.clone(),
    );
    let summary = Orchestrator::new(options, mappings)
        .run(&[pair("ledger", "ledger", &["account", "entry"])])
        .unwrap();

    // Same composite key sets on both sides: no duplicate or missing
    // records, one mismatch on the a_2 amount.
    let check_ids: Vec<u32> = summary.records.iter().map(|r| r.check_id).collect();
    assert_eq!(check_ids, vec![1, 2]);
    let mismatch = fs::read_to_string(dirs.output.join("ledger_runid_1.csv")).unwrap();
    assert!(mismatch.contains("RowID: a_2, Source: 20, Target: 25"));
}
