//! End-to-end pipeline tests: dump file in, script tree out.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use sql_reveng::extract::FileDumpSource;
use sql_reveng::writer::OverwritePolicy;
use sql_reveng::{generate_change_scripts, GenerateOptions, GenerateResult};

fn run_dump(dump: &str, dir: &Path, configure: impl FnOnce(&mut GenerateOptions)) -> GenerateResult {
    let dump_path = dir.join("dump.sql");
    fs::write(&dump_path, dump).unwrap();

    let mut options = GenerateOptions::new(dir.join("out"), "S1");
    configure(&mut options);

    let mut source = FileDumpSource::new(&dump_path);
    generate_change_scripts(&mut source, &options).unwrap()
}

const BASIC_DUMP: &str = "\
create sequence \"S1\".\"SEQ_A\"\n/\n\
create table \"S1\".\"T1\" (\"ID\" number) TABLESPACE USERS\n/\n\
create unique index \"S1\".\"IX_T1\" on \"S1\".\"T1\" (\"ID\")\n/\n";

#[test]
fn test_sequence_table_index_example() {
    let dir = TempDir::new().unwrap();
    let result = run_dump(BASIC_DUMP, dir.path(), |_| {});

    assert_eq!(result.entry_count, 3);

    let out = dir.path().join("out");
    assert!(out.join("S1/sequence/SEQ_A.sql").exists());
    assert!(out.join("S1/table/T1.sql").exists());
    // The index is its own destination named after the index, not the table.
    assert!(out.join("S1/index/IX_T1.sql").exists());

    let table_body = fs::read_to_string(out.join("S1/table/T1.sql")).unwrap();
    assert!(!table_body.contains("create unique index"));
    // Quotes stripped and tablespace removed by post-processing.
    assert!(table_body.contains("create table S1.T1 (ID number)"));
    assert!(!table_body.contains("TABLESPACE"));
}

#[test]
fn test_table_history_sections() {
    let dump = "\
create table \"S1\".\"T1\" (\"ID\" number)\n/\n\
alter table \"S1\".\"T1\" add constraint \"PK_T1\" primary key (\"ID\")\n/\n\
comment on column \"S1\".\"T1\".\"ID\" is 'pk'\n/\n";
    let dir = TempDir::new().unwrap();
    run_dump(dump, dir.path(), |_| {});

    let body = fs::read_to_string(dir.path().join("out/S1/table/T1.sql")).unwrap();
    let init = body.find("//// CHANGE name=init").unwrap();
    let pk = body.find("//// CHANGE name=PK_T1").unwrap();
    let comments = body.find("//// CHANGE name=comments").unwrap();
    assert!(init < pk && pk < comments);
}

#[test]
fn test_no_loss_of_unmatched_statements() {
    let dump = "\
create table S1.T1 (id number)\n/\n\
begin dbms_job.submit(42); end;\n/\n";
    let dir = TempDir::new().unwrap();
    let result = run_dump(dump, dir.path(), |_| {});

    assert_eq!(result.entry_count, 2);
    let body =
        fs::read_to_string(dir.path().join("out/unclassified/unclassified.sql")).unwrap();
    assert!(body.contains("//// METADATA unclassified"));
    assert!(body.contains("begin dbms_job.submit(42); end;"));
}

#[test]
fn test_extraction_placeholder_survives_to_output() {
    let dump = "\
-- UNABLE TO EXTRACT DDL FOR OBJECT S1.BROKEN_VIEW (TYPE VIEW)\n\
-- ORA-31603: object \"BROKEN_VIEW\" not found\n/\n";
    let dir = TempDir::new().unwrap();
    run_dump(dump, dir.path(), |_| {});

    let path = dir.path().join("out/S1/unclassified/BROKEN_VIEW.sql");
    let body = fs::read_to_string(path).unwrap();
    assert!(body.contains("ORA-31603"));
}

#[test]
fn test_default_policy_preserves_edited_files_across_runs() {
    let dir = TempDir::new().unwrap();
    run_dump(BASIC_DUMP, dir.path(), |_| {});

    let table_path = dir.path().join("out/S1/table/T1.sql");
    fs::write(&table_path, "-- hand edited\n").unwrap();

    let result = run_dump(BASIC_DUMP, dir.path(), |_| {});
    assert!(!result.files_written.contains(&table_path));
    assert_eq!(fs::read_to_string(&table_path).unwrap(), "-- hand edited\n");
}

#[test]
fn test_always_policy_rewrites() {
    let dir = TempDir::new().unwrap();
    run_dump(BASIC_DUMP, dir.path(), |_| {});

    let table_path = dir.path().join("out/S1/table/T1.sql");
    fs::write(&table_path, "-- hand edited\n").unwrap();

    run_dump(BASIC_DUMP, dir.path(), |options| {
        options.overwrite = OverwritePolicy::Always;
    });
    assert!(!fs::read_to_string(&table_path).unwrap().contains("hand edited"));
}

#[test]
fn test_baseline_companion_generated() {
    let dump = "\
create table S1.T1 (id number)\n/\n\
alter table S1.T1 add constraint PK_T1 primary key (id)\n/\n";
    let dir = TempDir::new().unwrap();
    run_dump(dump, dir.path(), |options| {
        options.generate_baseline = true;
    });

    let baseline =
        fs::read_to_string(dir.path().join("out/S1/table/T1.baseline.sql")).unwrap();
    assert!(baseline.contains("create table S1.T1"));
    assert!(baseline.contains("alter table S1.T1"));
    assert!(!baseline.contains("//// CHANGE"));
    // Sequences and friends get no baseline companion.
    assert!(!dir.path().join("out/S1/sequence/SEQ_A.baseline.sql").exists());
}

#[test]
fn test_manifest_lists_discovered_schemas() {
    let dump = "\
create table \"APP\".\"T1\" (id number)\n/\n\
create view \"REF\".\"V1\" as select 1 from dual\n/\n";
    let dir = TempDir::new().unwrap();
    let result = run_dump(dump, dir.path(), |options| {
        options.connection.host = Some("db01".to_string());
        options.connection.port = Some(1521);
    });

    let manifest = fs::read_to_string(&result.manifest_path).unwrap();
    assert!(manifest.contains("<schema name=\"APP\" />"));
    assert!(manifest.contains("<schema name=\"REF\" />"));
    assert!(manifest.contains("dbHost=\"db01\""));
    assert!(manifest.contains("dbPort=\"1521\""));
}

#[test]
fn test_excluded_schema_does_not_leak_into_manifest() {
    let dump = "\
create table \"APP\".\"T1\" (id number)\n/\n\
create table \"SCRATCH\".\"TMP_LOAD\" (id number)\n/\n";
    let dir = TempDir::new().unwrap();
    let result = run_dump(dump, dir.path(), |options| {
        options.exclusions.add(None, "TMP_*").unwrap();
    });

    let manifest = fs::read_to_string(&result.manifest_path).unwrap();
    assert!(manifest.contains("APP"));
    assert!(!manifest.contains("SCRATCH"));
    assert!(!dir.path().join("out/SCRATCH").exists());
}

#[test]
fn test_noise_statements_are_filtered() {
    let dump = "\
set define off\n/\n\
create table S1.T1 (id number)\n/\n";
    let dir = TempDir::new().unwrap();
    let result = run_dump(dump, dir.path(), |_| {});
    assert_eq!(result.entry_count, 1);
}

#[test]
fn test_output_is_byte_stable_across_runs() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    run_dump(BASIC_DUMP, dir_a.path(), |_| {});
    run_dump(BASIC_DUMP, dir_b.path(), |_| {});

    let a = fs::read_to_string(dir_a.path().join("out/S1/table/T1.sql")).unwrap();
    let b = fs::read_to_string(dir_b.path().join("out/S1/table/T1.sql")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_package_spec_precedes_separate_body() {
    // The usual Oracle dump shape: specification and body arrive as two
    // statements, and dump order is not guaranteed.
    let dump = "\
create or replace package body S1.P1 as\n  procedure run is begin null; end;\nend;\n/\n\
create or replace package S1.P1 as\n  procedure run;\nend;\n/\n";
    let dir = TempDir::new().unwrap();
    run_dump(dump, dir.path(), |_| {});

    let body = fs::read_to_string(dir.path().join("out/S1/package/P1.sql")).unwrap();
    let spec_pos = body.find("create or replace package S1.P1 as").unwrap();
    let body_pos = body.find("create or replace package body S1.P1 as").unwrap();
    assert!(spec_pos < body_pos);
}

#[test]
fn test_grants_attach_to_their_objects() {
    let dump = "\
create table S1.T1 (id number)\n/\n\
grant select on S1.T1 to APP_USER\n/\n";
    let dir = TempDir::new().unwrap();
    run_dump(dump, dir.path(), |_| {});

    let body = fs::read_to_string(dir.path().join("out/S1/table/T1.sql")).unwrap();
    let init = body.find("create table").unwrap();
    let grant = body.find("grant select").unwrap();
    assert!(init < grant);
    assert!(body.contains("//// CHANGE name=grants"));
}
