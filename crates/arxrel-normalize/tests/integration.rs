//! End-to-end runs over small snapshot files.

use std::io::Write;
use std::path::{Path, PathBuf};

use arxrel_core::{ProgressContext, RunManifest};
use arxrel_normalize::{Config, PipelineError, run};
use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

const SNAPSHOT: &[&str] = &[
    r#"{"id":"704.0001","title":"Calculation of prompt diphoton production","abstract":"A fully differential calculation.","categories":"hep-ph","journal-ref":"Phys.Rev.D76:013009,2007","versions":[{"version":"v1","created":"Mon, 2 Apr 2007 19:18:42 GMT"}],"authors_parsed":[["Balázs","C.",""]]}"#,
    r#"{"id":"704.0002","title":"Sparsity-certifying Graph Decompositions","abstract":"We describe a new algorithm, the \"pebble game\".","categories":"math.CO cs.DM","comments":"To appear","journal-ref":null,"versions":[{"version":"v1","created":"Mon, 2 Apr 2007 19:18:42 GMT"},{"version":"v2","created":"Sat, 13 Dec 2008 17:26:00 GMT"}],"authors_parsed":[["Borra","Sergio",""],["Smith","J.",""]]}"#,
    "",
    r#"{"id":"704.0003","title":"Random walks","abstract":"Line one.\nLine two.","categories":"math.PR","comments":null,"journal-ref":"J. Prob. 1","versions":[{"version":"v1","created":"Tue, 3 Apr 2007 10:00:00 GMT"}],"authors_parsed":[["Smith","J.",""],["Doe","Maria","Jr"]]}"#,
    r#"{"id":"704.0009","categories":"math.CO""#,
    r#"{"id":"704.0005","title":"No history","abstract":"x","categories":"math.AG","versions":[],"authors_parsed":[["Nobody","Ann",""]]}"#,
];

fn write_snapshot(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let body = lines.join("\n") + "\n";
    if name.ends_with(".gz") {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(body.as_bytes()).unwrap();
        std::fs::write(&path, enc.finish().unwrap()).unwrap();
    } else {
        std::fs::write(&path, body).unwrap();
    }
    path
}

fn config(dir: &TempDir, input: PathBuf, out: &str) -> Config {
    let names = dir.path().join("names.csv");
    std::fs::write(&names, "name,gender\nmaria,female\nsergio,mostly_male\nSergio,male\n").unwrap();
    Config {
        input,
        output_dir: dir.path().join(out),
        area: "math".into(),
        names_file: Some(names),
        ..Default::default()
    }
}

fn read(dir: &Path, file: &str) -> String {
    std::fs::read_to_string(dir.join(file)).unwrap()
}

#[test]
fn normalizes_math_snapshot() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(dir.path(), "snapshot.json", SNAPSHOT);
    let config = config(&dir, input, "out");

    let summary = run(&config, &ProgressContext::hidden()).unwrap();
    let out = &config.output_dir;

    assert_eq!(
        read(out, "submissions.csv"),
        "\"arxiv_id\",\"submission_date\",\"title\",\"abstract\",\"journal-ref\",\"comments\"\n\
         \"704.0002\",\"2007-04-02\",\"Sparsity-certifying Graph Decompositions\",\"We describe a new algorithm, the \"\"pebble game\"\".\",0,\"To appear\"\n\
         \"704.0003\",\"2007-04-03\",\"Random walks\",\"Line one.\nLine two.\",1,\n"
    );
    assert_eq!(
        read(out, "authors.csv"),
        "\"author_id\",\"surname\",\"first_name\",\"gender\"\n\
         0,\"Borra\",\"Sergio\",\"male\"\n\
         1,\"Doe\",\"Maria\",\"female\"\n\
         2,\"Smith\",\"J.\",\"unknown\"\n"
    );
    assert_eq!(
        read(out, "submission_authors.csv"),
        "\"arxiv_id\",\"author_id\"\n\
         \"704.0002\",0\n\"704.0002\",2\n\"704.0003\",2\n\"704.0003\",1\n"
    );
    assert_eq!(
        read(out, "submission_categories.csv"),
        "\"arxiv_id\",\"category_id\"\n\"704.0002\",\"CO\"\n\"704.0003\",\"PR\"\n"
    );
    let categories = read(out, "categories.csv");
    assert_eq!(categories.lines().count(), 33);
    assert!(categories.contains("\"CO\",\"Combinatorics\"\n"));

    assert_eq!(summary.scan.lines_scanned, 6);
    assert_eq!(summary.scan.blank_lines, 1);
    assert_eq!(summary.scan.pre_filtered, 1);
    assert_eq!(summary.dropped["malformed_json"], 1);
    assert_eq!(summary.dropped["empty_history"], 1);
    assert_eq!(summary.rows("submissions"), Some(2));
    assert_eq!(summary.rows("authors"), Some(3));
    assert_eq!(summary.classifier_calls, 3);

    let manifest = RunManifest::read_from(out).unwrap();
    assert_eq!(manifest.area, "math");
    assert_eq!(manifest.tables.len(), 5);
    assert_eq!(manifest.tables["submission_authors.csv"].rows, 4);
    assert_eq!(manifest.dropped["empty_history"], 1);
}

#[test]
fn gzip_input_matches_plain_input() {
    let dir = TempDir::new().unwrap();
    let plain = write_snapshot(dir.path(), "snapshot.json", SNAPSHOT);
    let gz = write_snapshot(dir.path(), "snapshot.json.gz", SNAPSHOT);

    let a = config(&dir, plain, "plain");
    let b = config(&dir, gz, "gz");
    run(&a, &ProgressContext::hidden()).unwrap();
    run(&b, &ProgressContext::hidden()).unwrap();

    let ma = RunManifest::read_from(&a.output_dir).unwrap();
    let mb = RunManifest::read_from(&b.output_dir).unwrap();
    assert!(ma.same_tables(&mb));
    assert_ne!(ma.input_hash, mb.input_hash);
}

#[test]
fn rerun_gives_identical_tables() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(dir.path(), "snapshot.json", SNAPSHOT);
    let config = config(&dir, input, "out");

    run(&config, &ProgressContext::hidden()).unwrap();
    let first = RunManifest::read_from(&config.output_dir).unwrap();
    run(&config, &ProgressContext::hidden()).unwrap();
    let second = RunManifest::read_from(&config.output_dir).unwrap();
    assert!(first.same_tables(&second));
}

#[test]
fn unknown_category_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut lines = SNAPSHOT.to_vec();
    lines.push(
        r#"{"id":"704.0010","title":"Drift","abstract":"x","categories":"math.ZZ","versions":[{"version":"v1","created":"Wed, 4 Apr 2007 00:00:00 GMT"}],"authors_parsed":[]}"#,
    );
    let input = write_snapshot(dir.path(), "snapshot.json", &lines);
    let config = config(&dir, input, "out");

    let err = run(&config, &ProgressContext::hidden()).unwrap_err();
    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::UnknownCategory { code, .. }) => assert_eq!(code, "ZZ"),
        other => panic!("expected UnknownCategory, got {other:?}"),
    }

    let written = std::fs::read_dir(&config.output_dir)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(written, 0);
}

#[test]
fn no_manifest_when_disabled() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(dir.path(), "snapshot.json", SNAPSHOT);
    let config = Config {
        write_manifest: false,
        names_file: None,
        ..config(&dir, input, "out")
    };

    let summary = run(&config, &ProgressContext::hidden()).unwrap();
    assert_eq!(summary.classifier_calls, 3);
    assert!(!config.output_dir.join("manifest.json").exists());
    assert!(config.output_dir.join("authors.csv").exists());
    assert!(read(&config.output_dir, "authors.csv").contains("\"Maria\",\"unknown\""));
}

#[test]
fn manifest_failure_keeps_committed_tables() {
    let dir = TempDir::new().unwrap();
    let input = write_snapshot(dir.path(), "snapshot.json", SNAPSHOT);
    let config = config(&dir, input, "out");
    // A directory where manifest.json should go makes the write fail.
    std::fs::create_dir_all(config.output_dir.join("manifest.json")).unwrap();

    let summary = run(&config, &ProgressContext::hidden()).unwrap();
    assert_eq!(summary.rows("submissions"), Some(2));
    assert!(config.output_dir.join("submissions.csv").is_file());
    assert!(config.output_dir.join("manifest.json").is_dir());
}
