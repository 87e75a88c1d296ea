//! Integration tests for the asgraph CLI.
//!
//! These tests run the built binary against small datasets in temporary
//! directories.

use rstest::{fixture, rstest};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// Test Fixtures
// ============================================================================

/// Three tiers under a two-member clique, one IXP and one multihomed AS.
const DATASET: &str = "\
# source:topology|BGP|20240101|
# input clique: 174 3356
# IXP ASes: 1200
174|3356|0|bgp
174|64500|-1|bgp
3356|64501|-1|bgp
64500|64510|-1|bgp
64500|64511|-1|bgp
64501|64511|-1|bgp
1200|64501|0|mlp
1200|64520|0|mlp
64520|64521|0|bgp
";

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_asgraph"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute asgraph binary")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

/// A temporary directory holding `rel.txt`.
#[fixture]
fn workspace() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let dataset = temp.path().join("rel.txt");
    std::fs::write(&dataset, DATASET).expect("write dataset");
    (temp, dataset)
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn help_lists_commands() {
    let temp = TempDir::new().unwrap();
    let output = run_in(temp.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["build", "tiers", "show", "inspect", "init"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn version_prints_package_version() {
    let temp = TempDir::new().unwrap();
    let output = run_in(temp.path(), &["--version"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// Build
// ============================================================================

#[rstest]
fn build_reports_summary(workspace: (TempDir, PathBuf)) {
    let (temp, _) = workspace;

    let json = stdout_json(&run_in(temp.path(), &["--json", "build", "rel.txt"]));

    assert_eq!(json["entities"], 9);
    assert_eq!(json["tiers"], 3);
    assert_eq!(json["ixps"], 1);
    assert_eq!(json["classes"]["input_clique"], 2);
    assert_eq!(json["largest_cones"][0]["asn"], 174);
    assert_eq!(json["largest_cones"][0]["customer_cone_size"], 3);
}

#[rstest]
fn build_text_output(workspace: (TempDir, PathBuf)) {
    let (temp, _) = workspace;

    let output = run_in(temp.path(), &["build", "rel.txt"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Entities:     9"));
    assert!(stdout.contains("Largest customer cones"));
    assert!(stdout.contains("AS174"));
}

#[rstest]
fn build_writes_tsv_and_snapshot(workspace: (TempDir, PathBuf)) {
    let (temp, _) = workspace;

    let output = run_in(
        temp.path(),
        &["build", "rel.txt", "--tsv", "graph.tsv", "--snapshot", "graph.jsonl"],
    );

    assert!(output.status.success());
    let tsv = std::fs::read_to_string(temp.path().join("graph.tsv")).unwrap();
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines.len(), 10);
    assert!(lines[0].starts_with("asn\tpeers\tcustomers\tproviders"));
    assert!(lines[1].starts_with("174\t{3356}\t{64500}\t{}\ttrue\tfalse\t3\t2\t"));

    let snapshot = std::fs::read_to_string(temp.path().join("graph.jsonl")).unwrap();
    assert_eq!(snapshot.lines().count(), 10);
    assert!(!temp.path().join("graph.jsonl.tmp").exists());
}

#[rstest]
fn build_uses_config_outputs(workspace: (TempDir, PathBuf)) {
    let (temp, _) = workspace;
    std::fs::write(
        temp.path().join("asgraph.yaml"),
        "output:\n  tsv: from-config.tsv\ndisplay:\n  top-cones: 1\n",
    )
    .unwrap();

    let json = stdout_json(&run_in(temp.path(), &["--json", "build", "rel.txt"]));

    assert!(temp.path().join("from-config.tsv").exists());
    assert_eq!(json["largest_cones"].as_array().map(Vec::len), Some(1));
}

#[rstest]
fn explicit_config_path_must_exist(workspace: (TempDir, PathBuf)) {
    let (temp, _) = workspace;

    let output = run_in(temp.path(), &["--config", "missing.yaml", "build", "rel.txt"]);

    assert!(!output.status.success());
}

#[test]
fn cycle_in_dataset_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("rel.txt"), "1|2|-1\n2|3|-1\n3|1|-1\n").unwrap();

    let output = run_in(temp.path(), &["build", "rel.txt"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cycle"), "stderr: {stderr}");
}

#[test]
fn overlapping_link_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("rel.txt"), "1|2|-1\n2|1|0|bgp\n").unwrap();

    let output = run_in(temp.path(), &["build", "rel.txt"]);

    assert!(!output.status.success());
}

#[test]
fn malformed_line_names_line_number() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("rel.txt"), "1|2|-1\nnot a relationship\n").unwrap();

    let output = run_in(temp.path(), &["build", "rel.txt"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2"));
}

// ============================================================================
// Tiers and Show
// ============================================================================

#[rstest]
fn tiers_json_lists_every_rank(workspace: (TempDir, PathBuf)) {
    let (temp, _) = workspace;

    let json = stdout_json(&run_in(temp.path(), &["--json", "tiers", "rel.txt"]));

    let tiers = json.as_array().expect("array of tiers");
    assert_eq!(tiers.len(), 3);
    assert_eq!(tiers[2]["asns"], serde_json::json!([174, 3356]));
}

#[rstest]
#[case::leaves("0", serde_json::json!([1200, 64510, 64511, 64520, 64521]))]
#[case::middle("1", serde_json::json!([64500, 64501]))]
fn tiers_single_rank(
    workspace: (TempDir, PathBuf),
    #[case] rank: &str,
    #[case] expected: Value,
) {
    let (temp, _) = workspace;

    let json = stdout_json(&run_in(
        temp.path(),
        &["--json", "tiers", "rel.txt", "--rank", rank],
    ));

    assert_eq!(json[0]["asns"], expected);
}

#[rstest]
fn tiers_out_of_range_fails(workspace: (TempDir, PathBuf)) {
    let (temp, _) = workspace;

    let output = run_in(temp.path(), &["tiers", "rel.txt", "--rank", "7"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("out of range"));
}

#[rstest]
fn show_entity_json(workspace: (TempDir, PathBuf)) {
    let (temp, _) = workspace;

    let json = stdout_json(&run_in(temp.path(), &["--json", "show", "rel.txt", "64511"]));

    assert_eq!(json["providers"], serde_json::json!([64500, 64501]));
    assert_eq!(json["customer_cone_size"], 0);
    assert_eq!(json["propagation_rank"], 0);
    assert_eq!(json["multihomed"], true);
}

#[rstest]
fn show_unknown_asn_fails(workspace: (TempDir, PathBuf)) {
    let (temp, _) = workspace;

    let output = run_in(temp.path(), &["show", "rel.txt", "65000"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("AS65000 is not in the graph"));
}

// ============================================================================
// Inspect and Init
// ============================================================================

#[rstest]
fn inspect_reads_back_snapshot(workspace: (TempDir, PathBuf)) {
    let (temp, _) = workspace;
    let built = run_in(temp.path(), &["build", "rel.txt", "--snapshot", "graph.jsonl"]);
    assert!(built.status.success());

    let json = stdout_json(&run_in(temp.path(), &["--json", "inspect", "graph.jsonl"]));

    assert_eq!(json["header"]["entity_count"], 9);
    assert_eq!(json["header"]["format_version"], 1);
    assert_eq!(
        json["header"]["source_digest"].as_str().map(str::len),
        Some(64)
    );
    assert_eq!(json["summary"]["entities"], 9);
    assert_eq!(json["summary"]["largest_cones"][0]["customer_cone_size"], 3);
}

#[rstest]
fn inspect_rejects_edited_metrics(workspace: (TempDir, PathBuf)) {
    let (temp, _) = workspace;
    let built = run_in(temp.path(), &["build", "rel.txt", "--snapshot", "graph.jsonl"]);
    assert!(built.status.success());
    let path = temp.path().join("graph.jsonl");
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"customer_cone_size\":3,"));
    let edited = text.replace("\"customer_cone_size\":3,", "\"customer_cone_size\":5,");
    std::fs::write(&path, edited).unwrap();

    let output = run_in(temp.path(), &["inspect", "graph.jsonl"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("AS174 does not match"));
}

#[rstest]
fn inspect_rejects_oversized_entity_count(workspace: (TempDir, PathBuf)) {
    let (temp, _) = workspace;
    let built = run_in(temp.path(), &["build", "rel.txt", "--snapshot", "graph.jsonl"]);
    assert!(built.status.success());
    let path = temp.path().join("graph.jsonl");
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"entity_count\":9,"));
    let huge = format!("\"entity_count\":{},", usize::MAX);
    std::fs::write(&path, text.replacen("\"entity_count\":9,", &huge, 1)).unwrap();

    let output = run_in(temp.path(), &["inspect", "graph.jsonl"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("announces"), "stderr: {stderr}");
    assert!(!stderr.contains("panicked"));
}

#[test]
fn inspect_rejects_non_snapshot() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("bogus.jsonl"), "{\"hello\":1}\n").unwrap();

    let output = run_in(temp.path(), &["inspect", "bogus.jsonl"]);

    assert!(!output.status.success());
}

#[test]
fn init_writes_config_once() {
    let temp = TempDir::new().unwrap();

    let first = run_in(temp.path(), &["init", "--quiet"]);
    let second = run_in(temp.path(), &["init"]);
    let forced = run_in(temp.path(), &["init", "--force"]);

    assert!(first.status.success());
    assert!(temp.path().join("asgraph.yaml").exists());
    assert!(!second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("already exists"));
    assert!(forced.status.success());
}
