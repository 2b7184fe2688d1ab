//! End-to-end tests for the `lil-curio` command surface
//!
//! Every test drives `cli::execute` with in-memory stdout and stderr.

use std::path::PathBuf;

use lil_curio::cli::execute;
use lil_curio::output::JsonReport;
use lil_curio::Status;

fn fixture(relative: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
        .display()
        .to_string()
}

struct Run {
    code: i32,
    stdout: String,
    stderr: String,
}

fn run(args: &[&str]) -> Run {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let args = std::iter::once("lil-curio").chain(args.iter().copied());
    let code = execute(args, &mut out, &mut err);
    Run {
        code,
        stdout: String::from_utf8(out).unwrap(),
        stderr: String::from_utf8(err).unwrap(),
    }
}

// =============================================================================
// validate
// =============================================================================

#[test]
fn test_validate_valid_schema() {
    let file = fixture("json/valid-schema.json");
    let result = run(&["validate", &file, "-t", "json", "-l", "full"]);

    assert_eq!(result.code, 0, "stderr: {}", result.stderr);
    assert_eq!(
        result.stdout,
        format!("PASS: Schema validation succeeded for {} (level: FULL)\n", file)
    );
    assert!(result.stderr.is_empty());
}

#[test]
fn test_validate_defaults_to_full() {
    let result = run(&["validate", &fixture("json/invalid-semantics.json"), "-t", "json"]);
    assert_eq!(result.code, 1);
    assert!(result.stderr.contains("(level: FULL)"));
}

#[test]
fn test_validate_invalid_syntax() {
    let file = fixture("json/invalid-syntax.json");
    let result = run(&["validate", &file, "-t", "json", "-l", "syntax_only"]);

    assert_eq!(result.code, 1);
    assert!(result.stdout.is_empty());
    let header = format!(
        "FAIL: Schema validation failed for {} (level: SYNTAX_ONLY)\nViolations:\n",
        file
    );
    assert!(result.stderr.starts_with(&header));
    assert!(result.stderr.lines().any(|line| line.starts_with("  - ")));
}

#[test]
fn test_syntax_level_ignores_semantic_problems() {
    let file = fixture("json/invalid-semantics.json");
    let result = run(&["validate", &file, "-t", "json", "-l", "syntax"]);
    assert_eq!(result.code, 0, "stderr: {}", result.stderr);
}

#[test]
fn test_validate_none_level_accepts_anything() {
    let file = fixture("json/invalid-syntax.json");
    let result = run(&["validate", &file, "-t", "JSON", "-l", "NONE"]);
    assert_eq!(result.code, 0);
    assert!(result.stdout.contains("(level: NONE)"));
}

#[test]
fn test_validate_json_output_round_trips() {
    let result = run(&["validate", &fixture("json/invalid-syntax.json"), "-t", "json", "--json"]);
    assert_eq!(result.code, 1);
    assert!(result.stderr.is_empty());

    let report: JsonReport = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(report.status, Status::Fail);
    assert_eq!(report.level, "FULL");
    assert!(!report.violations.unwrap().is_empty());

    let result = run(&["validate", &fixture("json/valid-schema.json"), "-t", "json", "--json"]);
    assert_eq!(result.code, 0);
    let report: JsonReport = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(report.status, Status::Pass);
    assert!(report.violations.is_none());
}

#[test]
fn test_validate_avro() {
    let result = run(&["validate", &fixture("avro/user-v1.avsc"), "-t", "avro"]);
    assert_eq!(result.code, 0, "stderr: {}", result.stderr);
}

// =============================================================================
// compatibility
// =============================================================================

#[test]
fn test_compatible_evolution() {
    let result = run(&[
        "compatibility",
        &fixture("json/schema-v1.json"),
        &fixture("json/schema-v2-compatible.json"),
        "-t",
        "json",
        "-l",
        "backward",
    ]);
    assert_eq!(result.code, 0, "stderr: {}", result.stderr);
    assert!(result.stdout.starts_with("PASS: Compatibility check succeeded for"));
    assert!(result.stdout.contains("schema-v2-compatible.json (level: BACKWARD)"));
}

#[test]
fn test_incompatible_evolution() {
    let result = run(&[
        "compatibility",
        &fixture("json/schema-v1.json"),
        &fixture("json/schema-v2-incompatible.json"),
        "-t",
        "json",
        "-l",
        "backward",
    ]);
    assert_eq!(result.code, 1);
    assert!(result.stderr.contains("Incompatible differences:"));
    assert!(result.stderr.contains("[at: /properties/orderId/type]"));
}

#[test]
fn test_compatibility_is_asymmetric() {
    let v1 = fixture("avro/user-v1.avsc");
    let v2 = fixture("avro/user-v2-compatible.avsc");

    assert_eq!(run(&["compatibility", &v1, &v2, "-t", "avro", "-l", "backward"]).code, 0);
    assert_eq!(run(&["compatibility", &v1, &v2, "-t", "avro", "-l", "forward"]).code, 1);
    assert_eq!(run(&["compatibility", &v2, &v1, "-t", "avro", "-l", "backward"]).code, 1);
}

#[test]
fn test_avro_field_without_default() {
    let result = run(&[
        "compatibility",
        &fixture("avro/user-v1.avsc"),
        &fixture("avro/user-v2-incompatible.avsc"),
        "-t",
        "avro",
        "--json",
    ]);
    assert_eq!(result.code, 1);
    let report: JsonReport = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(report.command.as_str(), "compatibility");
    assert_eq!(report.level, "BACKWARD");
}

#[test]
fn test_self_compatibility_at_every_level() {
    let v1 = fixture("json/schema-v1.json");
    for level in [
        "none",
        "backward",
        "backward-transitive",
        "forward",
        "forward_transitive",
        "full",
        "FULL_TRANSITIVE",
    ] {
        let result = run(&["compatibility", &v1, &v1, "-t", "json", "-l", level]);
        assert_eq!(result.code, 0, "level {}: {}", level, result.stderr);
    }
}

#[test]
fn test_transitive_history() {
    let v1 = fixture("json/schema-v2-incompatible.json");
    let v2 = fixture("json/schema-v1.json");
    let v3 = fixture("json/schema-v2-compatible.json");

    assert_eq!(run(&["compatibility", &v1, &v2, &v3, "-t", "json", "-l", "backward"]).code, 0);
    assert_eq!(
        run(&["compatibility", &v1, &v2, &v3, "-t", "json", "-l", "backward-transitive"]).code,
        1
    );
}

// =============================================================================
// usage and environment errors
// =============================================================================

#[test]
fn test_unknown_schema_type() {
    let result = run(&["validate", &fixture("json/valid-schema.json"), "-t", "xml"]);
    assert_eq!(result.code, 2);
    assert_eq!(result.stderr, "Error: Unsupported schema type: xml. Supported: json, avro\n");
}

#[test]
fn test_protobuf_is_not_registered() {
    let result = run(&["validate", &fixture("json/valid-schema.json"), "-t", "protobuf"]);
    assert_eq!(result.code, 2);
    assert!(result.stderr.contains("No support registered for schema type: protobuf"));
}

#[test]
fn test_invalid_level() {
    let file = fixture("json/valid-schema.json");
    let result = run(&["validate", &file, "-t", "json", "-l", "strict"]);
    assert_eq!(result.code, 2);
    assert!(result.stderr.contains("Invalid validity level: strict"));
}

#[test]
fn test_missing_file() {
    let result = run(&["validate", "does/not/exist.json", "-t", "json"]);
    assert_eq!(result.code, 2);
    assert!(result.stderr.starts_with("Error: "));
}

#[test]
fn test_compatibility_needs_two_files() {
    let result = run(&["compatibility", &fixture("json/schema-v1.json"), "-t", "json"]);
    assert_eq!(result.code, 2);
    assert!(!result.stderr.is_empty());
}

#[test]
fn test_help_and_usage_exit_zero() {
    let invocations: [&[&str]; 5] =
        [&[], &["--help"], &["-h"], &["validate", "--help"], &["diff", "-h"]];
    for args in invocations {
        let result = run(args);
        assert_eq!(result.code, 0, "args {:?}", args);
        assert!(result.stdout.contains("Usage"), "args {:?}: {}", args, result.stdout);
        assert!(result.stderr.is_empty());
    }
}

#[test]
fn test_version() {
    let result = run(&["--version"]);
    assert_eq!(result.code, 0);
    assert!(result.stdout.contains(env!("CARGO_PKG_VERSION")));
}

// =============================================================================
// configuration
// =============================================================================

#[test]
fn test_schema_type_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("curio.toml");
    std::fs::write(&config, "[defaults]\nschema_type = \"json\"\njson = true\n").unwrap();
    let config = config.display().to_string();

    let result = run(&["validate", &fixture("json/valid-schema.json"), "--config", &config]);
    assert_eq!(result.code, 0, "stderr: {}", result.stderr);
    let report: JsonReport = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(report.status, Status::Pass);

    // explicit flags win over configuration
    let file = fixture("json/valid-schema.json");
    let result = run(&["validate", &file, "--config", &config, "-t", "xml"]);
    assert_eq!(result.code, 2);
}

#[test]
fn test_missing_schema_type() {
    let result = run(&["validate", &fixture("json/valid-schema.json")]);
    assert_eq!(result.code, 2);
    assert!(result.stderr.contains("--type"));
}

#[test]
fn test_unreadable_config() {
    let result = run(&[
        "validate",
        &fixture("json/valid-schema.json"),
        "-t",
        "json",
        "--config",
        "no/such/config.toml",
    ]);
    assert_eq!(result.code, 2);
    assert!(result.stderr.starts_with("Error: Configuration error"));
}
