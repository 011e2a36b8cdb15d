use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use pbjson::{FormatError, FormatOptions, fixture_to_json};

#[derive(Debug, Deserialize)]
struct FixtureFile {
    description: String,
    #[serde(default)]
    enums: Vec<serde_json::Value>,
    #[serde(default)]
    messages: Vec<serde_json::Value>,
    tests: Vec<FixtureCase>,
}

#[derive(Debug, Deserialize)]
struct FixtureCase {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    message: serde_json::Value,
    expected: Option<String>,
    error: Option<String>,
    options: Option<serde_json::Value>,
}

#[test]
fn encode_fixtures() {
    let files = load_fixture_files(&fixture_root());
    assert!(!files.is_empty(), "no encode fixtures found");

    let mut cases = 0;
    for (path, file) in files {
        for case in &file.tests {
            run_case(&path, &file, case);
            cases += 1;
        }
    }
    assert!(cases > 0, "encode fixtures contain no cases");
}

fn run_case(path: &Path, file: &FixtureFile, case: &FixtureCase) {
    let document = serde_json::json!({
        "enums": file.enums,
        "messages": file.messages,
        "type": case.type_name,
        "message": case.message,
    });
    let options = parse_format_options(case.options.as_ref());
    let result = fixture_to_json(&document.to_string(), options);
    let label = format!("{} / {} / {}", path.display(), file.description, case.name);

    match (&case.expected, &case.error) {
        (Some(expected), None) => {
            let output = result.unwrap_or_else(|err| panic!("fixture '{label}' failed: {err}"));
            assert_eq!(
                &output, expected,
                "fixture '{label}' failed (expected {expected:?}, got {output:?})"
            );
        }
        (None, Some(kind)) => match result {
            Ok(output) => panic!("fixture '{label}' expected {kind} error, got {output:?}"),
            Err(err) => assert_eq!(
                error_kind(&err),
                kind,
                "fixture '{label}' raised the wrong error: {err}"
            ),
        },
        _ => panic!("fixture '{label}' needs exactly one of `expected` or `error`"),
    }
}

fn parse_format_options(options: Option<&serde_json::Value>) -> Option<FormatOptions> {
    let options = options?;
    let emit_defaults = options
        .get("emitDefaults")
        .and_then(serde_json::Value::as_bool);
    Some(FormatOptions {
        emit_default_values: emit_defaults,
    })
}

const fn error_kind(err: &FormatError) -> &'static str {
    match err {
        FormatError::InvalidSchema { .. } => "InvalidSchema",
        FormatError::MalformedWellKnown { .. } => "MalformedWellKnown",
        FormatError::InvalidText { .. } => "InvalidText",
        FormatError::Io { .. } => "Io",
        FormatError::Json { .. } => "Json",
        FormatError::Fixture { .. } => "Fixture",
    }
}

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/encode")
}

fn load_fixture_files(dir: &Path) -> Vec<(PathBuf, FixtureFile)> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .map(|entry| {
            let path = entry.into_path();
            let contents = fs::read_to_string(&path)
                .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
            let parsed: FixtureFile = serde_json::from_str(&contents)
                .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
            (path, parsed)
        })
        .collect()
}
