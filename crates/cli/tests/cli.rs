//! End-to-end tests for the `clientgen` binary.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const MODEL: &str = r##"{
    "types": [
        {
            "namespace": "Demo",
            "name": "Person",
            "members": [
                { "name": "Surname", "type": { "kind": "builtin", "name": "string" } },
                { "name": "GivenName", "type": { "kind": "builtin", "name": "string" } },
                { "name": "Id", "type": { "kind": "builtin", "name": "int64" },
                  "markers": [ { "policy": "frameworkValidationOptOut", "required": true } ] }
            ]
        }
    ],
    "actions": [
        {
            "controller": { "namespace": "Demo.Controllers", "name": "People" },
            "name": "CreatePerson",
            "route": "api/people",
            "verb": "POST",
            "parameters": [
                { "name": "p", "source": "body", "type": { "kind": "named", "namespace": "Demo", "name": "Person" } }
            ],
            "returnType": { "kind": "builtin", "name": "int64" }
        }
    ]
}"##;

fn clientgen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_clientgen"))
        .args(args)
        .env("CLIENTGEN_LOG", "warn")
        .output()
        .expect("failed to run clientgen")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_missing_positionals_prints_usage() {
    let out = clientgen(&[]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Usage:"), "stdout: {stdout}");

    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.json");
    fs::write(&model, MODEL).unwrap();
    let out = clientgen(&[path_arg(&model)]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_generates_client_file() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.json");
    let output = dir.path().join("client.ts");
    fs::write(&model, MODEL).unwrap();

    let out = clientgen(&[path_arg(&model), path_arg(&output)]);
    assert_eq!(
        out.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let code = fs::read_to_string(&output).unwrap();
    assert!(code.contains("export namespace Demo_Client {"));
    assert!(code.contains("    surname?: string;\n"));
    assert!(code.contains("    id?: string;\n"));
    assert!(code.contains("async createPerson(p: Demo_Client.Person"));
    assert!(code.contains("Promise<string>"));
}

#[test]
fn test_policy_bits_and_flags() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.json");
    let output = dir.path().join("client.ts");
    fs::write(&model, MODEL).unwrap();

    let out = clientgen(&[
        path_arg(&model),
        path_arg(&output),
        "8",
        "--case",
        "pascal",
        "--strict-nulls",
        "--base-uri",
        "http://localhost:5000/",
    ]);
    assert_eq!(out.status.code(), Some(0));

    let code = fs::read_to_string(&output).unwrap();
    // Validation opt-out: the required marker makes Id a required field.
    assert!(code.contains("    Id: string;\n"));
    assert!(code.contains("    Surname?: string | null;\n"));
    assert!(code.contains("private baseUri: string = \"http://localhost:5000/\""));
}

#[test]
fn test_failure_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.json");
    let output = dir.path().join("client.ts");
    fs::write(
        &model,
        r#"{ "types": [ { "namespace": "Demo", "name": "Person", "members": [
            { "name": "Employer", "type": { "kind": "named", "namespace": "Demo", "name": "Company" } } ] } ] }"#,
    )
    .unwrap();

    let out = clientgen(&[path_arg(&model), path_arg(&output)]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Person.Employer: reference to unknown type 'Demo.Company'"));
    assert!(!output.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_missing_model_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("client.ts");
    let out = clientgen(&["does-not-exist.json", path_arg(&output)]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to read model snapshot"));
    assert!(!output.exists());
}

#[test]
fn test_check_mode() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.json");
    let output = dir.path().join("client.ts");
    fs::write(&model, MODEL).unwrap();

    // Nothing generated yet: stale, diff on stdout, file untouched.
    let out = clientgen(&[path_arg(&model), path_arg(&output), "--check"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("+++ "));
    assert!(!output.exists());

    assert_eq!(
        clientgen(&[path_arg(&model), path_arg(&output)]).status.code(),
        Some(0)
    );

    let out = clientgen(&[path_arg(&model), path_arg(&output), "--check"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());

    // A hand edit is reported and left in place.
    let edited = fs::read_to_string(&output).unwrap().replace("surname", "lastName");
    fs::write(&output, &edited).unwrap();
    let out = clientgen(&[path_arg(&model), path_arg(&output), "--check"]);
    assert_eq!(out.status.code(), Some(1));
    let diff = String::from_utf8_lossy(&out.stdout);
    assert!(diff.contains("-    lastName?: string;\n"));
    assert!(diff.contains("+    surname?: string;\n"));
    assert_eq!(fs::read_to_string(&output).unwrap(), edited);
}
