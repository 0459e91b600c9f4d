//! Full generation runs against the local filesystem.

use std::fs;
use std::sync::Arc;

use scaffold_adapters::{LocalFilesystem, RecordingCommandRunner, builtin_registry};
use scaffold_core::{
    application::{ApplicationError, ports::CommandOutput},
    prelude::*,
};
use tempfile::TempDir;

fn cue_echo() -> RecordingCommandRunner {
    RecordingCommandRunner::responding(|cmd| {
        let expression = cmd.args.get(1).cloned().unwrap_or_default();
        Ok(CommandOutput::new(format!(r#"{{"expression":"{expression}"}}"#)))
    })
}

fn service(runner: RecordingCommandRunner) -> GenerationService {
    GenerationService::new(
        repo_schema().clone(),
        builtin_registry(Arc::new(runner)).unwrap(),
        FeatureResolver::default(),
        Box::new(LocalFilesystem::new()),
    )
}

#[test]
fn lib_preset_writes_the_canonical_package() {
    let tmp = TempDir::new().unwrap();
    let runner = cue_echo();

    service(runner.clone())
        .scaffold(&PackageRequest::new("widgets", tmp.path()).preset("lib"))
        .unwrap();

    let pkg = tmp.path().join("widgets");
    for file in [
        "package.json",
        "tsconfig.json",
        ".gitignore",
        "dependencies.json",
        "vitest.config.ts",
        "src/index.ts",
        "src/.gitkeep",
    ] {
        assert!(pkg.join(file).is_file(), "{file} missing");
    }

    assert_eq!(
        fs::read_to_string(pkg.join("package.json")).unwrap(),
        "{\n  \"expression\": \"npm/package:output\"\n}\n"
    );
    assert_eq!(
        fs::read_to_string(pkg.join("dependencies.json")).unwrap(),
        "{\n  \"features\": [\n    \"npm\",\n    \"ts\",\n    \"vitest\",\n    \"cue\"\n  ]\n}\n"
    );
    assert!(
        fs::read_to_string(pkg.join("src/index.ts"))
            .unwrap()
            .contains(" * @mark1russell7/widgets\n")
    );

    let evaluated: Vec<String> = runner.calls().iter().map(|c| c.args[1].clone()).collect();
    assert_eq!(
        evaluated,
        ["npm/package:output", "ts/config:output", "git/ignore:output"]
    );
}

#[test]
fn unknown_preset_only_writes_core_files() {
    let tmp = TempDir::new().unwrap();

    service(cue_echo())
        .scaffold(&PackageRequest::new("bare", tmp.path()).preset("no-such-preset"))
        .unwrap();

    let pkg = tmp.path().join("bare");
    assert!(pkg.join(".gitignore").is_file());
    assert!(pkg.join("src/.gitkeep").is_file());
    assert!(!pkg.join("dependencies.json").exists());
    assert!(!pkg.join("package.json").exists());
    assert!(!pkg.join("vitest.config.ts").exists());
}

#[test]
fn generator_failure_leaves_nothing_behind() {
    let tmp = TempDir::new().unwrap();
    let runner = RecordingCommandRunner::responding(|cmd| {
        Err(ApplicationError::CommandFailed {
            command: cmd.to_string(),
            reason: "cue: command not found".into(),
        }
        .into())
    });

    let err = service(runner)
        .scaffold(&PackageRequest::new("broken", tmp.path()))
        .unwrap_err();

    assert!(matches!(
        err,
        ScaffoldError::Application(ApplicationError::GeneratorFailed { .. })
    ));
    assert!(!tmp.path().join("broken").exists());
}

#[test]
fn existing_package_is_refused() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("taken")).unwrap();

    let err = service(cue_echo())
        .scaffold(&PackageRequest::new("taken", tmp.path()))
        .unwrap_err();

    assert!(matches!(
        err,
        ScaffoldError::Application(ApplicationError::ProjectExists { .. })
    ));
}
