//! Bootstrap Service - creates a package end to end.
//!
//! Steps, in order, each recorded as a [`StepResult`]:
//! `generate`, `cue-init`, `cue-generate`, `validate-structure`, `git`,
//! `github`, `manifest`. A failing step ends the run; the GitHub step only
//! ever warns.

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::{
    application::{
        GenerationService, PackageRequest,
        ports::{CommandLine, CommandRunner},
    },
    domain::{EcosystemManifest, ManifestEntry, StepResult, WorkflowReport},
    error::ScaffoldResult,
};

/// Manifest location relative to the root path.
pub const MANIFEST_PATH: [&str; 2] = ["ecosystem", "ecosystem.manifest.json"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOptions {
    pub github_owner: String,
    pub skip_cue: bool,
    pub skip_git: bool,
    pub skip_github: bool,
    pub skip_manifest: bool,
    pub dry_run: bool,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            github_owner: "mark1russell7".into(),
            skip_cue: false,
            skip_git: false,
            skip_github: false,
            skip_manifest: false,
            dry_run: false,
        }
    }
}

pub struct BootstrapService {
    generation: GenerationService,
    runner: Box<dyn CommandRunner>,
}

impl BootstrapService {
    pub fn new(generation: GenerationService, runner: Box<dyn CommandRunner>) -> Self {
        Self { generation, runner }
    }

    pub fn generation(&self) -> &GenerationService {
        &self.generation
    }

    /// Create the package described by `request`.
    ///
    /// Errors before anything is written (bad name, registry mismatch,
    /// generator failure, existing package) come back as `Err`. Once files
    /// exist, failures are recorded in the report instead so the caller
    /// can see how far the run got.
    #[instrument(skip_all, fields(package = %request.name, preset = %request.preset, dry_run = options.dry_run))]
    pub fn run(
        &self,
        request: &PackageRequest,
        options: &BootstrapOptions,
    ) -> ScaffoldResult<WorkflowReport> {
        let mut report = WorkflowReport::new();
        let ctx = self.generation.context(request)?;

        let package_path = if options.dry_run {
            let plan = self.generation.plan(&ctx)?;
            report.push(StepResult::ok(
                "generate",
                format!(
                    "Would create {} directories and {} files in {}",
                    plan.directories.len(),
                    plan.files.len(),
                    plan.package_path.display()
                ),
            ));
            plan.package_path
        } else {
            let structure = self.generation.generate(&ctx)?;
            self.generation.write(&structure)?;
            report.push(StepResult::ok(
                "generate",
                format!(
                    "Wrote {} files to {}",
                    structure.files().count(),
                    structure.root().display()
                ),
            ));
            structure.root().to_path_buf()
        };

        let cue_steps = [
            (
                "cue-init",
                CommandLine::new("npx").args(["cue-config", "init", "--preset", request.preset.as_str()]),
            ),
            ("cue-generate", CommandLine::new("npx").args(["cue-config", "generate"])),
            (
                "validate-structure",
                CommandLine::new("npx").args(["cue-config", "validate-structure", "--path"]).arg(
                    package_path.display().to_string(),
                ),
            ),
        ];
        for (step, command) in cue_steps {
            if options.skip_cue {
                report.push(StepResult::skipped(step, "Skipped (cue disabled)"));
                continue;
            }
            if !self.step(&mut report, step, &[command], &package_path, options.dry_run) {
                return Ok(report);
            }
        }

        if options.skip_git {
            report.push(StepResult::skipped("git", "Skipped (git disabled)"));
        } else {
            let git = [
                CommandLine::new("git").arg("init"),
                CommandLine::new("git").args(["add", "-A"]),
                CommandLine::new("git").args(["commit", "-m", "Initial commit"]),
            ];
            if !self.step(&mut report, "git", &git, &package_path, options.dry_run) {
                return Ok(report);
            }
        }

        if options.skip_git || options.skip_github {
            report.push(StepResult::skipped("github", "Skipped (GitHub disabled)"));
        } else {
            report.push(self.github(request, options, &package_path));
        }

        if options.skip_manifest {
            report.push(StepResult::skipped("manifest", "Skipped (manifest disabled)"));
        } else {
            report.push(self.register_in_manifest(request, options));
        }

        info!(steps = report.steps.len(), "bootstrap finished");
        Ok(report)
    }

    /// Run `commands` in `cwd` as one step. Returns whether the run may
    /// continue.
    fn step(
        &self,
        report: &mut WorkflowReport,
        step: &str,
        commands: &[CommandLine],
        cwd: &Path,
        dry_run: bool,
    ) -> bool {
        let listing = commands
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" && ");

        if dry_run {
            report.push(StepResult::ok(step, format!("Would run: {listing}")));
            return true;
        }

        for command in commands {
            info!(%command, "running");
            if let Err(e) = self.runner.run(&command.clone().current_dir(cwd)) {
                warn!(step, error = %e, "step failed");
                report.push(StepResult::failed(step, e.to_string()));
                return false;
            }
        }
        report.push(StepResult::ok(step, format!("Ran: {listing}")));
        true
    }

    fn github(
        &self,
        request: &PackageRequest,
        options: &BootstrapOptions,
        package_path: &Path,
    ) -> StepResult {
        let repo = format!("{}/{}", options.github_owner, request.name);
        let commands = [
            CommandLine::new("gh").args(["repo", "create", repo.as_str(), "--private", "--source", "."]),
            CommandLine::new("git").args(["push", "-u", "origin", "main"]),
        ];

        if options.dry_run {
            return StepResult::ok("github", format!("Would create {repo} and push"));
        }

        for command in commands {
            if let Err(e) = self.runner.run(&command.current_dir(package_path)) {
                // The repository may already exist; not fatal.
                warn!(error = %e, "GitHub repo creation may have failed");
                return StepResult::ok(
                    "github",
                    format!("GitHub repo creation may have failed: {e}"),
                );
            }
        }
        StepResult::ok("github", format!("Created {repo} and pushed"))
    }

    fn register_in_manifest(
        &self,
        request: &PackageRequest,
        options: &BootstrapOptions,
    ) -> StepResult {
        let fs = self.generation.filesystem();
        let path: PathBuf = MANIFEST_PATH
            .iter()
            .fold(request.root_path.clone(), |p, part| p.join(part));

        if !fs.exists(&path) {
            warn!(path = %path.display(), "Ecosystem manifest not found, skipping");
            return StepResult::skipped("manifest", "Ecosystem manifest not found");
        }

        let full_name = request.full_package_name();
        let result = fs.read_file(&path).and_then(|source| {
            let mut manifest = EcosystemManifest::from_json(&source)?;
            if !manifest.add_package(
                full_name.clone(),
                ManifestEntry::github(&options.github_owner, &request.name),
            )? {
                return Ok(false);
            }
            if !options.dry_run {
                fs.write_file(&path, &manifest.to_json()?)?;
            }
            Ok(true)
        });

        match result {
            Ok(false) => StepResult::ok("manifest", format!("{full_name} already in manifest")),
            Ok(true) if options.dry_run => {
                StepResult::ok("manifest", format!("Would add {full_name} to manifest"))
            }
            Ok(true) => {
                info!(package = %full_name, "added to ecosystem manifest");
                StepResult::ok("manifest", format!("Added {full_name} to manifest"))
            }
            Err(e) => StepResult::failed("manifest", e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use mockall::predicate::*;

    use super::*;
    use crate::{
        application::{
            ApplicationError, GeneratorRegistry,
            ports::{CommandOutput, Filesystem, MockCommandRunner},
        },
        domain::{FeatureResolver, GeneratorContext, file_paths, repo_schema},
        error::ScaffoldError,
    };

    #[derive(Default, Clone)]
    struct SharedFs(Arc<Mutex<BTreeMap<PathBuf, String>>>);

    impl Filesystem for SharedFs {
        fn create_dir_all(&self, path: &Path) -> ScaffoldResult<()> {
            self.0.lock().unwrap().entry(path.to_path_buf()).or_default();
            Ok(())
        }
        fn write_file(&self, path: &Path, content: &str) -> ScaffoldResult<()> {
            self.0
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }
        fn read_file(&self, path: &Path) -> ScaffoldResult<String> {
            self.0
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| ApplicationError::filesystem(path, "not found").into())
        }
        fn exists(&self, path: &Path) -> bool {
            self.0.lock().unwrap().contains_key(path)
        }
        fn remove_dir_all(&self, path: &Path) -> ScaffoldResult<()> {
            self.0.lock().unwrap().retain(|p, _| !p.starts_with(path));
            Ok(())
        }
        fn remove_file(&self, path: &Path) -> ScaffoldResult<()> {
            self.0.lock().unwrap().remove(path);
            Ok(())
        }
    }

    fn empty(_: &str, _: &GeneratorContext) -> ScaffoldResult<String> {
        Ok(String::new())
    }

    fn service(fs: SharedFs, runner: MockCommandRunner) -> BootstrapService {
        let registry = file_paths(repo_schema())
            .into_iter()
            .fold(GeneratorRegistry::new(), |reg, path| reg.with(path, empty));
        let generation = GenerationService::new(
            repo_schema().clone(),
            registry,
            FeatureResolver::default(),
            Box::new(fs),
        );
        BootstrapService::new(generation, Box::new(runner))
    }

    fn request() -> PackageRequest {
        PackageRequest::new("widgets", "/work").scope("@acme")
    }

    fn quiet() -> BootstrapOptions {
        BootstrapOptions {
            github_owner: "acme".into(),
            skip_cue: true,
            skip_git: true,
            skip_github: true,
            skip_manifest: true,
            dry_run: false,
        }
    }

    #[test]
    fn all_external_steps_can_be_skipped() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let report = service(SharedFs::default(), runner)
            .run(&request(), &quiet())
            .unwrap();

        let names: Vec<_> = report.steps.iter().map(|s| s.step.as_str()).collect();
        assert_eq!(
            names,
            ["generate", "cue-init", "cue-generate", "validate-structure", "git", "github", "manifest"]
        );
        assert!(report.succeeded());
        assert!(report.steps[1..].iter().all(|s| s.skipped));
    }

    #[test]
    fn commands_run_in_package_directory_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|cmd| cmd.cwd.as_deref() == Some(Path::new("/work/widgets")))
            .returning(move |cmd| {
                sink.lock().unwrap().push(cmd.to_string());
                Ok(CommandOutput::default())
            });

        let options = BootstrapOptions {
            skip_cue: false,
            skip_git: false,
            skip_github: false,
            ..quiet()
        };
        let report = service(SharedFs::default(), runner)
            .run(&request(), &options)
            .unwrap();

        assert!(report.succeeded());
        assert_eq!(
            *calls.lock().unwrap(),
            [
                "npx cue-config init --preset lib",
                "npx cue-config generate",
                "npx cue-config validate-structure --path /work/widgets",
                "git init",
                "git add -A",
                "git commit -m \"Initial commit\"",
                "gh repo create acme/widgets --private --source .",
                "git push -u origin main",
            ]
        );
    }

    #[test]
    fn failing_cue_step_stops_the_run() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(1).returning(|cmd| {
            Err(ApplicationError::CommandFailed {
                command: cmd.to_string(),
                reason: "exit status 1".into(),
            }
            .into())
        });

        let options = BootstrapOptions {
            skip_cue: false,
            ..quiet()
        };
        let report = service(SharedFs::default(), runner)
            .run(&request(), &options)
            .unwrap();

        assert!(!report.succeeded());
        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.failed_step().unwrap().step, "cue-init");
    }

    #[test]
    fn github_failure_only_warns() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|cmd| cmd.program == "git")
            .returning(|_| Ok(CommandOutput::default()));
        runner
            .expect_run()
            .withf(|cmd| cmd.program == "gh")
            .returning(|cmd| {
                Err(ApplicationError::CommandFailed {
                    command: cmd.to_string(),
                    reason: "repository exists".into(),
                }
                .into())
            });

        let options = BootstrapOptions {
            skip_git: false,
            skip_github: false,
            ..quiet()
        };
        let report = service(SharedFs::default(), runner)
            .run(&request(), &options)
            .unwrap();

        assert!(report.succeeded());
        assert!(report
            .step("github")
            .unwrap()
            .message
            .contains("may have failed"));
        assert!(report.step("manifest").unwrap().skipped);
    }

    #[test]
    fn manifest_gains_the_new_package() {
        let fs = SharedFs::default();
        let manifest = PathBuf::from("/work/ecosystem/ecosystem.manifest.json");
        fs.write_file(&manifest, r#"{ "packages": {} }"#).unwrap();

        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();
        let options = BootstrapOptions {
            skip_manifest: false,
            ..quiet()
        };
        let report = service(fs.clone(), runner)
            .run(&request(), &options)
            .unwrap();

        assert_eq!(
            report.step("manifest").unwrap().message,
            "Added @acme/widgets to manifest"
        );
        let written = fs.read_file(&manifest).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            value["packages"]["@acme/widgets"]["repo"],
            "github:acme/widgets#main"
        );
        assert_eq!(value["packages"]["@acme/widgets"]["path"], "widgets");
    }

    #[test]
    fn manifest_rewrite_keeps_other_packages_intact() {
        let fs = SharedFs::default();
        let manifest = PathBuf::from("/work/ecosystem/ecosystem.manifest.json");
        fs.write_file(
            &manifest,
            r#"{
  "version": "1.0.0",
  "packages": {
    "@acme/core": { "repo": "github:acme/core#dev", "branch": "dev", "deps": ["x"] }
  }
}"#,
        )
        .unwrap();

        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();
        let options = BootstrapOptions {
            skip_manifest: false,
            ..quiet()
        };
        let report = service(fs.clone(), runner)
            .run(&request(), &options)
            .unwrap();
        assert!(report.succeeded());

        let value: serde_json::Value =
            serde_json::from_str(&fs.read_file(&manifest).unwrap()).unwrap();
        assert_eq!(
            value["packages"]["@acme/core"],
            serde_json::json!({ "repo": "github:acme/core#dev", "branch": "dev", "deps": ["x"] })
        );
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["version", "packages"]);
    }

    #[test]
    fn missing_manifest_is_skipped() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();
        let options = BootstrapOptions {
            skip_manifest: false,
            ..quiet()
        };
        let report = service(SharedFs::default(), runner)
            .run(&request(), &options)
            .unwrap();

        let step = report.step("manifest").unwrap();
        assert!(step.skipped);
        assert_eq!(step.message, "Ecosystem manifest not found");
    }

    #[test]
    fn dry_run_writes_nothing_and_runs_nothing() {
        let fs = SharedFs::default();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();
        let options = BootstrapOptions {
            dry_run: true,
            skip_cue: false,
            skip_git: false,
            skip_github: false,
            ..quiet()
        };

        let report = service(fs.clone(), runner)
            .run(&request(), &options)
            .unwrap();

        assert!(fs.0.lock().unwrap().is_empty());
        assert!(report.step("generate").unwrap().message.starts_with("Would create 1 directories and 6 files"));
        assert_eq!(
            report.step("git").unwrap().message,
            "Would run: git init && git add -A && git commit -m \"Initial commit\""
        );
    }

    #[test]
    fn existing_package_is_an_error_not_a_report() {
        let fs = SharedFs::default();
        fs.create_dir_all(Path::new("/work/widgets")).unwrap();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let err = service(fs, runner).run(&request(), &quiet()).unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::Application(ApplicationError::ProjectExists { .. })
        ));
    }

    #[test]
    fn preset_flows_into_cue_init() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .with(function(|cmd: &CommandLine| cmd.args.first().map(String::as_str) == Some("cue-config")))
            .returning(|_| Ok(CommandOutput::default()));

        let options = BootstrapOptions {
            skip_cue: false,
            ..quiet()
        };
        let report = service(SharedFs::default(), runner)
            .run(&request().preset("react-lib"), &options)
            .unwrap();

        assert_eq!(
            report.step("cue-init").unwrap().message,
            "Ran: npx cue-config init --preset react-lib"
        );
    }
}
