//! External delegation: content comes from `cue eval`.

use std::sync::Arc;

use tracing::{debug, instrument};

use scaffold_core::{
    application::{
        ApplicationError,
        ports::{CommandLine, CommandRunner, Generator},
    },
    domain::GeneratorContext,
    error::ScaffoldResult,
};

/// Evaluates one CUE expression with the active features injected, in the
/// run's root path, and pretty-prints the JSON it yields.
#[derive(Clone)]
pub struct ExternalGenerator {
    expression: String,
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for ExternalGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalGenerator")
            .field("expression", &self.expression)
            .finish_non_exhaustive()
    }
}

impl ExternalGenerator {
    pub fn new(expression: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            expression: expression.into(),
            runner,
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// `cue eval <expr> --inject feature_<name>=true ... --out json`
    pub fn command(&self, ctx: &GeneratorContext) -> CommandLine {
        ctx.features()
            .iter()
            .fold(
                CommandLine::new("cue").args(["eval", self.expression.as_str()]),
                |cmd, feature| cmd.args(["--inject".to_string(), format!("feature_{feature}=true")]),
            )
            .args(["--out", "json"])
            .current_dir(ctx.root_path())
    }

    fn failed(&self, path: &str, reason: impl std::fmt::Display) -> ApplicationError {
        ApplicationError::GeneratorFailed {
            path: path.to_string(),
            reason: format!("CUE evaluation failed for {}: {reason}", self.expression),
        }
    }
}

impl Generator for ExternalGenerator {
    #[instrument(skip_all, fields(path = %path, expression = %self.expression))]
    fn generate(&self, path: &str, ctx: &GeneratorContext) -> ScaffoldResult<String> {
        let command = self.command(ctx);
        debug!(%command, "evaluating");

        let output = self.runner.run(&command).map_err(|e| self.failed(path, e))?;
        let value: serde_json::Value =
            serde_json::from_str(&output.stdout).map_err(|e| self.failed(path, e))?;
        let mut content = serde_json::to_string_pretty(&value).map_err(|e| self.failed(path, e))?;
        content.push('\n');
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RecordingCommandRunner;
    use scaffold_core::{
        application::ports::CommandOutput,
        domain::Feature,
        error::ScaffoldError,
    };
    use std::path::Path;

    fn ctx() -> GeneratorContext {
        GeneratorContext::new(
            "widgets",
            "@acme/widgets",
            [Feature::Core, Feature::Npm].into_iter().collect(),
            "lib",
            "/work",
        )
    }

    #[test]
    fn injects_every_active_feature() {
        let runner = RecordingCommandRunner::responding(|_| Ok(CommandOutput::new("{}")));
        let generator = ExternalGenerator::new("npm/package:output", Arc::new(runner.clone()));

        generator.generate("package.json", &ctx()).unwrap();

        let calls = runner.calls();
        assert_eq!(
            calls[0].to_string(),
            "cue eval npm/package:output --inject feature_core=true --inject feature_npm=true --out json"
        );
        assert_eq!(calls[0].cwd.as_deref(), Some(Path::new("/work")));
    }

    #[test]
    fn output_is_pretty_printed_with_trailing_newline() {
        let runner = RecordingCommandRunner::responding(|_| {
            Ok(CommandOutput::new(r#"{"name":"@acme/widgets","private":false}"#))
        });
        let out = ExternalGenerator::new("npm/package:output", Arc::new(runner))
            .generate("package.json", &ctx())
            .unwrap();
        assert_eq!(out, "{\n  \"name\": \"@acme/widgets\",\n  \"private\": false\n}\n");
    }

    #[test]
    fn failure_names_the_expression() {
        let runner = RecordingCommandRunner::responding(|cmd| {
            Err(ApplicationError::CommandFailed {
                command: cmd.to_string(),
                reason: "cannot find package".into(),
            }
            .into())
        });
        let err = ExternalGenerator::new("ts/config:output", Arc::new(runner))
            .generate("tsconfig.json", &ctx())
            .unwrap_err();

        match err {
            ScaffoldError::Application(ApplicationError::GeneratorFailed { path, reason }) => {
                assert_eq!(path, "tsconfig.json");
                assert!(reason.starts_with("CUE evaluation failed for ts/config:output:"));
                assert!(reason.contains("cannot find package"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn non_json_output_fails() {
        let runner = RecordingCommandRunner::responding(|_| Ok(CommandOutput::new("not json")));
        let err = ExternalGenerator::new("git/ignore:output", Arc::new(runner))
            .generate(".gitignore", &ctx())
            .unwrap_err();
        assert!(err.to_string().contains("git/ignore:output"));
    }
}
