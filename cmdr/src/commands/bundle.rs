// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use fsh_tui::{CancelRegistrar, CommandHandler, EXIT_CODE_CANCELED, ExitCode, ShellContext,
              ShellError, exit_code_from, ok};
use futures_util::{FutureExt, future::BoxFuture};

use crate::{BuildService, format_build_message};

/// `bundle [entry...]` builds the given entry points (default: the working directory)
/// and prints the bundler's diagnostics.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub build: Arc<dyn BuildService>,
}

impl CommandHandler for Bundle {
    fn name(&self) -> &str { "bundle" }

    fn description(&self) -> &'static str { "Bundle a project or entry files" }

    fn execute(
        &self,
        args: Vec<String>,
        ctx: ShellContext,
        cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let result = self.run_bundle(&ctx, args, cancel).await;
            exit_code_from(&ctx, self.name(), result)
        }
        .boxed()
    }
}

impl Bundle {
    async fn run_bundle(
        &self,
        ctx: &ShellContext,
        args: Vec<String>,
        cancel: CancelRegistrar,
    ) -> Result<ExitCode, ShellError> {
        let entries = if args.is_empty() {
            vec![ctx.cwd()]
        } else {
            args.iter().map(|it| ctx.resolve(it)).collect()
        };

        let mut canceled = cancel.register_oneshot()?;

        let output = tokio::select! {
            // This branch is cancel safe because a oneshot receiver can be polled again.
            _ = &mut canceled => return ok!(Some(EXIT_CODE_CANCELED)),
            // The bundle future is dropped when canceled, which kills the bundler.
            result = self.build.bundle(entries) => result?,
        };

        for message in output.warnings.iter().chain(&output.errors) {
            ctx.sink.writeln(format_build_message(message));
        }
        if !output.errors.is_empty() {
            return ok!(Some(1));
        }

        for artifact in &output.artifacts {
            ctx.sink.writeln(format!("  {}", artifact.display()));
        }
        ok!(Some(0))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use fsh_tui::MemoryFileSystem;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{BuildMessage, BuildOutput, SourceLocation,
                test_fixtures::{FakeBuild, run_builtin}};

    #[tokio::test]
    async fn test_success_lists_artifacts() {
        let build = FakeBuild::default();
        build.set_output(Ok(BuildOutput {
            artifacts: vec![PathBuf::from("/dist/index.js")],
            warnings: vec![],
            errors: vec![],
        }));
        let bundle = Bundle {
            build: Arc::new(build.clone()),
        };

        let (exit_code, output) = run_builtin(bundle, MemoryFileSystem::new(), "bundle").await;
        assert_eq!(exit_code, Some(0));
        assert_eq!(output, "  /dist/index.js\r\n");
        assert_eq!(build.entries(), vec![PathBuf::from("/")]);
    }

    #[tokio::test]
    async fn test_errors_fail_the_build() {
        let build = FakeBuild::default();
        build.set_output(Ok(BuildOutput {
            artifacts: vec![],
            warnings: vec![BuildMessage::new("unused import")],
            errors: vec![BuildMessage {
                text: "Unexpected end of file".into(),
                location: Some(SourceLocation {
                    file: "src/a.ts".into(),
                    line: 4,
                    column: 0,
                    line_text: None,
                }),
            }],
        }));
        let bundle = Bundle {
            build: Arc::new(build.clone()),
        };

        let (exit_code, output) =
            run_builtin(bundle, MemoryFileSystem::new(), "bundle src/a.ts").await;
        assert_eq!(exit_code, Some(1));
        assert_eq!(
            output,
            "unused import\r\nUnexpected end of file\r\n    at src/a.ts:4:0\r\n"
        );
        assert_eq!(build.entries(), vec![PathBuf::from("/src/a.ts")]);
    }

    #[tokio::test]
    async fn test_bundler_failure_is_reported() {
        let build = FakeBuild::default();
        build.set_output(Err(ShellError::external("esbuild not found")));
        let bundle = Bundle {
            build: Arc::new(build),
        };

        let (exit_code, output) = run_builtin(bundle, MemoryFileSystem::new(), "bundle").await;
        assert_eq!(exit_code, Some(1));
        assert_eq!(output, "bundle: esbuild not found\r\n");
    }
}
