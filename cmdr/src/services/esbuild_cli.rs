// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::{Path, PathBuf};

use fsh_tui::ShellError;
use futures_util::{FutureExt, future::BoxFuture};
use tokio::process::Command;

use crate::{BuildMessage, BuildOutput, BuildService, SourceLocation,
            process_runner::run_to_completion};

pub const ESBUILD_PROGRAM: &str = "esbuild";
pub const OUT_DIR_NAME: &str = "dist";
pub const INDEX_CANDIDATES: [&str; 4] = ["index.ts", "index.tsx", "index.js", "index.jsx"];

const ERROR_PREFIX: &str = "✘ [ERROR] ";
const WARNING_PREFIX: &str = "▲ [WARNING] ";

/// [`BuildService`] backed by the `esbuild` program. Output goes to `dist/` next to the
/// first entry (or inside it, for a project directory).
#[derive(Debug, Default, Clone, Copy)]
pub struct EsbuildCli;

/// Map a project directory to its index file. Files are returned as is.
async fn resolve_entry(entry: &Path) -> Result<(PathBuf, PathBuf), ShellError> {
    let metadata = tokio::fs::metadata(entry).await.map_err(|_| ShellError::NotFound {
        path: entry.display().to_string(),
    })?;
    if !metadata.is_dir() {
        let project_dir = entry.parent().unwrap_or(entry).to_path_buf();
        return Ok((entry.to_path_buf(), project_dir));
    }
    for candidate in INDEX_CANDIDATES {
        let file = entry.join(candidate);
        if tokio::fs::metadata(&file).await.is_ok_and(|it| it.is_file()) {
            return Ok((file, entry.to_path_buf()));
        }
    }
    Err(ShellError::external(format!(
        "no entry point found in {}",
        entry.display()
    )))
}

impl BuildService for EsbuildCli {
    fn bundle(&self, entries: Vec<PathBuf>) -> BoxFuture<'_, Result<BuildOutput, ShellError>> {
        async move {
            let mut files = vec![];
            let mut out_dir = None;
            for entry in &entries {
                let (file, project_dir) = resolve_entry(entry).await?;
                out_dir.get_or_insert_with(|| project_dir.join(OUT_DIR_NAME));
                files.push(file);
            }
            let Some(out_dir) = out_dir else {
                return Err(ShellError::usage("Usage: bundle <entry...>"));
            };

            let mut command = Command::new(ESBUILD_PROGRAM);
            command
                .args(&files)
                .arg("--bundle")
                .arg(format!("--outdir={}", out_dir.display()))
                .args(["--log-level=info", "--color=false"]);
            let output = run_to_completion(&mut command).await?;

            // % is Display, ? is Debug.
            tracing::debug!(message = "bundle finished", success = %output.success, ?files);

            let mut result = parse_esbuild_log(&output.stderr);
            result.artifacts = parse_artifacts(&output.stderr);
            if !output.success && result.errors.is_empty() {
                result
                    .errors
                    .push(BuildMessage::new(output.failure_message(ESBUILD_PROGRAM)));
            }
            Ok(result)
        }
        .boxed()
    }
}

fn flush(current: &mut Option<(bool, BuildMessage)>, acc: &mut BuildOutput) {
    match current.take() {
        Some((true, message)) => acc.errors.push(message),
        Some((false, message)) => acc.warnings.push(message),
        None => {}
    }
}

/// Parse esbuild's human readable log into warnings and errors. A message looks like:
///
/// ```text
/// ✘ [ERROR] Could not resolve "left-pad"
///
///     src/index.ts:1:16:
///       1 │ import pad from "left-pad";
///         ╵                 ~~~~~~~~~~
/// ```
#[must_use]
pub fn parse_esbuild_log(text: &str) -> BuildOutput {
    let mut acc = BuildOutput::default();
    let mut current: Option<(bool, BuildMessage)> = None;

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix(ERROR_PREFIX) {
            flush(&mut current, &mut acc);
            current = Some((true, BuildMessage::new(rest.trim())));
            continue;
        }
        if let Some(rest) = line.strip_prefix(WARNING_PREFIX) {
            flush(&mut current, &mut acc);
            current = Some((false, BuildMessage::new(rest.trim())));
            continue;
        }
        let Some((_, message)) = current.as_mut() else {
            continue;
        };
        if message.location.is_none() {
            if let Some(location) = parse_location_line(line) {
                message.location = Some(location);
            }
        } else if let Some(location) = message.location.as_mut()
            && location.line_text.is_none()
            && let Some((_, source)) = line.split_once(" │ ")
        {
            location.line_text = Some(source.to_string());
        }
    }
    flush(&mut current, &mut acc);

    acc
}

/// `    src/index.ts:1:16:` into a location.
fn parse_location_line(line: &str) -> Option<SourceLocation> {
    let trimmed = line.trim().strip_suffix(':')?;
    let mut parts = trimmed.rsplitn(3, ':');
    let column = parts.next()?.parse().ok()?;
    let line_number = parts.next()?.parse().ok()?;
    let file = parts.next().filter(|it| !it.is_empty())?;
    Some(SourceLocation {
        file: file.to_string(),
        line: line_number,
        column,
        line_text: None,
    })
}

/// Output files from esbuild's summary, eg: `  dist/index.js  1.2kb`.
#[must_use]
pub fn parse_artifacts(text: &str) -> Vec<PathBuf> {
    text.lines()
        .filter_map(|line| {
            let mut words = line.split_whitespace();
            let (path, size) = (words.next()?, words.next()?);
            let is_size = size.starts_with(|it: char| it.is_ascii_digit())
                && size.ends_with('b');
            (is_size && words.next().is_none()).then(|| PathBuf::from(path))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const LOG: &str = "▲ [WARNING] Duplicate key \"a\" in object literal [duplicate-object-key]

    src/data.ts:2:2:
      2 │   a: 2,
        ╵   ^

✘ [ERROR] Could not resolve \"left-pad\"

    src/index.ts:1:16:
      1 │ import pad from \"left-pad\";
        ╵                 ~~~~~~~~~~

  You can mark the path \"left-pad\" as external to exclude it from the bundle.

✘ [ERROR] Something without a location

1 error
";

    #[test]
    fn test_parse_esbuild_log() {
        let output = parse_esbuild_log(LOG);

        assert_eq!(output.warnings.len(), 1);
        assert_eq!(
            output.warnings[0].location,
            Some(SourceLocation {
                file: "src/data.ts".into(),
                line: 2,
                column: 2,
                line_text: Some("  a: 2,".into()),
            })
        );

        assert_eq!(output.errors.len(), 2);
        assert_eq!(output.errors[0].text, "Could not resolve \"left-pad\"");
        let location = output.errors[0].location.as_ref().unwrap();
        assert_eq!(location.file, "src/index.ts");
        assert_eq!(location.column, 16);
        assert_eq!(
            location.line_text.as_deref(),
            Some("import pad from \"left-pad\";")
        );
        assert_eq!(output.errors[1].location, None);
    }

    #[test]
    fn test_parse_artifacts() {
        let text = "\n  dist/index.js      1.2kb\n  dist/index.css  40b\n\n⚡ Done in 3ms\n";
        assert_eq!(
            parse_artifacts(text),
            vec![PathBuf::from("dist/index.js"), PathBuf::from("dist/index.css")]
        );
    }

    #[tokio::test]
    async fn test_resolve_entry_finds_index() {
        let temp_dir = fsh_tui::try_create_temp_dir().unwrap();
        let project = temp_dir.join("app");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::write(project.join("index.js"), "").unwrap();

        let (file, project_dir) = resolve_entry(&project).await.unwrap();
        assert_eq!(file, project.join("index.js"));
        assert_eq!(project_dir, project);

        let error = resolve_entry(&temp_dir.join("missing")).await.unwrap_err();
        assert!(matches!(error, ShellError::NotFound { .. }));
    }
}
