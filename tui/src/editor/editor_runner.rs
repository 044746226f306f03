// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::Write;

use crossterm::{cursor::Show,
                queue,
                terminal::{EnterAlternateScreen, LeaveAlternateScreen}};

use crate::{BoundFile, EditorAction, ModalEditor, OutputSink, ShellContext, ShellError,
            decode, ok};

/// Run the modal editor on `file_arg` (resolved against the working directory) until
/// it quits. The editor owns the capture slot for its whole lifetime and draws on the
/// alternate screen, restoring the normal screen on the way out.
///
/// # Errors
///
/// Returns [`ShellError::CaptureBusy`] if another program owns the input, or the error
/// from reading an existing file that can't be opened. A file that does not exist yet
/// is not an error.
pub async fn run_modal_editor(ctx: &ShellContext, file_arg: Option<&str>) -> Result<(), ShellError> {
    let (capture_handle, mut input) = ctx.capture.acquire("vi")?;

    let mut editor = match file_arg {
        Some(file_arg) => {
            let path = ctx.resolve(file_arg);
            let content = match ctx.fs.read_to_string(path.clone()).await {
                Ok(it) => Some(it),
                Err(error) if error.is_not_found() => None,
                Err(error) => return Err(error.into()),
            };
            let file = BoundFile {
                display_name: file_arg.to_string(),
                path,
            };
            ModalEditor::open(file, content.as_deref(), ctx.terminal_size.get())
        }
        None => ModalEditor::new(ctx.terminal_size.get()),
    };

    // % is Display, ? is Debug.
    tracing::debug!(message = "editor start", file = ?editor.file);
    let mut sink = ctx.sink.clone();
    queue!(sink, EnterAlternateScreen)?;
    paint(&editor, &sink)?;

    while let Some(raw) = input.recv().await {
        let size = ctx.terminal_size.get();
        if size != editor.size {
            editor.set_size(size);
        }

        let action = match editor.handle_input(&decode(&raw)) {
            EditorAction::Write {
                path,
                contents,
                quit_after,
            } => {
                tracing::debug!(message = "editor write", path = %path.display(), quit_after);
                let result = ctx
                    .fs
                    .write(path, contents)
                    .await
                    .map_err(|error| error.to_string());
                editor.on_write_complete(result, quit_after)
            }
            other => other,
        };

        if action == EditorAction::Quit {
            break;
        }
        paint(&editor, &sink)?;
    }

    queue!(sink, LeaveAlternateScreen, Show)?;
    sink.flush()?;
    capture_handle.release();
    tracing::debug!(message = "editor stop");
    ok!()
}

/// Render a full frame off screen and write it to the sink in one go.
fn paint(editor: &ModalEditor, sink: &OutputSink) -> std::io::Result<()> {
    let mut frame = Vec::new();
    editor.render(&mut frame)?;
    let mut sink = sink.clone();
    sink.write_all(&frame)?;
    sink.flush()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{AliasTable, CommandRegistry, CommandRouter, MemoryFileSystem, raw_keystrokes,
                test_fixtures::new_test_context_with_fs};

    async fn wait_until_captured(ctx: &ShellContext) {
        while !ctx.capture.is_captured() {
            tokio::task::yield_now().await;
        }
    }

    fn router() -> Arc<CommandRouter> {
        Arc::new(CommandRouter::new(CommandRegistry::new(), AliasTable::new()))
    }

    #[tokio::test]
    async fn test_edit_new_file_and_write_quit() {
        let fs = MemoryFileSystem::new().with_dir("/home");
        let (ctx, stdout_mock) = new_test_context_with_fs(router(), fs.clone());
        ctx.set_cwd("/home");

        let task_ctx = ctx.clone();
        let task = tokio::spawn(async move { run_modal_editor(&task_ctx, Some("notes.txt")).await });
        wait_until_captured(&ctx).await;
        for raw in raw_keystrokes("ihi\x1b:wq\n") {
            ctx.capture.try_forward(raw).unwrap();
        }
        task.await.unwrap().unwrap();

        assert_eq!(fs.file_contents("/home/notes.txt"), Some("hi".into()));
        assert!(!ctx.capture.is_captured());
        let output = stdout_mock.get_copy_of_buffer_as_string();
        assert!(output.starts_with("\x1b[?1049h"));
        assert!(output.contains("New File  notes.txt  1,1"));
        assert!(output.ends_with("\x1b[?1049l\x1b[?25h"));
    }

    #[tokio::test]
    async fn test_closed_input_ends_editor() {
        let fs = MemoryFileSystem::new().with_file("/a.txt", "x");
        let (ctx, _stdout_mock) = new_test_context_with_fs(router(), fs.clone());

        let task_ctx = ctx.clone();
        let task = tokio::spawn(async move { run_modal_editor(&task_ctx, Some("a.txt")).await });
        wait_until_captured(&ctx).await;
        ctx.capture.try_forward("x".into()).unwrap();
        ctx.capture.close();
        task.await.unwrap().unwrap();

        // Nothing was written.
        assert_eq!(fs.file_contents("/a.txt"), Some("x".into()));
    }

    #[tokio::test]
    async fn test_busy_capture_is_an_error() {
        let (ctx, _stdout_mock) = new_test_context_with_fs(router(), MemoryFileSystem::new());
        let _held = ctx.capture.acquire("ssh").unwrap();

        let result = run_modal_editor(&ctx, None).await;

        assert!(matches!(result, Err(ShellError::CaptureBusy { owner }) if owner == "ssh"));
    }
}
