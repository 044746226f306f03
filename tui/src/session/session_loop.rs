// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::VecDeque, io};

use futures_util::{StreamExt, future::BoxFuture};

use crate::{CRLF, Completion, EXIT_CODE_SUCCESS, History, InputEvent, LineEditor,
            LineEditorEvent, PinnedInputStream, RawInput, ShellConfig, ShellContext,
            complete, decode, ok, print_in_columns};

/// One interactive shell session.
///
/// The loop owns the [`LineEditor`] and at most one running chain. Input is consumed in
/// arrival order by exactly one of:
/// 1. the capture owner, when a handler holds the capture slot;
/// 2. the line editor, when no chain is running.
///
/// While a chain runs without capturing, keystrokes wait in a type-ahead queue and are
/// replayed once the chain settles. Ctrl-C is the exception: it goes to the running
/// handler's cancel callback right away, and without a callback it aborts the line and
/// drops the type-ahead.
pub struct Session {
    ctx: ShellContext,
    line_editor: LineEditor,
    prompt_suffix: String,
    type_ahead: VecDeque<RawInput>,
    running: Option<BoxFuture<'static, i32>>,
    last_exit_code: i32,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("line_editor", &self.line_editor)
            .field("type_ahead", &self.type_ahead)
            .field("running", &self.running.is_some())
            .field("last_exit_code", &self.last_exit_code)
            .finish_non_exhaustive()
    }
}

/// Resolves with the chain's exit code, or never if nothing is running.
async fn poll_running(running: &mut Option<BoxFuture<'static, i32>>) -> i32 {
    match running {
        Some(chain) => chain.await,
        None => std::future::pending().await,
    }
}

impl Session {
    #[must_use]
    pub fn new(ctx: ShellContext, config: &ShellConfig) -> Self {
        let mut it = Self {
            ctx,
            line_editor: LineEditor::new("", History::new(config.history_size)),
            prompt_suffix: config.prompt_suffix.clone(),
            type_ahead: VecDeque::new(),
            running: None,
            last_exit_code: EXIT_CODE_SUCCESS,
        };
        it.update_prompt();
        it
    }

    #[must_use]
    pub fn line_editor(&self) -> &LineEditor { &self.line_editor }

    /// Run until `input` ends and everything typed before that has been handled.
    /// Returns the exit code of the last chain.
    pub async fn run(mut self, mut input: PinnedInputStream<RawInput>) -> i32 {
        let mut input_done = false;
        self.render_prompt();

        loop {
            while self.running.is_none()
                && let Some(raw) = self.type_ahead.pop_front()
            {
                self.consume_input(raw).await;
            }

            if input_done && self.running.is_none() && self.type_ahead.is_empty() {
                break;
            }

            tokio::select! {
                biased;

                // Poll the running chain first, so a handler that acquires the capture
                // slot does so before any more input is routed.
                exit_code = poll_running(&mut self.running), if self.running.is_some() => {
                    self.running = None;
                    self.on_chain_complete(exit_code);
                }

                // Hand queued input to the capture owner one unit at a time, giving
                // the owner a chance to run (and maybe release) in between.
                () = std::future::ready(()), if self.has_input_for_capture() => {
                    if let Some(raw) = self.type_ahead.pop_front()
                        && let Err(raw) = self.ctx.capture.try_forward(raw)
                    {
                        self.type_ahead.push_front(raw);
                    }
                }

                // This branch is cancel safe because the stream holds no partial item.
                maybe_raw = input.next(), if !input_done => {
                    match maybe_raw {
                        Some(raw) => self.on_input(raw),
                        None => {
                            tracing::debug!(message = "end of input");
                            input_done = true;
                            self.ctx.capture.close_input();
                        }
                    }
                }

                else => break,
            }
        }

        self.last_exit_code
    }

    fn has_input_for_capture(&self) -> bool {
        self.running.is_some() && self.ctx.capture.is_captured() && !self.type_ahead.is_empty()
    }

    fn on_input(&mut self, raw: RawInput) {
        let interrupts_chain = self.running.is_some()
            && !self.ctx.capture.is_captured()
            && decode(&raw) == InputEvent::CtrlC;
        if interrupts_chain {
            self.interrupt_running_chain();
        } else {
            self.type_ahead.push_back(raw);
        }
    }

    fn interrupt_running_chain(&mut self) {
        if self.ctx.cancel.cancel() {
            tracing::debug!(message = "running chain canceled");
            return;
        }
        tracing::debug!(message = "no cancel callback, aborting line", dropped = self.type_ahead.len());
        self.type_ahead.clear();
        self.line_editor.line.take();
        self.line_editor.history.reset_index();
        self.ctx.sink.write_str(&format!("^C{CRLF}"));
    }

    /// Route one input unit to the capture owner, or else to the line editor.
    async fn consume_input(&mut self, raw: RawInput) {
        let Err(raw) = self.ctx.capture.try_forward(raw) else {
            return;
        };
        let mut term = self.ctx.sink.clone();
        let result = match self.line_editor.apply_event_and_render(&decode(&raw), &mut term) {
            Ok(Some(LineEditorEvent::Submitted(line))) => {
                self.submit(line);
                ok!()
            }
            Ok(Some(LineEditorEvent::AutocompleteRequested)) => self.autocomplete().await,
            Ok(Some(LineEditorEvent::Interrupted) | None) => ok!(),
            Err(error) => Err(error),
        };
        if let Err(error) = result {
            tracing::warn!(message = "line editor render failed", ?error);
        }
    }

    fn submit(&mut self, line: String) {
        if line.trim().is_empty() {
            self.render_prompt();
            return;
        }
        // % is Display, ? is Debug.
        tracing::debug!(message = "submit", %line);
        self.running = Some(self.ctx.execute_line(line));
    }

    fn on_chain_complete(&mut self, exit_code: i32) {
        tracing::debug!(message = "chain complete", exit_code);
        self.last_exit_code = exit_code;
        self.update_prompt();
        self.render_prompt();
    }

    async fn autocomplete(&mut self) -> io::Result<()> {
        let command_names = self.ctx.router().registry().names();
        let completion = complete(
            self.line_editor.line.as_str(),
            &command_names,
            self.ctx.fs.as_ref(),
            &self.ctx.cwd(),
        )
        .await;
        tracing::debug!(message = "autocomplete", ?completion);

        let mut term = self.ctx.sink.clone();
        match completion {
            Completion::Append(text) => self.line_editor.append_completion(&text, &mut term),
            Completion::List(items) => {
                let columns = print_in_columns(&items, self.ctx.terminal_size.get().cols);
                self.ctx.sink.write_str(&format!("{CRLF}{columns}"));
                self.line_editor.render_prompt(&mut term, true)
            }
            Completion::NoMatch => ok!(),
        }
    }

    fn update_prompt(&mut self) {
        self.line_editor.prompt = format!("{} {} ", self.ctx.cwd().display(), self.prompt_suffix);
    }

    fn render_prompt(&mut self) {
        let mut term = self.ctx.sink.clone();
        let at_line_start = self.ctx.sink.is_at_line_start();
        if let Err(error) = self.line_editor.render_prompt(&mut term, at_line_start) {
            tracing::warn!(message = "prompt render failed", ?error);
        }
    }
}
