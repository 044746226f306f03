// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::process::Stdio;

use tokio::{io::AsyncWriteExt,
            process::Command,
            sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel}};

use crate::{READ_BUFFER_SIZE, RemoteShellEvent, RemoteShellSession, RemoteShellTransport,
            process_runner::{read_chunk, spawn_error}, spawn_service_stream};

pub const SSH_PROGRAM: &str = "ssh";
pub const SSHPASS_PROGRAM: &str = "sshpass";

/// [`RemoteShellTransport`] backed by the `ssh` program, with a remote tty forced
/// (`-tt`) since local stdin is a pipe. A password is handed over through `sshpass -e`
/// so it never shows up in the process list.
#[derive(Debug, Default, Clone, Copy)]
pub struct SshCli;

fn ssh_command(host: &str, user: &str, password: Option<&str>) -> (Command, &'static str) {
    let destination = format!("{user}@{host}");
    let ssh_args = ["-tt", "-o", "StrictHostKeyChecking=accept-new"];
    match password {
        Some(password) => {
            let mut command = Command::new(SSHPASS_PROGRAM);
            command
                .arg("-e")
                .arg(SSH_PROGRAM)
                .args(ssh_args)
                .arg(destination)
                .env("SSHPASS", password);
            (command, SSHPASS_PROGRAM)
        }
        None => {
            let mut command = Command::new(SSH_PROGRAM);
            command
                .args(ssh_args)
                .args(["-o", "BatchMode=yes"])
                .arg(destination);
            (command, SSH_PROGRAM)
        }
    }
}

impl RemoteShellTransport for SshCli {
    fn connect(&self, host: &str, user: &str, password: Option<&str>) -> RemoteShellSession {
        let (command, program) = ssh_command(host, user, password);
        let (input_sender, input_receiver) = unbounded_channel();
        let events = spawn_service_stream(move |sender| {
            run_ssh(command, program, input_receiver, sender)
        });
        RemoteShellSession::new(events, input_sender)
    }
}

async fn run_ssh(
    mut command: Command,
    program: &'static str,
    mut input: UnboundedReceiver<Vec<u8>>,
    sender: UnboundedSender<RemoteShellEvent>,
) {
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match command.spawn() {
        Ok(it) => it,
        Err(error) => {
            sender
                .send(RemoteShellEvent::Error(spawn_error(program, &error).to_string()))
                .ok();
            sender.send(RemoteShellEvent::Close).ok();
            return;
        }
    };

    let mut stdin = child.stdin.take();
    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();
    let mut stdout_buf = [0_u8; READ_BUFFER_SIZE];
    let mut stderr_buf = [0_u8; READ_BUFFER_SIZE];
    let mut last_stderr = Vec::new();

    while stdout.is_some() || stderr.is_some() {
        tokio::select! {
            // This branch is cancel safe because `recv` is cancel safe.
            maybe_bytes = input.recv(), if stdin.is_some() => {
                match (maybe_bytes, stdin.as_mut()) {
                    (Some(bytes), Some(writer)) => {
                        if writer.write_all(&bytes).await.is_err() {
                            stdin = None;
                        } else {
                            writer.flush().await.ok();
                        }
                    }
                    // The session closed its input side.
                    _ => stdin = None,
                }
            }

            // This branch is cancel safe because `read` is cancel safe.
            maybe_len = read_chunk(&mut stdout, &mut stdout_buf), if stdout.is_some() => {
                match maybe_len {
                    Some(len) => {
                        sender.send(RemoteShellEvent::Data(stdout_buf[..len].to_vec())).ok();
                    }
                    None => stdout = None,
                }
            }

            // This branch is cancel safe because `read` is cancel safe.
            maybe_len = read_chunk(&mut stderr, &mut stderr_buf), if stderr.is_some() => {
                match maybe_len {
                    Some(len) => {
                        last_stderr = stderr_buf[..len].to_vec();
                        sender.send(RemoteShellEvent::Data(last_stderr.clone())).ok();
                    }
                    None => stderr = None,
                }
            }
        }
    }

    let status = child.wait().await;
    // % is Display, ? is Debug.
    tracing::debug!(message = "remote shell exited", ?status);
    if !status.is_ok_and(|it| it.success()) {
        let text = String::from_utf8_lossy(&last_stderr);
        let message = text.trim();
        if !message.is_empty() {
            sender.send(RemoteShellEvent::Error(message.to_string())).ok();
        }
    }
    sender.send(RemoteShellEvent::Close).ok();
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn args_of(command: &Command) -> Vec<String> {
        command
            .as_std()
            .get_args()
            .map(|it| it.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_ssh_command_without_password() {
        let (command, program) = ssh_command("example.com", "ada", None);
        assert_eq!(program, SSH_PROGRAM);
        assert_eq!(
            args_of(&command),
            vec![
                "-tt",
                "-o",
                "StrictHostKeyChecking=accept-new",
                "-o",
                "BatchMode=yes",
                "ada@example.com"
            ]
        );
    }

    #[test]
    fn test_ssh_command_with_password_uses_env() {
        let (command, program) = ssh_command("example.com", "ada", Some("hunter2"));
        assert_eq!(program, SSHPASS_PROGRAM);
        assert!(!args_of(&command).iter().any(|it| it.contains("hunter2")));
        assert_eq!(args_of(&command)[..2], ["-e".to_string(), "ssh".to_string()]);
    }
}
