use std::io::Write;
use std::process::{Command, Stdio};

/// Platform clipboard helpers, tried in order until one succeeds.
#[cfg(target_os = "macos")]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[("pbcopy", &[])];
#[cfg(target_os = "windows")]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[("cmd", &["/C", "clip"])];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Copy `text` verbatim to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), String> {
    copy_with(CLIPBOARD_COMMANDS, text)
}

fn copy_with(commands: &[(&str, &[&str])], text: &str) -> Result<(), String> {
    let mut last_error = None;
    for (cmd, args) in commands {
        match run_with_stdin(cmd, args, text) {
            Ok(()) => return Ok(()),
            Err(err) => last_error = Some(err),
        }
    }
    Err(last_error.unwrap_or_else(|| "No clipboard command configured".to_string()))
}

fn run_with_stdin(cmd: &str, args: &[&str], input: &str) -> Result<(), String> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|_| format!("clipboard command `{cmd}` not available"))?;

    // stdin is dropped at the end of the block so the child sees EOF.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin
            .write_all(input.as_bytes())
            .map_err(|err| format!("could not write to `{cmd}`: {err}")),
        None => Ok(()),
    };

    let status = child.wait();
    written?;
    match status {
        Ok(status) if status.success() => Ok(()),
        _ => Err(format!("clipboard command `{cmd}` failed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_commands_report_the_last_failure() {
        let err = copy_with(
            &[
                ("parley-no-such-clipboard-a", &[]),
                ("parley-no-such-clipboard-b", &[]),
            ],
            "text",
        )
        .expect_err("no command exists");
        assert!(err.contains("parley-no-such-clipboard-b"));
    }

    #[test]
    fn empty_command_list_is_an_error() {
        assert!(copy_with(&[], "text").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn child_that_closes_stdin_early_is_reaped_and_reported() {
        let payload = "x".repeat(1 << 20);
        let err = run_with_stdin("sh", &["-c", "exec 0<&-; exit 3"], &payload)
            .expect_err("the command exits non-zero or rejects the write");
        assert!(err.contains("`sh`"), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn first_working_command_wins() {
        assert!(copy_with(&[("parley-no-such-clipboard", &[]), ("cat", &[])], "text").is_ok());
    }
}
