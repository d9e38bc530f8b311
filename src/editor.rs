// src/editor.rs

use log::{
    info,
    warn
};
use std::{
    io::{
        self,
        Write
    },
    path::Path,
    process::Command
};

/// Tried in order after any preferred editor.
pub const FALLBACK_EDITORS: &[&str] = &["kate", "vim"];

/// Open `path` in the first editor that can be launched: `preferred` (may carry
/// arguments, e.g. `"code -w"`), then [`FALLBACK_EDITORS`]. Returns the command
/// that ran, or `None` if nothing could be started. The operator is told which
/// editor is opening the file once it has started.
pub fn open_in_editor<W: Write>(path: &Path, preferred: Option<&str>, out: &mut W) -> io::Result<Option<String>> {
    let candidates: Vec<String> = preferred
        .into_iter()
        .map(str::to_string)
        .chain(FALLBACK_EDITORS.iter().map(|s| (*s).to_string()))
        .collect();
    open_with(&candidates, path, out)
}

fn open_with<W: Write>(candidates: &[String], path: &Path, out: &mut W) -> io::Result<Option<String>> {
    for cmdline in candidates {
        let mut parts = cmdline.split_whitespace();
        let Some(program) = parts.next() else { continue };
        match Command::new(program).args(parts).arg(path).spawn() {
            Ok(mut child) => {
                writeln!(out, "Opening {} in {program}", path.display())?;
                out.flush()?;
                // The editor's own exit code is not our concern.
                match child.wait() {
                    Ok(status) => info!("{program} exited with {status}"),
                    Err(e) => warn!("waiting for {program}: {e}"),
                }
                return Ok(Some(cmdline.clone()));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("editor {program} not found");
            }
            Err(e) => {
                warn!("failed to launch {program}: {e}");
            }
        }
    }
    Ok(None)
}
