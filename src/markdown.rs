// src/markdown.rs
//! Turns the selected files into one markdown document: a `# path` heading
//! followed by a fenced block per file.

use log::warn;
use std::{
    fs,
    io,
    path::{
        Path,
        PathBuf
    }
};

/// Result of assembling the selection.
#[derive(Debug, Default)]
pub struct Assembled {
    pub content: String,
    pub included: Vec<PathBuf>,
    /// Files that could not be read, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Fence info string for a file.
pub fn fence_lang(path: &Path) -> &'static str {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    if name.eq_ignore_ascii_case("CMakeLists.txt") {
        return "cmake";
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "cpp" | "cxx" | "c++" | "cc" | "mm" | "hpp" => "cpp",
        "c" | "h" | "hh" => "c",
        "qml" => "js",
        "diff" => "diff",
        "md" => "markdown",
        "py" => "python",
        "sh" => "bash",
        "yml" | "yaml" => "yaml",
        "json" => "json",
        "xml" => "xml",
        "ini" | "cfg" => "ini",
        "toml" => "toml",
        "sql" => "sql",
        "cmake" => "cmake",
        _ => "text",
    }
}

/// Read every file in order and lay them out as fenced blocks.
/// Unreadable or non-UTF-8 files are skipped and reported in [`Assembled::skipped`].
pub fn assemble(files: &[PathBuf]) -> Assembled {
    let mut lines: Vec<String> = Vec::new();
    let mut out = Assembled::default();

    for path in files {
        let body = match fs::read_to_string(path) {
            Ok(b) => b,
            Err(e) => {
                let reason = if e.kind() == io::ErrorKind::InvalidData {
                    "encoding problems".to_string()
                } else {
                    e.to_string()
                };
                warn!("skipping {}: {reason}", path.display());
                out.skipped.push((path.clone(), reason));
                continue;
            }
        };

        lines.push(format!("# {}", path.display()));
        lines.push(format!("```{}", fence_lang(path)));
        let terminated = body.ends_with('\n');
        lines.push(body);
        if !terminated {
            lines.push(String::new());
        }
        lines.push("```".to_string());
        lines.push(String::new());
        out.included.push(path.clone());
    }

    out.content = lines.join("\n");
    out
}
