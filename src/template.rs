// src/template.rs
//! Markdown prompt templates.
//!
//! A template is any `*.md` file directly inside the template directory. The
//! generated content replaces a `[{{ }}]` placeholder (whitespace and newlines
//! inside the braces are allowed).

use log::debug;
use regex::{
    NoExpand,
    Regex
};
use std::{
    io::{
        self,
        BufRead,
        Write
    },
    path::{
        Path,
        PathBuf
    },
    sync::LazyLock
};
use walkdir::WalkDir;
use crate::session::prompt_line;

pub const DEFAULT_TEMPLATE_DIR: &str = "promts";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\{\{\s*\}\}\]").expect("placeholder pattern is valid")
});

/// `*.md` files directly under `dir`, sorted by name. A missing directory
/// simply has no templates.
pub fn discover_templates(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                debug!("skipping template entry: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && name.ends_with(".md")
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// List the templates and let the operator pick one by number.
/// Enter, end of input, or an invalid answer mean "no template".
pub fn choose_template<R: BufRead, W: Write>(
    templates: &[PathBuf],
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<PathBuf>> {
    if templates.is_empty() {
        return Ok(None);
    }

    let rule = "=".repeat(50);
    writeln!(out, "\n{rule}\nAVAILABLE MARKDOWN TEMPLATES:\n{rule}")?;
    for (i, t) in templates.iter().enumerate() {
        let name = t.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        writeln!(out, "{:3}. {name}", i + 1)?;
    }
    writeln!(out, "\nEnter a template number to use it,")?;
    writeln!(out, "or press Enter to save without a template")?;

    let Some(choice) = prompt_line(input, out, "Your choice: ")? else {
        return Ok(None);
    };
    if choice.is_empty() {
        return Ok(None);
    }
    match choice.parse::<usize>() {
        Ok(n) if (1..=templates.len()).contains(&n) => Ok(Some(templates[n - 1].clone())),
        Ok(_) => {
            writeln!(out, "Error: number {choice} is outside 1-{}", templates.len())?;
            Ok(None)
        }
        Err(_) => {
            writeln!(out, "Error: '{choice}' is not a number")?;
            Ok(None)
        }
    }
}

/// Substitute `content` into every placeholder of `template`.
/// Returns `None` when the template has no placeholder.
pub fn apply_template(template: &str, content: &str) -> Option<String> {
    if !PLACEHOLDER.is_match(template) {
        return None;
    }
    let replacement = format!("[{{{{\n{content}\n}}}}]");
    Some(PLACEHOLDER.replace_all(template, NoExpand(&replacement)).into_owned())
}
