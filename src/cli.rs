// src/cli.rs

use anyhow::{
    Context,
    Result
};
use clap::Parser;
use log::info;
use std::{
    collections::BTreeSet,
    fs,
    io::{
        self,
        BufRead,
        Write
    },
    path::{
        Path,
        PathBuf
    }
};
use crate::{
    editor,
    error::BuildError,
    markdown,
    output,
    scan,
    session,
    template,
    util
};

#[derive(Parser, Debug)]
#[command(name = "srcpick")]
#[command(version, about = "Pick text files from a directory tree and bundle them into one markdown file", long_about = None)]
pub struct Args {
    /// Directory to scan
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// How many parent directory names to put in the output file name
    #[arg(value_name = "NUM_PARENTS", default_value_t = 1)]
    pub num_parents: usize,

    /// Directory holding markdown templates
    #[arg(long, value_name = "DIR", default_value = template::DEFAULT_TEMPLATE_DIR)]
    pub templates: PathBuf,

    /// Directory the markdown file is written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Editor tried before kate and vim
    #[arg(long, value_name = "CMD", env = "SRCPICK_EDITOR")]
    pub editor: Option<String>,

    /// Don't open the result in an editor
    #[arg(long)]
    pub no_open: bool,

    /// Extension pre-selected at the top level (repeatable, replaces the defaults; "" = no extension)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,
}

impl Args {
    /// Allow-list used for the initial selection.
    pub fn default_extensions(&self) -> BTreeSet<String> {
        if self.extensions.is_empty() {
            scan::default_extensions()
        } else {
            self.extensions.iter().map(|e| util::normalize_extension(e)).collect()
        }
    }
}

/// Entry point used by `main`: real stdin/stdout plus a Ctrl-C handler.
pub fn run(args: Args) -> Result<()> {
    ctrlc::set_handler(|| {
        // stdout may be held by the blocked prompt; stderr is never locked by us.
        eprintln!("\n\nInterrupted by user.");
        std::process::exit(130);
    })
    .context("installing Ctrl-C handler")?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    run_with(&args, &mut input, &mut out).map(|_| ())
}

/// The whole pipeline against arbitrary input/output. Returns the written
/// file, or `None` when the run ended early (no text files, nothing selected).
pub fn run_with<R: BufRead, W: Write>(args: &Args, input: &mut R, out: &mut W) -> Result<Option<PathBuf>> {
    let mut tree = match scan::build_tree(&args.directory, &args.default_extensions()) {
        Ok(t) => t,
        Err(BuildError::NoTextFiles(_)) => {
            writeln!(out, "The given directory contains no text files.")?;
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let selected = session::run_session(&mut tree, input, out)
        .context("interactive selection")?;

    writeln!(out, "\nStep 2: Collecting selected files...")?;
    if selected.is_empty() {
        writeln!(out, "No files selected. Exiting.")?;
        return Ok(None);
    }
    writeln!(out, "Files selected for processing: {}", selected.len())?;

    write_bundle(args, &selected, input, out).map(Some)
}

fn write_bundle<R: BufRead, W: Write>(
    args: &Args,
    files: &[PathBuf],
    input: &mut R,
    out: &mut W,
) -> Result<PathBuf> {
    writeln!(out, "\nStep 3: Generating content from the selected files...")?;
    let assembled = markdown::assemble(files);
    for p in &assembled.included {
        writeln!(out, "Processed: {}", p.display())?;
    }
    for (p, reason) in &assembled.skipped {
        writeln!(out, "Skipped: {} ({reason})", p.display())?;
    }

    writeln!(out, "\nStep 4: Checking available templates...")?;
    let templates = template::discover_templates(&args.templates);
    let mut template_used = None;
    let content = if templates.is_empty() {
        writeln!(
            out,
            "Template directory '{}' not found or contains no .md templates",
            args.templates.display()
        )?;
        assembled.content
    } else {
        match template::choose_template(&templates, input, out).context("choosing a template")? {
            Some(path) => {
                let text = apply_template_file(&path, &assembled.content, out)?;
                template_used = path.file_name().map(|n| n.to_string_lossy().into_owned());
                text
            }
            None => assembled.content,
        }
    };

    let name = output::output_file_name(&args.directory, args.num_parents, &util::now_ts_compact());
    let written = output::write_output(&args.output_dir, &name, &content)?;

    let rule = "=".repeat(60);
    writeln!(out, "\n{rule}\nSAVE RESULT:\n{rule}")?;
    writeln!(out, "File: {}", written.display())?;
    writeln!(out, "Files selected: {}", files.len())?;
    writeln!(
        out,
        "Files included: {} ({} skipped)",
        assembled.included.len(),
        assembled.skipped.len()
    )?;
    match &template_used {
        Some(t) => writeln!(out, "Template used: {t}")?,
        None => writeln!(out, "Template used: none (saved directly)")?,
    }
    writeln!(out, "{rule}")?;

    if args.no_open {
        info!("not opening an editor (--no-open)");
    } else {
        out.flush()?;
        match editor::open_in_editor(&written, args.editor.as_deref(), out)? {
            Some(cmd) => info!("opened {} with {cmd}", written.display()),
            None => {
                writeln!(out, "No editor could be launched (tried: {}).", tried_editors(args))?;
                writeln!(out, "File saved at: {}", written.display())?;
            }
        }
    }

    Ok(written)
}

/// Read a template and fill it. A template without a placeholder is used
/// verbatim; an unreadable one falls back to the raw content.
fn apply_template_file<W: Write>(path: &Path, content: &str, out: &mut W) -> Result<String> {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            log::warn!("reading template {}: {e}", path.display());
            writeln!(out, "Error reading template {}: {e}", path.display())?;
            return Ok(content.to_string());
        }
    };
    match template::apply_template(&text, content) {
        Some(filled) => {
            writeln!(out, "Template '{name}' applied")?;
            Ok(filled)
        }
        None => {
            writeln!(out, "Warning: template '{name}' has no [{{{{ }}}}] placeholder")?;
            writeln!(out, "The template content is used as is")?;
            Ok(text)
        }
    }
}

fn tried_editors(args: &Args) -> String {
    args.editor
        .iter()
        .map(String::as_str)
        .chain(editor::FALLBACK_EDITORS.iter().copied())
        .collect::<Vec<_>>()
        .join(", ")
}
