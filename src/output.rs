// src/output.rs

use anyhow::{
    Context,
    Result
};
use log::info;
use std::{
    fs,
    path::{
        Path,
        PathBuf
    }
};
use crate::util;

/// `parent1-parent2-...-basename_<stamp>.md`, built from the last
/// `num_parents` parent names of `root` plus its own name.
pub fn output_file_name(root: &Path, num_parents: usize, stamp: &str) -> String {
    let canon = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let parts = util::normal_components(&canon);
    let stem = match parts.split_last() {
        Some((base, parents)) => {
            let start = parents.len().saturating_sub(num_parents);
            let mut picked: Vec<&str> = parents[start..].iter().map(String::as_str).collect();
            picked.push(base);
            picked.join("-")
        }
        None => "root".to_string(),
    };
    format!("{}_{stamp}.md", util::sanitize_file_stem(&stem))
}

/// Write `content` to `dir/name` and return the absolute path of the result.
pub fn write_output(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {} bytes to {}", content.len(), path.display());
    Ok(path.canonicalize().unwrap_or(path))
}
