pub mod extract;
pub mod labels;
pub mod split;

use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::mapping::{MappedPage, PageMapping, Resolution};
use crate::page_range::PageSet;

/// Summary of one extract or split run.
#[derive(Debug, Serialize)]
pub struct Report {
    pub input: PathBuf,
    pub outputs: Vec<PathBuf>,
    pub pages: Vec<MappedPage>,
    pub invalid_pages: Vec<u32>,
}

/// None of the requested pages exist under the chosen mapping.
#[derive(Debug)]
pub struct NoValidPages;

impl fmt::Display for NoValidPages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("No valid pages to extract.")
    }
}

impl std::error::Error for NoValidPages {}

/// `<input dir>/extracted_pages`
pub fn default_output_dir(input: &Path) -> PathBuf {
    input_dir(input).join("extracted_pages")
}

/// `<input dir>/<stem>_extracted.pdf`
pub fn default_output_file(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    input_dir(input).join(format!("{}_extracted.pdf", stem))
}

fn input_dir(input: &Path) -> &Path {
    input.parent().unwrap_or_else(|| Path::new(""))
}

/// Resolve a request and tell the user about pages the mapping lacks.
/// `label` prefixes the message ("Warning" or "Error").
fn resolve_reporting(
    mapping: &PageMapping,
    requested: &PageSet,
    label: &str,
    out: &mut dyn Write,
) -> anyhow::Result<Resolution> {
    let resolution = mapping.resolve(requested);

    if !resolution.invalid.is_empty() {
        let invalid: PageSet = resolution.invalid.iter().copied().collect();
        log::warn!("book pages not in mapping: {}", invalid);
        writeln!(out, "{}: Invalid book pages: {}", label, invalid)?;
    }
    if resolution.valid.is_empty() {
        return Err(NoValidPages.into());
    }

    Ok(resolution)
}
