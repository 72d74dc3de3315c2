use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{default_output_dir, resolve_reporting, Report};
use crate::cli::MappingArgs;
use crate::mapping::PageMapping;
use crate::page_range::{parse_page_numbers, PageSet};
use crate::pdf::PdfDocument;

/// Write each requested book page (every mapped page when `book_pages` is
/// `None`) to `<output_dir>/book_page_<N>.pdf`.
pub fn split_to_files(
    doc: &PdfDocument,
    mapping: &PageMapping,
    book_pages: Option<&PageSet>,
    output_dir: &Path,
    out: &mut dyn Write,
) -> Result<Report> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let requested = match book_pages {
        Some(pages) => pages.clone(),
        None => mapping.book_pages(),
    };
    let resolution = resolve_reporting(mapping, &requested, "Error", out)?;

    let mut outputs = Vec::with_capacity(resolution.valid.len());
    for page in &resolution.valid {
        let output_path = output_dir.join(format!("book_page_{}.pdf", page.book_page));

        let mut new_doc = doc.extract_indices(&[page.pdf_index])?;
        PdfDocument::save(&mut new_doc, &output_path)?;

        writeln!(
            out,
            "Created: {} (book page {})",
            output_path.display(),
            page.book_page
        )?;
        outputs.push(output_path);
    }

    writeln!(out, "PDF splitting completed successfully!")?;

    Ok(Report {
        input: doc.path.clone(),
        outputs,
        pages: resolution.valid,
        invalid_pages: resolution.invalid,
    })
}

pub fn run<P: AsRef<Path>>(
    input: P,
    pages: Option<&str>,
    output_dir: Option<PathBuf>,
    mapping_args: &MappingArgs,
    json: bool,
) -> Result<()> {
    let input = input.as_ref();
    let mut stdout = io::stdout();
    let mut sink = io::sink();
    let out: &mut dyn Write = if json { &mut sink } else { &mut stdout };

    let selection = match pages {
        Some(pages) => {
            let parsed = parse_page_numbers(pages);
            for warning in &parsed.warnings {
                writeln!(out, "Warning: {}", warning)?;
            }
            if parsed.pages.is_empty() {
                anyhow::bail!("No valid pages specified");
            }
            Some(parsed.pages)
        }
        None => None,
    };

    let doc = PdfDocument::open(input)?;
    let (mapping, fallback) = PageMapping::build(mapping_args.strategy(), &doc);
    if let Some(fallback) = fallback {
        writeln!(out, "{}", fallback)?;
    }

    let output_dir = output_dir.unwrap_or_else(|| default_output_dir(input));
    let report = split_to_files(&doc, &mapping, selection.as_ref(), &output_dir, out)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
