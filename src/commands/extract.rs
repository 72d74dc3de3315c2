use anyhow::Result;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{default_output_file, resolve_reporting, Report};
use crate::cli::MappingArgs;
use crate::mapping::PageMapping;
use crate::page_range::{format_pages, parse_page_numbers, PageSet};
use crate::pdf::PdfDocument;

/// Write the requested book pages into one PDF, in the order they appear in
/// the source regardless of the order they were asked for.
pub fn extract_to_single(
    doc: &PdfDocument,
    mapping: &PageMapping,
    book_pages: &PageSet,
    output: &Path,
    out: &mut dyn Write,
) -> Result<Report> {
    let resolution = resolve_reporting(mapping, book_pages, "Warning", out)?;

    writeln!(
        out,
        "\nExtracting book pages: {}",
        format_pages(&resolution.valid_book_pages())
    )?;

    let ordered = resolution.in_physical_order();
    let indices: Vec<u32> = ordered.iter().map(|p| p.pdf_index).collect();
    let mut new_doc = doc.extract_indices(&indices)?;

    for page in &ordered {
        log::debug!("book page {} -> pdf index {}", page.book_page, page.pdf_index);
        writeln!(
            out,
            "Added book page {} (PDF page {})",
            page.book_page,
            page.pdf_index + 1
        )?;
    }

    PdfDocument::save(&mut new_doc, output)?;
    writeln!(out, "\nSuccessfully created: {}", output.display())?;

    Ok(Report {
        input: doc.path.clone(),
        outputs: vec![output.to_path_buf()],
        pages: ordered,
        invalid_pages: resolution.invalid,
    })
}

pub fn run<P: AsRef<Path>>(
    input: P,
    pages: &str,
    output: Option<PathBuf>,
    mapping_args: &MappingArgs,
    json: bool,
) -> Result<()> {
    let input = input.as_ref();
    let mut stdout = io::stdout();
    let mut sink = io::sink();
    let out: &mut dyn Write = if json { &mut sink } else { &mut stdout };

    let parsed = parse_page_numbers(pages);
    for warning in &parsed.warnings {
        writeln!(out, "Warning: {}", warning)?;
    }
    if parsed.pages.is_empty() {
        anyhow::bail!("No valid pages specified");
    }

    let doc = PdfDocument::open(input)?;
    let (mapping, fallback) = PageMapping::build(mapping_args.strategy(), &doc);
    if let Some(fallback) = fallback {
        writeln!(out, "{}", fallback)?;
    }

    let output = output.unwrap_or_else(|| default_output_file(input));
    let report = extract_to_single(&doc, &mapping, &parsed.pages, &output, out)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
