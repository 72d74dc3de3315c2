use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;

use crate::pdf::page_labels::has_page_labels;
use crate::pdf::PdfDocument;

/// One `physical: label` line per page.
pub fn print_labels(doc: &PdfDocument, out: &mut dyn Write) -> Result<()> {
    if !has_page_labels(&doc.doc) {
        writeln!(out, "No page labels defined; pages are numbered from 1.")?;
    }

    for label in doc.page_labels() {
        writeln!(out, "{}: {}", label.index + 1, label.label)?;
    }

    Ok(())
}

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let doc = PdfDocument::open(&path)?;
    print_labels(&doc, &mut io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::{sample_pdf, with_page_labels, write_sample_pdf};
    use lopdf::dictionary;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn listing(doc: &PdfDocument) -> String {
        let mut out: Vec<u8> = Vec::new();
        print_labels(doc, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_unlabelled_pdf() {
        let dir = tempdir().unwrap();
        let path = write_sample_pdf(dir.path(), "plain.pdf", 2);
        let doc = PdfDocument::open(&path).unwrap();

        assert_eq!(
            listing(&doc),
            "No page labels defined; pages are numbered from 1.\n1: 1\n2: 2\n"
        );
    }

    #[test]
    fn test_roman_then_decimal() {
        let mut doc = sample_pdf(4);
        with_page_labels(
            &mut doc,
            vec![
                (0, dictionary! { "S" => "r" }),
                (2, dictionary! { "S" => "D" }),
            ],
        );
        let doc = PdfDocument {
            doc,
            path: PathBuf::from("memory.pdf"),
        };

        assert_eq!(listing(&doc), "1: i\n2: ii\n3: 1\n4: 2\n");
    }

    #[test]
    fn test_run_missing_file() {
        let dir = tempdir().unwrap();
        let err = run(dir.path().join("gone.pdf")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
