use anyhow::{Context, Result};
use lopdf::{Document, Object};
use std::fmt;
use std::path::{Path, PathBuf};

use super::page_labels::{page_labels, PageLabel};

/// The input path does not name an existing file.
#[derive(Debug)]
pub struct InputNotFound(pub PathBuf);

impl fmt::Display for InputNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Input file '{}' not found.", self.0.display())
    }
}

impl std::error::Error for InputNotFound {}

/// Read-only view of a loaded source PDF.
pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(InputNotFound(path.to_path_buf()).into());
        }

        let doc = Document::load(path)
            .with_context(|| format!("Failed to open PDF: {}", path.display()))?;
        let opened = PdfDocument {
            doc,
            path: path.to_path_buf(),
        };
        log::info!(
            "opened {} ({} pages)",
            path.display(),
            opened.page_count()
        );
        Ok(opened)
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    pub fn page_labels(&self) -> Vec<PageLabel> {
        page_labels(&self.doc)
    }

    /// Build a new document holding only the pages at the given zero-based
    /// indices. Pages keep their original relative order; duplicates collapse.
    pub fn extract_indices(&self, indices: &[u32]) -> Result<Document> {
        let total = self.page_count();

        if indices.is_empty() {
            anyhow::bail!("No pages specified");
        }
        if let Some(&bad) = indices.iter().find(|&&i| i >= total) {
            anyhow::bail!("PDF page {} is out of range (1-{})", bad + 1, total);
        }

        // lopdf numbers pages from 1
        let to_delete: Vec<u32> = (1..=total)
            .filter(|num| !indices.contains(&(num - 1)))
            .collect();

        let mut new_doc = self.doc.clone();
        if !to_delete.is_empty() {
            new_doc.delete_pages(&to_delete);
            // labels were assigned by position in the source
            drop_page_labels(&mut new_doc);
            let pruned = new_doc.prune_objects();
            log::debug!(
                "dropped {} page(s) and {} orphaned object(s)",
                to_delete.len(),
                pruned.len()
            );
        }

        Ok(new_doc)
    }

    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        let path = path.as_ref();
        doc.save(path)
            .with_context(|| format!("Failed to save PDF: {}", path.display()))?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}

fn drop_page_labels(doc: &mut Document) {
    let Ok(root) = doc.trailer.get(b"Root").and_then(Object::as_reference) else {
        return;
    };
    if let Ok(catalog) = doc.get_dictionary_mut(root) {
        catalog.remove(b"PageLabels");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::page_labels::has_page_labels;
    use crate::pdf::testing::{page_texts, sample_pdf, with_page_labels, write_sample_pdf};
    use lopdf::dictionary;
    use tempfile::tempdir;

    fn in_memory(pages: u32) -> PdfDocument {
        PdfDocument {
            doc: sample_pdf(pages),
            path: PathBuf::from("memory.pdf"),
        }
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let err = PdfDocument::open(dir.path().join("nope.pdf"))
            .err()
            .unwrap();
        assert!(err.downcast_ref::<InputNotFound>().is_some());
        assert!(err.to_string().contains("nope.pdf' not found."));
    }

    #[test]
    fn test_open_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("junk.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = PdfDocument::open(&path).err().unwrap();
        assert!(err.downcast_ref::<InputNotFound>().is_none());
        assert!(err.to_string().starts_with("Failed to open PDF"));
    }

    #[test]
    fn test_open_counts_pages() {
        let dir = tempdir().unwrap();
        let path = write_sample_pdf(dir.path(), "four.pdf", 4);
        let doc = PdfDocument::open(&path).unwrap();
        assert_eq!(doc.page_count(), 4);
        assert_eq!(doc.path, path);
    }

    #[test]
    fn test_extract_keeps_physical_order() {
        let doc = in_memory(5);
        let extracted = doc.extract_indices(&[4, 0, 2]).unwrap();
        assert_eq!(extracted.get_pages().len(), 3);
        assert_eq!(page_texts(&extracted), vec!["Page 1", "Page 3", "Page 5"]);
    }

    #[test]
    fn test_extract_all_pages() {
        let doc = in_memory(2);
        let extracted = doc.extract_indices(&[0, 1]).unwrap();
        assert_eq!(page_texts(&extracted), vec!["Page 1", "Page 2"]);
    }

    #[test]
    fn test_extract_drops_source_page_labels() {
        let mut source = sample_pdf(4);
        with_page_labels(
            &mut source,
            vec![
                (0, dictionary! { "S" => "r" }),
                (2, dictionary! { "S" => "D" }),
            ],
        );
        let doc = PdfDocument {
            doc: source,
            path: PathBuf::from("memory.pdf"),
        };

        let single = doc.extract_indices(&[3]).unwrap();
        assert!(!has_page_labels(&single));
        assert_eq!(page_texts(&single), vec!["Page 4"]);

        let whole = doc.extract_indices(&[0, 1, 2, 3]).unwrap();
        assert!(has_page_labels(&whole));
    }

    #[test]
    fn test_extract_out_of_range() {
        let doc = in_memory(3);
        let err = doc.extract_indices(&[3]).unwrap_err();
        assert_eq!(err.to_string(), "PDF page 4 is out of range (1-3)");
        assert!(doc.extract_indices(&[]).is_err());
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempdir().unwrap();
        let doc = in_memory(3);
        let mut single = doc.extract_indices(&[1]).unwrap();
        let out = dir.path().join("single.pdf");
        PdfDocument::save(&mut single, &out).unwrap();

        let reloaded = PdfDocument::open(&out).unwrap();
        assert_eq!(reloaded.page_count(), 1);
        assert_eq!(page_texts(&reloaded.doc), vec!["Page 2"]);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let mut single = in_memory(1).extract_indices(&[0]).unwrap();
        let err = PdfDocument::save(&mut single, dir.path().join("no/such/dir/out.pdf"))
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to save PDF"));
    }
}
