use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::page_range::PageSet;
use crate::pdf::page_labels::PageLabel;
use crate::pdf::PdfDocument;

/// How book page numbers relate to physical pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingStrategy {
    /// Book page N is PDF page N.
    Identity,
    /// Book page 1 sits on the given 1-based PDF page.
    Offset { start_page: i64 },
    /// Reserved for hand-entered mappings; behaves as `Identity`.
    Manual,
    /// Follow the document's own `/PageLabels` numbering.
    Labels,
}

/// Why a requested strategy could not be honoured. The mapping falls back to
/// identity in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    InvalidChoice,
    InvalidInput,
    InvalidOffset,
    ManualUnsupported,
    NoNumericLabels,
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Fallback::InvalidChoice => "Invalid choice.",
            Fallback::InvalidInput => "Invalid input.",
            Fallback::InvalidOffset => "Invalid offset.",
            Fallback::ManualUnsupported => "Manual mapping not implemented in this version.",
            Fallback::NoNumericLabels => "No numeric page labels found.",
        };
        write!(f, "{} Using 1:1 mapping.", reason)
    }
}

/// Book page number to zero-based physical index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMapping {
    entries: BTreeMap<u32, u32>,
    total_pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MappedPage {
    pub book_page: u32,
    /// Zero-based
    pub pdf_index: u32,
}

/// A page request checked against a mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// In requested (ascending book page) order
    pub valid: Vec<MappedPage>,
    pub invalid: Vec<u32>,
}

impl Resolution {
    /// Valid pages sorted by where they sit in the PDF.
    pub fn in_physical_order(&self) -> Vec<MappedPage> {
        let mut pages = self.valid.clone();
        pages.sort_by_key(|p| p.pdf_index);
        pages
    }

    pub fn valid_book_pages(&self) -> Vec<u32> {
        self.valid.iter().map(|p| p.book_page).collect()
    }
}

impl PageMapping {
    pub fn identity(total_pages: u32) -> Self {
        PageMapping {
            entries: (0..total_pages).map(|i| (i + 1, i)).collect(),
            total_pages,
        }
    }

    /// Book page 1 lands on `start_page` (1-based); later book pages follow
    /// until the PDF runs out. Rejects start pages outside the document.
    pub fn with_offset(start_page: i64, total_pages: u32) -> Result<Self, Fallback> {
        if start_page < 1 || start_page > i64::from(total_pages) {
            return Err(Fallback::InvalidOffset);
        }
        let offset = (start_page - 1) as u32;

        Ok(PageMapping {
            entries: (0..total_pages - offset).map(|i| (i + 1, i + offset)).collect(),
            total_pages,
        })
    }

    /// Map each decimal page label to its page. When a label repeats, the
    /// first page carrying it wins. `None` if no page has a decimal label.
    pub fn from_labels(labels: &[PageLabel]) -> Option<Self> {
        let mut entries = BTreeMap::new();
        for label in labels {
            if let Some(number) = label.number {
                entries.entry(number).or_insert(label.index);
            }
        }

        if entries.is_empty() {
            return None;
        }
        Some(PageMapping {
            entries,
            total_pages: labels.len() as u32,
        })
    }

    /// Build the mapping for a strategy, falling back to identity when the
    /// strategy doesn't fit the document.
    pub fn build(strategy: MappingStrategy, doc: &PdfDocument) -> (Self, Option<Fallback>) {
        let total_pages = doc.page_count();
        let built = match strategy {
            MappingStrategy::Identity => Ok(Self::identity(total_pages)),
            MappingStrategy::Offset { start_page } => Self::with_offset(start_page, total_pages),
            MappingStrategy::Manual => Err(Fallback::ManualUnsupported),
            MappingStrategy::Labels => {
                Self::from_labels(&doc.page_labels()).ok_or(Fallback::NoNumericLabels)
            }
        };

        match built {
            Ok(mapping) => {
                log::debug!(
                    "{:?} mapping covers {} of {} pages",
                    strategy,
                    mapping.len(),
                    mapping.total_pages()
                );
                (mapping, None)
            }
            Err(fallback) => {
                log::warn!("{:?}: {}", strategy, fallback);
                (Self::identity(total_pages), Some(fallback))
            }
        }
    }

    pub fn get(&self, book_page: u32) -> Option<u32> {
        self.entries.get(&book_page).copied()
    }

    /// All mapped book pages, ascending.
    pub fn book_pages(&self) -> PageSet {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Split a request into pages the mapping knows and pages it doesn't.
    pub fn resolve(&self, requested: &PageSet) -> Resolution {
        let mut resolution = Resolution::default();
        for book_page in requested.iter() {
            match self.get(book_page) {
                Some(pdf_index) => resolution.valid.push(MappedPage {
                    book_page,
                    pdf_index,
                }),
                None => resolution.invalid.push(book_page),
            }
        }
        resolution
    }
}
