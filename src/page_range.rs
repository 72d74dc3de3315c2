use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Sorted, duplicate-free set of 1-based page numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageSet(BTreeSet<u32>);

impl PageSet {
    pub fn insert(&mut self, page: u32) -> bool {
        self.0.insert(page)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u32> for PageSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        PageSet(iter.into_iter().collect())
    }
}

impl Extend<u32> for PageSet {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

/// Renders as `[1, 3, 5]`, the form used in console messages.
impl fmt::Display for PageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_page_list(f, self.iter())
    }
}

pub(crate) fn write_page_list(
    f: &mut impl fmt::Write,
    pages: impl IntoIterator<Item = u32>,
) -> fmt::Result {
    f.write_char('[')?;
    for (i, page) in pages.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", page)?;
    }
    f.write_char(']')
}

/// Format any page list the same way `PageSet` displays.
pub fn format_pages(pages: &[u32]) -> String {
    let mut out = String::new();
    let _ = write_page_list(&mut out, pages.iter().copied());
    out
}

/// Widest range a single token may span. No real document comes close, and
/// anything wider is almost certainly a typo.
pub const MAX_RANGE_PAGES: u32 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenWarning {
    InvalidNumber(String),
    InvalidRangeFormat(String),
    ReversedRange(String),
    RangeTooWide(String),
}

impl fmt::Display for TokenWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenWarning::InvalidNumber(t) => write!(f, "Invalid page number: {}", t),
            TokenWarning::InvalidRangeFormat(t) => write!(f, "Invalid page range format: {}", t),
            TokenWarning::ReversedRange(t) => write!(f, "Invalid range {} (start > end)", t),
            TokenWarning::RangeTooWide(t) => write!(
                f,
                "Invalid range {} (spans more than {} pages)",
                t, MAX_RANGE_PAGES
            ),
        }
    }
}

/// Outcome of a best-effort parse: whatever was understood, plus what wasn't.
#[derive(Debug, Clone, Default)]
pub struct ParsedPages {
    pub pages: PageSet,
    pub warnings: Vec<TokenWarning>,
}

/// Parse a comma-separated list like "1,3,5-7" into a page set.
///
/// Bad tokens are skipped and recorded as warnings; they never fail the
/// whole parse. Ranges are inclusive and must be ascending.
pub fn parse_page_numbers(input: &str) -> ParsedPages {
    let mut parsed = ParsedPages::default();

    for part in input.split(',') {
        let part = part.trim();
        if let Some((start, end)) = part.split_once('-') {
            match (parse_number(start), parse_number(end)) {
                (Some(start), Some(end)) if start > end => parsed
                    .warnings
                    .push(TokenWarning::ReversedRange(part.to_string())),
                (Some(start), Some(end)) if end - start >= MAX_RANGE_PAGES => parsed
                    .warnings
                    .push(TokenWarning::RangeTooWide(part.to_string())),
                (Some(start), Some(end)) => parsed.pages.extend(start..=end),
                _ => parsed
                    .warnings
                    .push(TokenWarning::InvalidRangeFormat(part.to_string())),
            }
        } else {
            match parse_number(part) {
                Some(page) => {
                    parsed.pages.insert(page);
                }
                None => parsed
                    .warnings
                    .push(TokenWarning::InvalidNumber(part.to_string())),
            }
        }
    }

    for warning in &parsed.warnings {
        log::warn!("{}", warning);
    }
    log::debug!("parsed {:?} into {}", input, parsed.pages);

    parsed
}

fn parse_number(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
