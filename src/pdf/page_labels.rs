use lopdf::{Dictionary, Document, Object};
use serde::Serialize;

/// Display label of one physical page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLabel {
    /// Zero-based physical page index
    pub index: u32,
    pub label: String,
    /// Set when the label is a bare decimal number, i.e. a usable book page
    pub number: Option<u32>,
}

#[derive(Debug, Clone)]
struct LabelRange {
    first_index: u32,
    style: LabelStyle,
    prefix: String,
    first_value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelStyle {
    Decimal,
    LowerRoman,
    UpperRoman,
    LowerAlpha,
    UpperAlpha,
    /// Prefix only
    Bare,
}

impl LabelRange {
    fn default_numbering() -> Self {
        LabelRange {
            first_index: 0,
            style: LabelStyle::Decimal,
            prefix: String::new(),
            first_value: 1,
        }
    }

    fn label_for(&self, index: u32) -> PageLabel {
        // u64 so a start value near u32::MAX can't overflow
        let value = u64::from(self.first_value) + u64::from(index - self.first_index);
        let numeral = match self.style {
            LabelStyle::Decimal => value.to_string(),
            LabelStyle::LowerRoman => to_roman(value).to_lowercase(),
            LabelStyle::UpperRoman => to_roman(value),
            LabelStyle::LowerAlpha => to_alpha(value).to_lowercase(),
            LabelStyle::UpperAlpha => to_alpha(value),
            LabelStyle::Bare => String::new(),
        };
        let number = if self.style == LabelStyle::Decimal && self.prefix.is_empty() {
            u32::try_from(value).ok()
        } else {
            None
        };

        PageLabel {
            index,
            label: format!("{}{}", self.prefix, numeral),
            number,
        }
    }
}

/// Compute the label of every page in the document.
///
/// Documents without a `/PageLabels` tree get plain 1-based decimal labels,
/// which is how viewers number them too.
pub fn page_labels(doc: &Document) -> Vec<PageLabel> {
    let total_pages = doc.get_pages().len() as u32;

    let mut ranges = label_tree(doc)
        .map(|tree| collect_ranges(doc, tree))
        .unwrap_or_default();
    ranges.retain(|r| r.first_index < total_pages);
    ranges.sort_by_key(|r| r.first_index);
    log::debug!("found {} page label range(s)", ranges.len());

    let fallback = LabelRange::default_numbering();
    (0..total_pages)
        .map(|index| {
            ranges
                .iter()
                .rev()
                .find(|r| r.first_index <= index)
                .unwrap_or(&fallback)
                .label_for(index)
        })
        .collect()
}

/// True if the document declares its own page numbering.
pub fn has_page_labels(doc: &Document) -> bool {
    label_tree(doc).is_some()
}

fn label_tree(doc: &Document) -> Option<&Dictionary> {
    let catalog = doc.catalog().ok()?;
    match catalog.get(b"PageLabels").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Walk a number tree node: `/Nums` on leaves, `/Kids` on intermediate nodes.
fn collect_ranges(doc: &Document, node: &Dictionary) -> Vec<LabelRange> {
    let mut ranges = Vec::new();

    if let Ok(Object::Array(nums)) = node.get(b"Nums") {
        ranges.extend(
            nums.chunks_exact(2)
                .filter_map(|pair| parse_range(doc, &pair[0], &pair[1])),
        );
    }

    if let Ok(Object::Array(kids)) = node.get(b"Kids") {
        for kid in kids {
            if let Ok(kid) = resolve_dictionary(doc, kid) {
                ranges.extend(collect_ranges(doc, kid));
            }
        }
    }

    ranges
}

fn parse_range(doc: &Document, key: &Object, value: &Object) -> Option<LabelRange> {
    let first_index = match key {
        Object::Integer(n) => u32::try_from(*n).ok()?,
        _ => return None,
    };
    let dict = resolve_dictionary(doc, value).ok()?;

    let style = match dict.get(b"S") {
        Ok(Object::Name(name)) => match name.as_slice() {
            b"D" => LabelStyle::Decimal,
            b"r" => LabelStyle::LowerRoman,
            b"R" => LabelStyle::UpperRoman,
            b"a" => LabelStyle::LowerAlpha,
            b"A" => LabelStyle::UpperAlpha,
            _ => LabelStyle::Decimal,
        },
        _ => LabelStyle::Bare,
    };

    let prefix = match dict.get(b"P") {
        Ok(Object::String(bytes, _)) => decode_text_string(bytes),
        _ => String::new(),
    };

    // A start value that doesn't fit drops the whole range
    let first_value = match dict.get(b"St") {
        Ok(Object::Integer(n)) => u32::try_from(*n).ok().filter(|&v| v >= 1)?,
        _ => 1,
    };

    Some(LabelRange {
        first_index,
        style,
        prefix,
        first_value,
    })
}

fn resolve_dictionary<'a>(doc: &'a Document, obj: &'a Object) -> lopdf::Result<&'a Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_dictionary(*id),
        other => other.as_dict(),
    }
}

/// Past this, roman and alpha numerals get absurdly long; such pages are
/// labelled in decimal instead.
const MAX_LETTER_VALUE: u64 = 3999;

fn to_roman(mut n: u64) -> String {
    const NUMERALS: [(u64, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    if n > MAX_LETTER_VALUE {
        return n.to_string();
    }
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// A..Z, then AA..ZZ, AAA.. (letters repeat rather than carry)
fn to_alpha(n: u64) -> String {
    if n == 0 {
        return String::new();
    }
    if n > MAX_LETTER_VALUE {
        return n.to_string();
    }
    let letter = (b'A' + ((n - 1) % 26) as u8) as char;
    std::iter::repeat(letter)
        .take(((n - 1) / 26 + 1) as usize)
        .collect()
}

fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}
