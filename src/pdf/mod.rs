pub mod document;
pub mod page_labels;

#[cfg(test)]
pub mod testing;

pub use document::{InputNotFound, PdfDocument};
