//! The prompt-driven front end: ask for a file, an operation, pages and an
//! output location, run it, and go round again until the user quits.
//!
//! Reads answers from any `BufRead` and writes the transcript to any `Write`,
//! so the whole conversation can be scripted.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::commands::{
    default_output_dir, default_output_file, extract::extract_to_single, split::split_to_files,
    NoValidPages,
};
use crate::mapping::{Fallback, MappingStrategy, PageMapping};
use crate::page_range::{parse_page_numbers, PageSet};
use crate::pdf::{InputNotFound, PdfDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Split,
    Concatenate,
}

enum Flow {
    Continue,
    Quit,
}

pub struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Session { input, output }
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "=== PDF Page Extractor ===")?;
        writeln!(
            self.output,
            "This program extracts specific book pages from a PDF file."
        )?;

        loop {
            match self.round() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return Ok(()),
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    writeln!(self.output, "Exiting program.")?;
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn round(&mut self) -> io::Result<Flow> {
        let path = match self.prompt("\nEnter the path to the PDF file (or 'q' to quit): ")? {
            Some(answer) if !answer.eq_ignore_ascii_case("q") => PathBuf::from(answer),
            _ => {
                writeln!(self.output, "Exiting program.")?;
                return Ok(Flow::Quit);
            }
        };

        if !path.is_file() {
            writeln!(self.output, "Error: File does not exist. Please try again.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output, "\nOperation options:")?;
        writeln!(self.output, "1. Extract pages to individual PDF files")?;
        writeln!(self.output, "2. Extract pages to a single concatenated PDF")?;
        let operation = match self.ask("Choose an option (1 or 2): ")?.as_str() {
            "1" => Operation::Split,
            "2" => Operation::Concatenate,
            _ => {
                writeln!(self.output, "Invalid option. Please try again.")?;
                return Ok(Flow::Continue);
            }
        };

        let book_pages = match self.select_pages()? {
            Ok(selection) => selection,
            Err(flow) => return Ok(flow),
        };

        match operation {
            Operation::Split => {
                let default = default_output_dir(&path);
                let output_dir = self.ask_path("Enter output directory", default)?;
                let result = self.split(&path, book_pages.as_ref(), &output_dir);
                self.finish(result)?;
            }
            Operation::Concatenate => {
                let default = default_output_file(&path);
                let output = self.ask_path("Enter output file path", default)?;
                let Some(book_pages) = book_pages else {
                    writeln!(
                        self.output,
                        "Cannot concatenate all pages without specifying which pages to extract."
                    )?;
                    return Ok(Flow::Continue);
                };
                let result = self.concatenate(&path, &book_pages, &output);
                self.finish(result)?;
            }
        }

        Ok(Flow::Continue)
    }

    /// `Ok(None)` means every page; `Err` carries how the round should end.
    fn select_pages(&mut self) -> io::Result<Result<Option<PageSet>, Flow>> {
        writeln!(self.output, "\nPage selection:")?;
        writeln!(self.output, "1. Extract all pages")?;
        writeln!(self.output, "2. Extract specific book pages")?;
        if self.ask("Choose an option (1 or 2): ")? != "2" {
            return Ok(Ok(None));
        }

        let answer = self.ask("Enter book page numbers (e.g., 1,3,5 or 1-3,5): ")?;
        let parsed = parse_page_numbers(&answer);
        for warning in &parsed.warnings {
            writeln!(self.output, "Warning: {}", warning)?;
        }
        if parsed.pages.is_empty() {
            writeln!(self.output, "No valid pages specified. Please try again.")?;
            return Ok(Err(Flow::Continue));
        }

        writeln!(self.output, "Selected book pages: {}", parsed.pages)?;
        Ok(Ok(Some(parsed.pages)))
    }

    fn split(
        &mut self,
        path: &Path,
        book_pages: Option<&PageSet>,
        output_dir: &Path,
    ) -> Result<()> {
        let doc = PdfDocument::open(path)?;
        let mapping = self.choose_mapping(&doc)?;
        match split_to_files(&doc, &mapping, book_pages, output_dir, &mut self.output) {
            // the invalid pages were already listed
            Err(err) if err.is::<NoValidPages>() => Ok(()),
            other => other.map(|_| ()),
        }
    }

    fn concatenate(&mut self, path: &Path, book_pages: &PageSet, output: &Path) -> Result<()> {
        let doc = PdfDocument::open(path)?;
        let mapping = self.choose_mapping(&doc)?;
        extract_to_single(&doc, &mapping, book_pages, output, &mut self.output)?;
        Ok(())
    }

    fn choose_mapping(&mut self, doc: &PdfDocument) -> io::Result<PageMapping> {
        writeln!(self.output, "Total PDF pages: {}", doc.page_count())?;
        writeln!(self.output, "\nPage mapping options:")?;
        writeln!(self.output, "1. Book pages start from page 1 (1:1 mapping)")?;
        writeln!(
            self.output,
            "2. Custom offset (e.g., book page 1 starts at PDF page 5)"
        )?;
        writeln!(self.output, "3. Manual mapping for complex books")?;
        writeln!(self.output, "4. Use the PDF's own page labels")?;

        let strategy = match self.ask("Choose mapping option (1, 2, 3, or 4): ")?.as_str() {
            "1" => Ok(MappingStrategy::Identity),
            "2" => self
                .ask("Enter PDF page number where book page 1 starts: ")?
                .parse()
                .map(|start_page| MappingStrategy::Offset { start_page })
                .map_err(|_| Fallback::InvalidInput),
            "3" => Ok(MappingStrategy::Manual),
            "4" => Ok(MappingStrategy::Labels),
            _ => Err(Fallback::InvalidChoice),
        };

        let (mapping, fallback) = match strategy {
            Ok(strategy) => PageMapping::build(strategy, doc),
            Err(fallback) => (PageMapping::identity(doc.page_count()), Some(fallback)),
        };
        if let Some(fallback) = fallback {
            writeln!(self.output, "{}", fallback)?;
        }

        Ok(mapping)
    }

    fn finish(&mut self, result: Result<()>) -> io::Result<()> {
        let Err(err) = result else {
            return Ok(());
        };
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::UnexpectedEof {
                return Err(input_closed());
            }
        }
        log::debug!("operation failed: {:#}", err);

        if let Some(not_found) = err.downcast_ref::<InputNotFound>() {
            writeln!(self.output, "Error: {}", not_found)
        } else if let Some(no_pages) = err.downcast_ref::<NoValidPages>() {
            writeln!(self.output, "{}", no_pages)
        } else {
            writeln!(self.output, "An error occurred: {:#}", err)
        }
    }

    fn ask_path(&mut self, question: &str, default: PathBuf) -> io::Result<PathBuf> {
        let answer = self.ask(&format!("{} (default: {}): ", question, default.display()))?;
        Ok(if answer.is_empty() {
            default
        } else {
            PathBuf::from(answer)
        })
    }

    /// Like `prompt`, but end of input is an `UnexpectedEof` error that
    /// ends the session.
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.prompt(question)?.ok_or_else(input_closed)
    }

    /// Trimmed answer, or `None` once input is exhausted.
    fn prompt(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn input_closed() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "input closed")
}
