//! Reading the source text, plus clean-up of text extracted from PDFs.

use crate::foundation::error::{StarcrossError, StarcrossResult};
use regex::Regex;
use std::io::Read as _;
use std::path::Path;
use std::sync::LazyLock;

const REMEDIATION: &str = "check that the text file exists and is readable UTF-8, or pipe the text on stdin with `--text -`";

static PAGE_NUMBER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*(\d+)\s*\n").expect("static regex"));
static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("static regex"));

/// Read the source text from `path`, or from stdin when `path` is `-`.
///
/// Any IO or UTF-8 failure is reported as [`StarcrossError::LoadFailed`]. A readable empty file
/// is a successful load of `""`.
#[tracing::instrument]
pub fn load_text(path: &Path) -> StarcrossResult<String> {
    let source_name = path.display().to_string();
    let bytes = if source_name == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| StarcrossError::load_failed(&source_name, format!("{e}; {REMEDIATION}")))?;
        buf
    } else {
        std::fs::read(path)
            .map_err(|e| StarcrossError::load_failed(&source_name, format!("{e}; {REMEDIATION}")))?
    };

    let text = String::from_utf8(bytes).map_err(|e| {
        StarcrossError::load_failed(&source_name, format!("not valid UTF-8 ({e}); {REMEDIATION}"))
    })?;
    tracing::debug!(bytes = text.len(), "loaded source text");
    Ok(text)
}

/// Clean text extracted from a paginated PDF.
///
/// Drops lines holding only a page number, collapses three or more consecutive newlines into a
/// blank line and trims surrounding whitespace.
pub fn clean_extracted_text(raw: &str) -> String {
    let without_pages = PAGE_NUMBER_LINE.replace_all(raw, "\n");
    let collapsed = EXCESS_NEWLINES.replace_all(&without_pages, "\n\n");
    collapsed.trim().to_owned()
}
