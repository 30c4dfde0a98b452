//! Document container access and WordprocessingML run extraction.

mod container;
mod docx_rsid;

pub use container::{DocxContainer, extract_part, extract_part_from_bytes};
pub use docx_rsid::{ParsedDocument, parse_document, parse_text_runs};
