//! WordprocessingML run parser.
//!
//! Walks `word/document.xml` once and produces the ordered sequence of visible text runs,
//! each tagged with its effective revision save identifier:
//!
//! 1. `w:rsidR` on the run itself,
//! 2. otherwise `w:rsidR` on the enclosing paragraph,
//! 3. otherwise absent.
//!
//! Element and attribute names are resolved against the WordprocessingML namespace URI, so
//! documents that bind the namespace to a prefix other than `w` parse identically.
//!
//! Word writes textboxes and other drawing content twice, once under `mc:Choice` and once
//! under `mc:Fallback`. Everything beneath `mc:Fallback` is skipped so that text is counted
//! once.

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, QName, ResolveResult};

use crate::constants::{MARKUP_COMPATIBILITY_NS, WORDPROCESSINGML_NS};
use crate::error::{Result, RsidError};
use crate::types::TextRun;

const PARAGRAPH: &[u8] = b"p";
const RUN: &[u8] = b"r";
const TEXT: &[u8] = b"t";
const RSID_R: &[u8] = b"rsidR";
const FALLBACK: &[u8] = b"Fallback";

/// Output of a document parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub runs: Vec<TextRun>,
    /// `w:p` elements seen, including empty ones.
    pub paragraphs: usize,
    /// Runs dropped because their text was empty or whitespace-only.
    pub dropped_runs: usize,
}

enum Frame {
    Paragraph { rsid: Option<String> },
    Run { rsid: Option<String>, content: String },
    Text,
    /// `mc:Fallback` and everything below it.
    Ignored,
    Other,
}

#[derive(Default)]
struct RunCollector {
    stack: Vec<Frame>,
    /// Number of `Frame::Ignored` entries currently on the stack.
    ignored: usize,
    parsed: ParsedDocument,
}

impl RunCollector {
    /// Two-level lookup: the run's own tag, else the nearest enclosing paragraph's.
    fn paragraph_rsid(&self) -> Option<&str> {
        self.stack.iter().rev().find_map(|frame| match frame {
            Frame::Paragraph { rsid } => Some(rsid.as_deref()),
            _ => None,
        })?
    }

    fn open(
        &mut self,
        kind: ElementKind,
        start: &BytesStart<'_>,
        reader: &NsReader<&[u8]>,
    ) -> Result<()> {
        if self.ignored > 0 || kind == ElementKind::Fallback {
            self.ignored += 1;
            self.stack.push(Frame::Ignored);
            return Ok(());
        }
        let frame = match kind {
            ElementKind::Paragraph => {
                self.parsed.paragraphs += 1;
                Frame::Paragraph {
                    rsid: wml_attribute(reader, start, RSID_R)?,
                }
            }
            ElementKind::Run => Frame::Run {
                rsid: wml_attribute(reader, start, RSID_R)?,
                content: String::new(),
            },
            ElementKind::Text if matches!(self.stack.last(), Some(Frame::Run { .. })) => {
                Frame::Text
            }
            _ => Frame::Other,
        };
        self.stack.push(frame);
        Ok(())
    }

    /// Self-closing elements carry no text; only paragraphs are counted.
    fn empty(&mut self, kind: ElementKind) {
        if kind == ElementKind::Paragraph && self.ignored == 0 {
            self.parsed.paragraphs += 1;
        }
    }

    fn text(&mut self, text: &str) {
        let len = self.stack.len();
        if len < 2 || !matches!(self.stack[len - 1], Frame::Text) {
            return;
        }
        if let Frame::Run { content, .. } = &mut self.stack[len - 2] {
            content.push_str(text);
        }
    }

    fn close(&mut self) -> bool {
        let Some(frame) = self.stack.pop() else {
            return false;
        };
        if matches!(frame, Frame::Ignored) {
            self.ignored -= 1;
        } else if let Frame::Run { rsid, content } = frame {
            if content.trim().is_empty() {
                self.parsed.dropped_runs += 1;
            } else {
                let rsid = rsid.or_else(|| self.paragraph_rsid().map(str::to_string));
                let sequence_index = self.parsed.runs.len();
                self.parsed
                    .runs
                    .push(TextRun::new(content, rsid, sequence_index));
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Paragraph,
    Run,
    Text,
    Fallback,
    Foreign,
}

fn element_kind(reader: &NsReader<&[u8]>, start: &BytesStart<'_>) -> ElementKind {
    let (resolved, local) = reader.resolve_element(start.name());
    match resolved {
        ResolveResult::Bound(Namespace(ns)) if ns == WORDPROCESSINGML_NS => match local.as_ref() {
            PARAGRAPH => ElementKind::Paragraph,
            RUN => ElementKind::Run,
            TEXT => ElementKind::Text,
            _ => ElementKind::Foreign,
        },
        ResolveResult::Bound(Namespace(ns))
            if ns == MARKUP_COMPATIBILITY_NS && local.as_ref() == FALLBACK =>
        {
            ElementKind::Fallback
        }
        _ => ElementKind::Foreign,
    }
}

/// Value of a namespaced WordprocessingML attribute, matched by URI and exact local name.
fn wml_attribute(
    reader: &NsReader<&[u8]>,
    start: &BytesStart<'_>,
    local_name: &[u8],
) -> Result<Option<String>> {
    for attr in start.attributes() {
        let attr = attr.map_err(|err| malformed(reader, err))?;
        let (resolved, local) = reader.resolve_attribute(QName(attr.key.as_ref()));
        let in_wml =
            matches!(resolved, ResolveResult::Bound(Namespace(ns)) if ns == WORDPROCESSINGML_NS);
        if in_wml && local.as_ref() == local_name {
            let value = attr.unescape_value().map_err(|err| malformed(reader, err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn malformed(reader: &NsReader<&[u8]>, reason: impl std::fmt::Display) -> RsidError {
    RsidError::MalformedDocumentXml {
        position: reader.buffer_position() as u64,
        reason: reason.to_string().into(),
    }
}

/// Parse document XML into runs plus traversal counters.
///
/// Fails with [`RsidError::MalformedDocumentXml`] on any well-formedness problem; no
/// partial result is returned in that case.
pub fn parse_document(xml: &str) -> Result<ParsedDocument> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = NsReader::from_str(xml);
    let mut collector = RunCollector::default();
    let mut saw_root = false;

    loop {
        let event = reader.read_event().map_err(|err| malformed(&reader, err))?;
        match event {
            Event::Start(start) => {
                saw_root = true;
                let kind = element_kind(&reader, &start);
                collector.open(kind, &start, &reader)?;
            }
            Event::Empty(start) => {
                saw_root = true;
                let kind = element_kind(&reader, &start);
                collector.empty(kind);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|err| malformed(&reader, err))?;
                collector.text(&text);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                collector.text(&text);
            }
            Event::End(_) => {
                if !collector.close() {
                    return Err(malformed(&reader, "closing tag without matching open tag"));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(malformed(&reader, "document has no root element"));
    }
    if !collector.stack.is_empty() {
        return Err(malformed(
            &reader,
            format!("{} element(s) left unclosed at end of input", collector.stack.len()),
        ));
    }

    let parsed = collector.parsed;
    tracing::debug!(
        target = "rsid_lens::parse",
        paragraphs = parsed.paragraphs,
        runs = parsed.runs.len(),
        dropped = parsed.dropped_runs,
        "document parsed"
    );
    Ok(parsed)
}

/// Parse document XML into the ordered run sequence.
pub fn parse_text_runs(xml: &str) -> Result<Vec<TextRun>> {
    parse_document(xml).map(|parsed| parsed.runs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    fn doc(body: &str) -> String {
        format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{NS}"><w:body>{body}</w:body></w:document>"#)
    }

    #[test]
    fn run_level_rsid_wins_over_paragraph() {
        let xml = doc(r#"<w:p w:rsidR="00AA0001"><w:r w:rsidR="00BB0002"><w:t>Hello</w:t></w:r></w:p>"#);
        let runs = parse_text_runs(&xml).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].rsid.as_deref(), Some("00BB0002"));
    }

    #[test]
    fn run_inherits_paragraph_rsid_not_run_default() {
        let xml = doc(
            r#"<w:p w:rsidR="00AA0001" w:rsidRDefault="00CC0003"><w:r><w:t>Hello</w:t></w:r></w:p>
               <w:p w:rsidRDefault="00AA0004"><w:r><w:t>World</w:t></w:r></w:p>"#,
        );
        let runs = parse_text_runs(&xml).unwrap();
        assert_eq!(runs[0].rsid.as_deref(), Some("00AA0001"));
        assert_eq!(runs[1].rsid, None);
    }

    #[test]
    fn run_without_any_rsid_is_absent() {
        let xml = doc(r#"<w:p><w:r><w:t>loose text</w:t></w:r></w:p>"#);
        let runs = parse_text_runs(&xml).unwrap();
        assert_eq!(runs[0].rsid, None);
    }

    #[test]
    fn concatenates_text_nodes_and_ignores_other_children() {
        let xml = doc(
            r#"<w:p w:rsidR="00AA0001"><w:r><w:t xml:space="preserve">one </w:t><w:br/><w:tab/><w:t>two</w:t><w:delText>gone</w:delText></w:r></w:p>"#,
        );
        let runs = parse_text_runs(&xml).unwrap();
        assert_eq!(runs[0].content, "one two");
    }

    #[test]
    fn whitespace_runs_are_dropped_and_indices_stay_dense() {
        let xml = doc(
            r#"<w:p w:rsidR="00AA0001"><w:r><w:t>first</w:t></w:r><w:r><w:t xml:space="preserve">   </w:t></w:r><w:r/><w:r><w:t>second</w:t></w:r></w:p>"#,
        );
        let parsed = parse_document(&xml).unwrap();
        let indices: Vec<usize> = parsed.runs.iter().map(|r| r.sequence_index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(parsed.dropped_runs, 1);
    }

    #[test]
    fn runs_inside_hyperlinks_and_insertions_are_collected_in_order() {
        let xml = doc(
            r#"<w:p w:rsidR="00AA0001"><w:r><w:t>a</w:t></w:r><w:hyperlink><w:r w:rsidR="00BB0002"><w:t>b</w:t></w:r></w:hyperlink><w:ins><w:r><w:t>c</w:t></w:r></w:ins></w:p>"#,
        );
        let runs = parse_text_runs(&xml).unwrap();
        let content: Vec<&str> = runs.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(content, vec!["a", "b", "c"]);
        assert_eq!(runs[1].rsid.as_deref(), Some("00BB0002"));
        assert_eq!(runs[2].rsid.as_deref(), Some("00AA0001"));
    }

    #[test]
    fn namespace_is_resolved_not_prefix_matched() {
        let xml = format!(
            r#"<doc:document xmlns:doc="{NS}"><doc:body><doc:p doc:rsidR="00AA0001"><doc:r><doc:t>prefixed</doc:t></doc:r></doc:p></doc:body></doc:document>"#
        );
        let runs = parse_text_runs(&xml).unwrap();
        assert_eq!(runs[0].rsid.as_deref(), Some("00AA0001"));

        let foreign = r#"<w:document xmlns:w="urn:not-wordprocessingml"><w:p w:rsidR="1"><w:r><w:t>x</w:t></w:r></w:p></w:document>"#;
        assert!(parse_text_runs(foreign).unwrap().is_empty());
    }

    #[test]
    fn textbox_fallback_content_is_counted_once() {
        let xml = format!(
            r#"<w:document xmlns:w="{NS}" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006" xmlns:wps="urn:wps" xmlns:v="urn:v"><w:body>
                <w:p w:rsidR="00AA0001"><w:r><mc:AlternateContent>
                    <mc:Choice Requires="wps"><w:drawing><wps:txbx><w:txbxContent>
                        <w:p w:rsidR="00BB0002"><w:r><w:t>box text here</w:t></w:r></w:p>
                    </w:txbxContent></wps:txbx></w:drawing></mc:Choice>
                    <mc:Fallback><w:pict><v:textbox><w:txbxContent>
                        <w:p w:rsidR="00BB0002"><w:r><w:t>box text here</w:t></w:r></w:p>
                        <w:p/>
                    </w:txbxContent></v:textbox></w:pict></mc:Fallback>
                </mc:AlternateContent></w:r><w:r><w:t>after</w:t></w:r></w:p>
            </w:body></w:document>"#
        );
        let parsed = parse_document(&xml).unwrap();
        let content: Vec<&str> = parsed.runs.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(content, vec!["box text here", "after"]);
        assert_eq!(parsed.runs[0].rsid.as_deref(), Some("00BB0002"));
        assert_eq!(parsed.runs[1].rsid.as_deref(), Some("00AA0001"));
        assert_eq!(parsed.paragraphs, 2);
        let words: usize = parsed.runs.iter().map(TextRun::word_count).sum();
        assert_eq!(words, 4);
    }

    #[test]
    fn attribute_match_is_case_sensitive() {
        let xml = doc(r#"<w:p w:RSIDR="00AA0001"><w:r w:rsidr="00BB0002"><w:t>x</w:t></w:r></w:p>"#);
        let runs = parse_text_runs(&xml).unwrap();
        assert_eq!(runs[0].rsid, None);
    }

    #[test]
    fn entities_are_unescaped() {
        let xml = doc(r#"<w:p><w:r><w:t>fish &amp; chips</w:t></w:r></w:p>"#);
        assert_eq!(parse_text_runs(&xml).unwrap()[0].content, "fish & chips");
    }

    #[test]
    fn document_without_paragraphs_is_empty_not_an_error() {
        let parsed = parse_document(&doc("")).unwrap();
        assert!(parsed.runs.is_empty());
        assert_eq!(parsed.paragraphs, 0);

        let parsed = parse_document(&doc("<w:p/><w:p></w:p>")).unwrap();
        assert!(parsed.runs.is_empty());
        assert_eq!(parsed.paragraphs, 2);
    }

    #[test]
    fn malformed_xml_is_rejected() {
        for xml in [
            format!(r#"<w:document xmlns:w="{NS}"><w:body><w:p></w:body></w:document>"#),
            format!(r#"<w:document xmlns:w="{NS}"><w:body><w:p>"#),
            String::new(),
        ] {
            let err = parse_document(&xml).expect_err("malformed");
            assert!(
                matches!(err, RsidError::MalformedDocumentXml { .. }),
                "unexpected error for {xml:?}: {err:?}"
            );
        }
    }
}
