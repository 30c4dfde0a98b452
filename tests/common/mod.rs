//! Shared fixtures: build minimal `.docx` containers in memory.
#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

/// Paragraph builder: `(paragraph rsid, [(run rsid, text)])`.
pub struct Para<'a> {
    pub rsid: Option<&'a str>,
    pub runs: Vec<(Option<&'a str>, String)>,
}

pub fn para<'a>(rsid: Option<&'a str>, runs: Vec<(Option<&'a str>, String)>) -> Para<'a> {
    Para { rsid, runs }
}

pub fn words(n: usize) -> String {
    (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
}

pub fn document_xml(paragraphs: &[Para<'_>]) -> String {
    let mut body = String::new();
    for p in paragraphs {
        match p.rsid {
            Some(rsid) => {
                body.push_str(&format!(r#"<w:p w:rsidR="{rsid}">"#));
            }
            None => body.push_str("<w:p>"),
        }
        for (rsid, text) in &p.runs {
            match rsid {
                Some(rsid) => body.push_str(&format!(r#"<w:r w:rsidR="{rsid}">"#)),
                None => body.push_str("<w:r>"),
            }
            body.push_str(&format!(r#"<w:t xml:space="preserve">{text}</w:t></w:r>"#));
        }
        body.push_str("</w:p>");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{W_NS}"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    )
}

/// Zip `document_xml` as `word/document.xml` alongside a content-types part.
pub fn docx_bytes(document_xml: &str) -> Vec<u8> {
    docx_with_parts(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("word/document.xml", document_xml),
    ])
}

pub fn docx_with_parts(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, body) in parts {
        writer.start_file(*name, options).expect("start entry");
        writer.write_all(body.as_bytes()).expect("write entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// 50 identifiers typing ~4 words each, plus one identifier pasting 200 words in one run.
pub fn bulk_scenario_xml() -> String {
    let tags: Vec<String> = (0..50).map(|i| format!("00{i:06X}")).collect();
    let mut paragraphs = Vec::new();
    for (i, tag) in tags.iter().enumerate() {
        paragraphs.push(para(Some(tag.as_str()), vec![(None, words(4))]));
        if i == 20 {
            paragraphs.push(para(Some("00PASTED"), vec![(None, words(200))]));
        }
    }
    document_xml(&paragraphs)
}
