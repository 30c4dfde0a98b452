//! `.docx` container access: open the zip archive and hand back a named XML part as text.
//!
//! Byte-stream input (uploads, stdin) is spooled into a private scratch directory so the
//! archive can be read with random access. The directory lives exactly as long as the
//! [`DocxContainer`] that owns it and is removed on drop, including when a later stage
//! errors out or panics.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Result, RsidError};

const SPOOL_FILE_NAME: &str = "upload.docx";

/// Per-invocation scratch directory for spooled input.
#[derive(Debug)]
struct ScratchWorkspace {
    dir: TempDir,
}

impl ScratchWorkspace {
    fn create() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("rsid-lens-").tempdir()?;
        tracing::debug!(
            target = "rsid_lens::extract",
            path = %dir.path().display(),
            "scratch workspace created"
        );
        Ok(Self { dir })
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn spool<R: Read>(&self, mut reader: R) -> Result<PathBuf> {
        let target = self.dir.path().join(SPOOL_FILE_NAME);
        let mut file = fs_err::File::create(&target)?;
        let copied = io::copy(&mut reader, &mut file)?;
        file.sync_all()?;
        tracing::debug!(target = "rsid_lens::extract", bytes = copied, "input spooled");
        Ok(target)
    }
}

/// An opened document container.
#[derive(Debug)]
pub struct DocxContainer {
    // Declared before `workspace` so the file handle closes before the directory is removed.
    archive: ZipArchive<File>,
    source: PathBuf,
    workspace: Option<ScratchWorkspace>,
}

impl DocxContainer {
    /// Open a container from a path on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let archive = open_archive(path)?;
        tracing::debug!(
            target = "rsid_lens::extract",
            path = %path.display(),
            entries = archive.len(),
            "container opened"
        );
        Ok(Self {
            archive,
            source: path.to_path_buf(),
            workspace: None,
        })
    }

    /// Spool a byte stream into a fresh scratch workspace and open it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let workspace = ScratchWorkspace::create()?;
        let spooled = workspace.spool(reader)?;
        let archive = open_archive(&spooled)?;
        Ok(Self {
            archive,
            source: spooled,
            workspace: Some(workspace),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(bytes)
    }

    /// Path the archive was read from (the spooled copy for stream input).
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Scratch directory backing this container, if input was spooled.
    #[must_use]
    pub fn scratch_path(&self) -> Option<&Path> {
        self.workspace.as_ref().map(ScratchWorkspace::path)
    }

    /// Member names in archive order.
    #[must_use]
    pub fn part_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Read a member as UTF-8 text.
    pub fn read_part(&mut self, part: &str) -> Result<String> {
        let mut entry = match self.archive.by_name(part) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(RsidError::PartNotFound { part: part.into() });
            }
            Err(err) => return Err(RsidError::Zip(err)),
        };
        let mut bytes = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes).map_err(|_| RsidError::PartEncoding {
            part: part.into(),
        })?;
        tracing::debug!(
            target = "rsid_lens::extract",
            part,
            bytes = text.len(),
            "part extracted"
        );
        Ok(text)
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|err| RsidError::ContainerNotFound {
        path: path.to_path_buf(),
        reason: err.to_string().into(),
    })?;
    ZipArchive::new(file).map_err(|err| RsidError::ContainerNotFound {
        path: path.to_path_buf(),
        reason: format!("not a zip archive: {err}").into(),
    })
}

/// Read one part from the container at `path`.
pub fn extract_part(path: impl AsRef<Path>, part: &str) -> Result<String> {
    DocxContainer::open(path)?.read_part(part)
}

/// Read one part from an in-memory container. Scratch storage is released before returning.
pub fn extract_part_from_bytes(bytes: &[u8], part: &str) -> Result<String> {
    DocxContainer::from_bytes(bytes)?.read_part(part)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::*;

    fn container_with(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("start entry");
            writer.write_all(body).expect("write entry");
        }
        writer.finish().expect("finish zip").into_inner()
    }

    #[test]
    fn reads_named_part() {
        let bytes = container_with(&[("word/document.xml", b"<w:document/>")]);
        let text = extract_part_from_bytes(&bytes, "word/document.xml").expect("extract");
        assert_eq!(text, "<w:document/>");
    }

    #[test]
    fn missing_part_is_reported_by_name() {
        let bytes = container_with(&[("word/styles.xml", b"<styles/>")]);
        let err = extract_part_from_bytes(&bytes, "word/document.xml").expect_err("missing");
        match err {
            RsidError::PartNotFound { part } => assert_eq!(&*part, "word/document.xml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_zip_input_is_container_not_found() {
        let err = extract_part_from_bytes(b"plain text, not a zip", "word/document.xml")
            .expect_err("not a zip");
        assert!(matches!(err, RsidError::ContainerNotFound { .. }));
    }

    #[test]
    fn missing_path_is_container_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = extract_part(dir.path().join("absent.docx"), "word/document.xml")
            .expect_err("absent");
        match err {
            RsidError::ContainerNotFound { path, .. } => {
                assert!(path.ends_with("absent.docx"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_part_is_rejected() {
        let bytes = container_with(&[("word/document.xml", &[0xff, 0xfe, 0x00, 0x3c])]);
        let err = extract_part_from_bytes(&bytes, "word/document.xml").expect_err("utf8");
        assert!(matches!(err, RsidError::PartEncoding { .. }));
    }

    #[test]
    fn scratch_workspace_removed_on_drop() {
        let bytes = container_with(&[("word/document.xml", b"<w:document/>")]);
        let container = DocxContainer::from_bytes(&bytes).expect("open");
        let scratch = container.scratch_path().expect("spooled").to_path_buf();
        assert!(scratch.exists());
        drop(container);
        assert!(!scratch.exists());
    }

    #[test]
    fn scratch_workspace_removed_when_part_lookup_fails() {
        let bytes = container_with(&[("word/styles.xml", b"<styles/>")]);
        let mut container = DocxContainer::from_bytes(&bytes).expect("open");
        let scratch = container.scratch_path().expect("spooled").to_path_buf();
        assert!(container.read_part("word/document.xml").is_err());
        drop(container);
        assert!(!scratch.exists());
    }

    #[test]
    fn part_names_follow_archive_order() {
        let bytes = container_with(&[
            ("[Content_Types].xml", b"<Types/>"),
            ("word/document.xml", b"<w:document/>"),
        ]);
        let container = DocxContainer::from_bytes(&bytes).expect("open");
        assert_eq!(
            container.part_names(),
            vec!["[Content_Types].xml".to_string(), "word/document.xml".to_string()]
        );
    }
}
