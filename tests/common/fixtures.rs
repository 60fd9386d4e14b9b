//! Builders for HWP container fixtures plus scripted automation backends
//! and an in-memory clipboard.
#![allow(dead_code)]

use anyhow::Result;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use hwpfill::{AutomationBackend, AutomationCommand, ClipboardAccess, HwpError, HwpResult};
use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

const TAG_PARA_HEADER: u16 = 0x010 + 50;
const TAG_PARA_TEXT: u16 = 0x010 + 51;
const TAG_PAGE_DEF: u16 = 0x010 + 57;

/// Builder for minimal but well-formed HWP container files.
///
/// Produces a compound file with a `FileHeader` stream and one
/// `BodyText/Section0` stream holding a paragraph record pair per
/// paragraph of text.
#[derive(Debug, Clone)]
pub struct TestHwpBuilder {
    paragraphs: Vec<String>,
    compressed: bool,
    encrypted: bool,
    with_page_def: bool,
}

impl TestHwpBuilder {
    pub fn new() -> Self {
        Self {
            paragraphs: Vec::new(),
            compressed: false,
            encrypted: false,
            with_page_def: true,
        }
    }

    pub fn with_paragraph(mut self, text: &str) -> Self {
        self.paragraphs.push(text.to_string());
        self
    }

    pub fn compressed(mut self) -> Self {
        self.compressed = true;
        self
    }

    /// Sets the password flag in the file header. The body is still
    /// written in the clear; extraction must refuse before reading it.
    pub fn encrypted(mut self) -> Self {
        self.encrypted = true;
        self
    }

    pub fn build(&self, path: &Path) -> Result<()> {
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        let mut comp = cfb::CompoundFile::create(file)?;

        {
            let mut stream = comp.create_stream("/FileHeader")?;
            stream.write_all(&self.file_header())?;
        }

        comp.create_storage("/BodyText")?;
        let section = self.section_bytes()?;
        {
            let mut stream = comp.create_stream("/BodyText/Section0")?;
            stream.write_all(&section)?;
        }

        comp.flush()?;
        Ok(())
    }

    fn file_header(&self) -> Vec<u8> {
        let mut header = vec![0u8; 256];
        header[..17].copy_from_slice(b"HWP Document File");
        // Version 5.0.3.0
        header[32..36].copy_from_slice(&0x05000300u32.to_le_bytes());
        let mut flags = 0u32;
        if self.compressed {
            flags |= 1;
        }
        if self.encrypted {
            flags |= 1 << 1;
        }
        header[36..40].copy_from_slice(&flags.to_le_bytes());
        header
    }

    fn section_bytes(&self) -> Result<Vec<u8>> {
        let mut raw = Vec::new();
        if self.with_page_def {
            raw.extend(record(TAG_PAGE_DEF, 0, &[0u8; 40]));
        }
        for text in &self.paragraphs {
            raw.extend(record(TAG_PARA_HEADER, 0, &[0u8; 22]));

            // Paragraph text plus terminating paragraph-break control.
            let mut units: Vec<u16> = text.encode_utf16().collect();
            units.push(13);
            let payload: Vec<u8> = units.iter().flat_map(|u| u.to_le_bytes()).collect();
            raw.extend(record(TAG_PARA_TEXT, 1, &payload));
        }

        if self.compressed {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&raw)?;
            Ok(encoder.finish()?)
        } else {
            Ok(raw)
        }
    }
}

impl Default for TestHwpBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes one record: packed header word plus payload, extended size
/// form when the payload does not fit 12 bits.
pub fn record(tag_id: u16, level: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    if payload.len() >= 0xFFF {
        let word = (tag_id as u32) | ((level as u32) << 10) | (0xFFF << 20);
        out.extend(word.to_le_bytes());
        out.extend((payload.len() as u32).to_le_bytes());
    } else {
        let word = (tag_id as u32) | ((level as u32) << 10) | ((payload.len() as u32) << 20);
        out.extend(word.to_le_bytes());
    }
    out.extend_from_slice(payload);
    out
}

/// Everything a scripted backend observed, readable from the test after
/// the backend itself has been boxed into a session.
#[derive(Debug, Default)]
pub struct BackendLog {
    pub commands: Vec<&'static str>,
    pub inserted: Option<String>,
    pub saves: Vec<Option<PathBuf>>,
}

/// Scripted automation backend recording every call into a shared log.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    /// Command that should fail when run.
    pub fail_command: Option<AutomationCommand>,
    /// Whether `insert_text` should fail.
    pub fail_insert: bool,
    pub pages: usize,
    log: Rc<RefCell<BackendLog>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            pages: 1,
            ..Self::default()
        }
    }

    pub fn failing_on(command: AutomationCommand) -> Self {
        Self {
            fail_command: Some(command),
            ..Self::new()
        }
    }

    pub fn failing_insert() -> Self {
        Self {
            fail_insert: true,
            ..Self::new()
        }
    }

    /// Clones out the log handle; call before boxing the backend.
    pub fn log(&self) -> Rc<RefCell<BackendLog>> {
        Rc::clone(&self.log)
    }
}

impl AutomationBackend for ScriptedBackend {
    fn connect(&mut self) -> HwpResult<()> {
        Ok(())
    }

    fn open(&mut self, _path: &Path) -> HwpResult<()> {
        Ok(())
    }

    fn run(&mut self, command: AutomationCommand) -> HwpResult<()> {
        if self.fail_command == Some(command) {
            return Err(HwpError::Automation {
                command: command.name().to_string(),
                message: "scripted failure".to_string(),
            });
        }
        self.log.borrow_mut().commands.push(command.name());
        Ok(())
    }

    fn insert_text(&mut self, text: &str) -> HwpResult<()> {
        if self.fail_insert {
            return Err(HwpError::Automation {
                command: "insert-text".to_string(),
                message: "scripted failure".to_string(),
            });
        }
        self.log.borrow_mut().inserted = Some(text.to_string());
        Ok(())
    }

    fn save(&mut self, path: Option<&Path>) -> HwpResult<()> {
        self.log.borrow_mut().saves.push(path.map(Path::to_path_buf));
        Ok(())
    }

    fn page_count(&mut self) -> HwpResult<usize> {
        Ok(self.pages)
    }

    fn disconnect(&mut self) {}

    fn name(&self) -> &str {
        "scripted"
    }
}

/// In-memory clipboard for snapshot extraction tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    /// `None` simulates a clipboard held by another process.
    pub text: Option<String>,
}

impl MemoryClipboard {
    pub fn holding(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }

    pub fn unavailable() -> Self {
        Self { text: None }
    }
}

impl ClipboardAccess for MemoryClipboard {
    fn read_text(&mut self) -> HwpResult<String> {
        match &self.text {
            Some(text) if !text.is_empty() => Ok(text.clone()),
            Some(_) => Err(HwpError::ClipboardUnavailable {
                reason: "clipboard is empty".to_string(),
            }),
            None => Err(HwpError::ClipboardUnavailable {
                reason: "clipboard held by another process".to_string(),
            }),
        }
    }
}
