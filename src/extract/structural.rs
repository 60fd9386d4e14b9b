//! Structural text extraction from the HWP compound-file container.
//!
//! An HWP v5 document is an OLE compound file. `FileHeader` carries the
//! format signature and flags; the `BodyText` storage holds one
//! (optionally raw-deflate compressed) stream per section, and each stream
//! is a flat sequence of tagged records. Paragraph text lives in `ParaText`
//! records as UTF-16LE with embedded control codes.
//!
//! The walk is exposed as a lazy event sequence so callers can filter on
//! record kind without the extractor deciding what counts as document text.

use crate::error::{HwpError, HwpResult};
use crate::extract::TextExtractor;
use crate::session::DocumentSession;
use flate2::read::DeflateDecoder;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

/// HWP record tag ids start here; body-text tags are offsets from it.
const HWPTAG_BEGIN: u16 = 0x010;

/// Tag id of paragraph text records.
pub const TAG_PARA_TEXT: u16 = HWPTAG_BEGIN + 51;

/// Record header size field value meaning "extended 4-byte size follows".
const SIZE_EXTENDED: usize = 0xFFF;

/// FileHeader flag bits.
const FLAG_COMPRESSED: u32 = 1 << 0;
const FLAG_ENCRYPTED: u32 = 1 << 1;

const FILE_HEADER_SIGNATURE: &[u8] = b"HWP Document File";

/// Structural tag names excluded from the text buffer by default.
///
/// These are page/section/table/control metadata records; new document
/// revisions may introduce more, so the set is configuration, not logic.
static DEFAULT_EXCLUDED_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ParaHeader",
        "ParaCharShape",
        "ParaLineSeg",
        "ParaRangeTag",
        "CtrlHeader",
        "ListHeader",
        "PageDef",
        "FootnoteShape",
        "PageBorderFill",
        "ShapeComponent",
        "Table",
        "CtrlData",
    ]
    .into_iter()
    .collect()
});

/// Maps a body-text record tag id to its conventional name.
pub fn tag_name(tag_id: u16) -> Option<&'static str> {
    let name = match tag_id.checked_sub(HWPTAG_BEGIN)? {
        50 => "ParaHeader",
        51 => "ParaText",
        52 => "ParaCharShape",
        53 => "ParaLineSeg",
        54 => "ParaRangeTag",
        55 => "CtrlHeader",
        56 => "ListHeader",
        57 => "PageDef",
        58 => "FootnoteShape",
        59 => "PageBorderFill",
        60 => "ShapeComponent",
        61 => "Table",
        62 => "ShapeComponentLine",
        63 => "ShapeComponentRectangle",
        64 => "ShapeComponentEllipse",
        65 => "ShapeComponentArc",
        66 => "ShapeComponentPolygon",
        67 => "ShapeComponentCurve",
        68 => "ShapeComponentOle",
        69 => "ShapeComponentPicture",
        70 => "ShapeComponentContainer",
        71 => "CtrlData",
        72 => "EqEdit",
        74 => "ShapeComponentTextArt",
        75 => "FormObject",
        76 => "MemoShape",
        77 => "MemoList",
        _ => return None,
    };
    Some(name)
}

/// One structural event from the record walk.
#[derive(Debug, Clone)]
pub struct StructuralEvent {
    /// Tag name, or `Tag(0xNNN)` for ids with no conventional name.
    pub kind: String,
    /// Nesting level from the record header.
    pub level: u16,
    /// Decoded text payload; present only for `ParaText` records.
    pub text: Option<String>,
}

/// Which structural tags to drop when flattening events into text.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    excluded: HashSet<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            excluded: DEFAULT_EXCLUDED_TAGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ExtractorConfig {
    /// Adds a tag name to the exclusion set.
    pub fn exclude(mut self, tag: impl Into<String>) -> Self {
        self.excluded.insert(tag.into());
        self
    }

    pub fn is_excluded(&self, kind: &str) -> bool {
        self.excluded.contains(kind)
    }
}

/// An open HWP container.
pub struct HwpContainer {
    comp: cfb::CompoundFile<std::fs::File>,
    path: PathBuf,
    compressed: bool,
}

impl HwpContainer {
    /// Opens `path` and validates the file header.
    ///
    /// Fails with [`HwpError::Extraction`] for non-compound files, missing
    /// or malformed headers, and password-encrypted documents.
    pub fn open(path: &Path) -> HwpResult<Self> {
        let file = std::fs::File::open(path).map_err(|source| HwpError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let comp = cfb::CompoundFile::open(file).map_err(|e| HwpError::Extraction {
            path: path.to_path_buf(),
            reason: format!("not an HWP compound file: {}", e),
        })?;

        let mut container = Self {
            comp,
            path: path.to_path_buf(),
            compressed: false,
        };
        container.read_file_header()?;
        Ok(container)
    }

    fn extraction_error(&self, reason: impl Into<String>) -> HwpError {
        HwpError::Extraction {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn read_file_header(&mut self) -> HwpResult<()> {
        let mut raw = Vec::new();
        self.comp
            .open_stream("/FileHeader")
            .and_then(|mut s| s.read_to_end(&mut raw))
            .map_err(|e| HwpError::Extraction {
                path: self.path.clone(),
                reason: format!("missing FileHeader stream: {}", e),
            })?;

        if raw.len() < 40 || !raw.starts_with(FILE_HEADER_SIGNATURE) {
            return Err(self.extraction_error("FileHeader signature mismatch"));
        }

        let flags = u32::from_le_bytes([raw[36], raw[37], raw[38], raw[39]]);
        if flags & FLAG_ENCRYPTED != 0 {
            return Err(self.extraction_error("password-protected documents are not supported"));
        }
        self.compressed = flags & FLAG_COMPRESSED != 0;
        Ok(())
    }

    /// Names of the body-text section streams, in section order.
    pub fn section_names(&self) -> HwpResult<Vec<String>> {
        let entries = self
            .comp
            .read_storage("/BodyText")
            .map_err(|e| HwpError::Extraction {
                path: self.path.clone(),
                reason: format!("missing BodyText storage: {}", e),
            })?;

        let mut names: Vec<(u32, String)> = entries
            .filter(|e| e.is_stream())
            .filter_map(|e| {
                let name = e.name().to_string();
                let index: u32 = name.strip_prefix("Section")?.parse().ok()?;
                Some((index, name))
            })
            .collect();
        names.sort_by_key(|(index, _)| *index);

        if names.is_empty() {
            return Err(self.extraction_error("BodyText storage has no Section streams"));
        }
        Ok(names.into_iter().map(|(_, name)| name).collect())
    }

    /// Reads and (if needed) decompresses one section stream.
    pub fn section(&mut self, name: &str) -> HwpResult<SectionReader> {
        let mut raw = Vec::new();
        self.comp
            .open_stream(format!("/BodyText/{}", name))
            .and_then(|mut s| s.read_to_end(&mut raw))
            .map_err(|e| HwpError::Extraction {
                path: self.path.clone(),
                reason: format!("cannot read section '{}': {}", name, e),
            })?;

        let data = if self.compressed {
            let mut decoded = Vec::new();
            DeflateDecoder::new(raw.as_slice())
                .read_to_end(&mut decoded)
                .map_err(|e| HwpError::Extraction {
                    path: self.path.clone(),
                    reason: format!("section '{}' failed to decompress: {}", name, e),
                })?;
            decoded
        } else {
            raw
        };

        Ok(SectionReader {
            data,
            path: self.path.clone(),
        })
    }
}

/// One decompressed body-text section, walkable as a lazy event sequence.
pub struct SectionReader {
    data: Vec<u8>,
    path: PathBuf,
}

impl SectionReader {
    pub fn events(&self) -> EventIter<'_> {
        EventIter {
            data: &self.data,
            path: &self.path,
            pos: 0,
        }
    }
}

/// Lazy iterator over the records of one section.
pub struct EventIter<'a> {
    data: &'a [u8],
    path: &'a Path,
    pos: usize,
}

impl Iterator for EventIter<'_> {
    type Item = HwpResult<StructuralEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }

        let (tag_id, level, size, header_len) = match read_record_header(self.data, self.pos) {
            Some(header) => header,
            None => {
                self.pos = self.data.len();
                return Some(Err(HwpError::Extraction {
                    path: self.path.to_path_buf(),
                    reason: "truncated record header".to_string(),
                }));
            }
        };

        let start = self.pos + header_len;
        let end = start + size;
        if end > self.data.len() {
            self.pos = self.data.len();
            return Some(Err(HwpError::Extraction {
                path: self.path.to_path_buf(),
                reason: format!("record payload runs past section end (tag {:#x})", tag_id),
            }));
        }

        let payload = &self.data[start..end];
        self.pos = end;

        let kind = tag_name(tag_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Tag({:#05x})", tag_id));
        let text = (tag_id == TAG_PARA_TEXT).then(|| decode_para_text(payload));

        Some(Ok(StructuralEvent { kind, level, text }))
    }
}

/// Parses a record header at `pos`: tag id (10 bits), level (10 bits),
/// size (12 bits, `0xFFF` meaning a following 4-byte size).
fn read_record_header(data: &[u8], pos: usize) -> Option<(u16, u16, usize, usize)> {
    let b = data.get(pos..pos + 4)?;
    let word = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);

    let tag_id = (word & 0x3FF) as u16;
    let level = ((word >> 10) & 0x3FF) as u16;
    let size = (word >> 20) as usize;

    if size == SIZE_EXTENDED {
        let b = data.get(pos + 4..pos + 8)?;
        let size = u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize;
        Some((tag_id, level, size, 8))
    } else {
        Some((tag_id, level, size, 4))
    }
}

/// Decodes a `ParaText` payload: UTF-16LE code units where values below 32
/// are HWP control characters. Inline and extended controls occupy 8 code
/// units; the remainder are single units mapped to plain whitespace or
/// dropped.
fn decode_para_text(payload: &[u8]) -> String {
    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();

    let mut out = String::new();
    let mut i = 0;
    while i < units.len() {
        let u = units[i];
        match u {
            // Tab is an inline control: 8 code units.
            9 => {
                out.push('\t');
                i += 8;
            }
            // Line break and paragraph break.
            10 | 13 => {
                out.push('\n');
                i += 1;
            }
            // Auto hyphen.
            24 => {
                out.push('-');
                i += 1;
            }
            // Non-breaking and fixed-width spaces.
            30 | 31 => {
                out.push(' ');
                i += 1;
            }
            // Remaining single-unit controls carry no text.
            0 | 25..=29 => {
                i += 1;
            }
            // Inline and extended controls: 8 code units total.
            1..=8 | 11..=23 => {
                i += 8;
            }
            // Surrogate pair.
            0xD800..=0xDBFF => {
                if let Some(&low) = units.get(i + 1).filter(|&&l| (0xDC00..=0xDFFF).contains(&l)) {
                    let c = 0x10000 + ((u as u32 - 0xD800) << 10) + (low as u32 - 0xDC00);
                    if let Some(ch) = char::from_u32(c) {
                        out.push(ch);
                    }
                    i += 2;
                } else {
                    i += 1;
                }
            }
            // Stray low surrogate.
            0xDC00..=0xDFFF => {
                i += 1;
            }
            _ => {
                if let Some(ch) = char::from_u32(u as u32) {
                    out.push(ch);
                }
                i += 1;
            }
        }
    }
    out
}

/// Text extractor over the structural container walk.
///
/// Flattens the event stream into a linear buffer: events with a non-empty
/// text payload whose kind is not excluded by the config are kept, joined
/// with newlines. There is no positional mapping back to the structure;
/// replacements downstream are purely textual.
#[derive(Debug, Clone, Default)]
pub struct StructuralExtractor {
    config: ExtractorConfig,
}

/// What the extraction walk sees in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStats {
    pub sections: usize,
    /// Paragraphs that contribute text to the flattened buffer.
    pub paragraphs: usize,
    /// Character length of the flattened buffer.
    pub characters: usize,
}

impl StructuralExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    fn walk(&self, path: &Path) -> HwpResult<(usize, Vec<String>)> {
        let mut container = HwpContainer::open(path)?;
        let names = container.section_names()?;
        let sections = names.len();

        let mut segments = Vec::new();
        for name in names {
            let section = container.section(&name)?;
            for event in section.events() {
                let event = event?;
                if self.config.is_excluded(&event.kind) {
                    continue;
                }
                if let Some(text) = event.text {
                    let trimmed = text.trim_end_matches('\n');
                    if !trimmed.trim().is_empty() {
                        segments.push(trimmed.to_string());
                    }
                }
            }
        }
        Ok((sections, segments))
    }

    /// Extracts the flattened text of the document at `path`.
    pub fn extract_path(&self, path: &Path) -> HwpResult<String> {
        let (_, segments) = self.walk(path)?;
        Ok(segments.join("\n"))
    }

    /// Counts sections, text paragraphs, and the flattened buffer length
    /// for the document at `path`.
    pub fn stats(&self, path: &Path) -> HwpResult<DocumentStats> {
        let (sections, segments) = self.walk(path)?;
        let text_chars: usize = segments.iter().map(|s| s.chars().count()).sum();
        let separators = segments.len().saturating_sub(1);
        Ok(DocumentStats {
            sections,
            paragraphs: segments.len(),
            characters: text_chars + separators,
        })
    }
}

impl TextExtractor for StructuralExtractor {
    fn extract(&mut self, session: &mut DocumentSession) -> HwpResult<String> {
        let path = session.path()?.to_path_buf();
        self.extract_path(&path)
    }

    fn name(&self) -> &str {
        "structural"
    }
}
