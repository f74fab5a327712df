//! Diablo II asset formats
//!
//! File types are resolved from the extension, with `.tbl` additionally
//! sniffed for the font table signature.

pub mod dc6;
pub mod font_table;
pub mod palette;

pub use dc6::Dc6;
pub use font_table::{FontGlyph, FontTable};
pub use palette::{Palette, Rgb};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("no file type is defined for extension '{0}'")]
    UnknownExtension(String),
    #[error("{what} is truncated: needed {needed} bytes, got {got}")]
    Truncated { what: &'static str, needed: usize, got: usize },
    #[error("{0} signature is missing")]
    BadSignature(&'static str),
    #[error("unsupported {what} version {version}")]
    UnsupportedVersion { what: &'static str, version: i64 },
    #[error("invalid {what}: {reason}")]
    Invalid { what: &'static str, reason: String },
}

/// Every file type the browsers know how to label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Text,
    Json,
    Audio,
    Palette,
    PaletteTransform,
    AnimationData,
    Dc6,
    Dcc,
    Cof,
    Ds1,
    Dt1,
    FontTable,
    StringTable,
}

impl FileType {
    /// Resolve the type of a file from its extension (with or without the
    /// leading dot) and, where the extension is ambiguous, its contents.
    pub fn resolve(extension: &str, data: &[u8]) -> Result<Self, FormatError> {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        let file_type = match ext.as_str() {
            "txt" => FileType::Text,
            "json" => FileType::Json,
            "wav" => FileType::Audio,
            "dat" => FileType::Palette,
            "pl2" => FileType::PaletteTransform,
            "d2" => FileType::AnimationData,
            "dc6" => FileType::Dc6,
            "dcc" => FileType::Dcc,
            "cof" => FileType::Cof,
            "ds1" => FileType::Ds1,
            "dt1" => FileType::Dt1,
            "tbl" if font_table::has_signature(data) => FileType::FontTable,
            "tbl" => FileType::StringTable,
            _ => return Err(FormatError::UnknownExtension(ext)),
        };
        Ok(file_type)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileType::Text => "Text",
            FileType::Json => "JSON",
            FileType::Audio => "Audio",
            FileType::Palette => "Palette",
            FileType::PaletteTransform => "Palette Transform",
            FileType::AnimationData => "Animation Data",
            FileType::Dc6 => "DC6 Sprite",
            FileType::Dcc => "DCC Sprite",
            FileType::Cof => "COF Animation",
            FileType::Ds1 => "DS1 Map",
            FileType::Dt1 => "DT1 Tiles",
            FileType::FontTable => "Font Table",
            FileType::StringTable => "String Table",
        }
    }
}

/// Little-endian cursor over a byte slice with bounds-checked reads
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    what: &'static str,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8], what: &'static str) -> Self {
        Self { data, pos: 0, what }
    }

    pub fn at(data: &'a [u8], pos: usize, what: &'static str) -> Self {
        Self { data, pos, what }
    }

    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        let end = self.pos.checked_add(len).filter(|end| *end <= self.data.len());
        match end {
            Some(end) => {
                let slice = &self.data[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(FormatError::Truncated {
                what: self.what,
                needed: self.pos.saturating_add(len),
                got: self.data.len(),
            }),
        }
    }

    pub fn u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.bytes(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, FormatError> {
        let b = self.bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32(&mut self) -> Result<u32, FormatError> {
        let b = self.bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn i32(&mut self) -> Result<i32, FormatError> {
        Ok(self.u32()? as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_extension() {
        assert_eq!(FileType::resolve(".txt", b"").unwrap(), FileType::Text);
        assert_eq!(FileType::resolve("DC6", b"").unwrap(), FileType::Dc6);
        assert_eq!(FileType::resolve(".dat", b"").unwrap(), FileType::Palette);
    }

    #[test]
    fn test_tbl_is_sniffed() {
        assert_eq!(FileType::resolve(".tbl", b"Woo!\x01\x00").unwrap(), FileType::FontTable);
        assert_eq!(FileType::resolve(".tbl", b"\x00\x00strings").unwrap(), FileType::StringTable);
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(
            FileType::resolve(".xyz", b""),
            Err(FormatError::UnknownExtension(ext)) if ext == "xyz"
        ));
    }

    #[test]
    fn test_reader_reports_truncation() {
        let mut reader = ByteReader::new(&[1, 2, 3], "header");
        assert_eq!(reader.u16().unwrap(), 0x0201);
        assert!(matches!(
            reader.u32(),
            Err(FormatError::Truncated { what: "header", needed: 6, got: 3 })
        ));
    }
}
