//! Font tables (`.tbl` starting with `Woo!`)
//!
//! A 12-byte header followed by 14-byte glyph records. Each record maps a
//! UTF-16 code unit to a frame in the matching DC6 font sprite.

use super::{ByteReader, FormatError};

pub const SIGNATURE: &[u8; 4] = b"Woo!";
const HEADER_SIZE: usize = 12;
const GLYPH_SIZE: usize = 14;

pub fn has_signature(data: &[u8]) -> bool {
    data.starts_with(SIGNATURE)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontGlyph {
    pub code: u16,
    pub width: u8,
    pub height: u8,
    pub frame_index: u16,
}

impl FontGlyph {
    pub fn character(&self) -> char {
        char::from_u32(self.code as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontTable {
    glyphs: Vec<FontGlyph>,
}

impl FontTable {
    pub fn decode(data: &[u8]) -> Result<Self, FormatError> {
        if !has_signature(data) {
            return Err(FormatError::BadSignature("font table"));
        }

        let mut reader = ByteReader::new(data, "font table");
        reader.bytes(HEADER_SIZE)?;

        let body = data.len() - HEADER_SIZE;
        if body % GLYPH_SIZE != 0 {
            return Err(FormatError::Truncated {
                what: "font table glyph",
                needed: HEADER_SIZE + (body / GLYPH_SIZE + 1) * GLYPH_SIZE,
                got: data.len(),
            });
        }

        let mut glyphs = Vec::with_capacity(body / GLYPH_SIZE);
        for offset in (HEADER_SIZE..data.len()).step_by(GLYPH_SIZE) {
            let mut record = ByteReader::at(data, offset, "font table glyph");
            let code = record.u16()?;
            record.u8()?;
            let width = record.u8()?;
            let height = record.u8()?;
            record.bytes(3)?;
            let frame_index = record.u16()?;
            glyphs.push(FontGlyph { code, width, height, frame_index });
        }

        Ok(Self { glyphs })
    }

    /// Bytes of a table with the signature and no glyphs
    pub fn empty_bytes() -> Vec<u8> {
        let mut data: Vec<u8> = Vec::with_capacity(HEADER_SIZE);
        data.extend_from_slice(SIGNATURE);
        data.extend_from_slice(&1u16.to_le_bytes());
        data.resize(HEADER_SIZE, 0);
        data
    }

    pub fn glyphs(&self) -> &[FontGlyph] {
        &self.glyphs
    }

    /// Glyphs ordered by the sprite frame they draw from
    pub fn glyphs_by_frame(&self) -> Vec<FontGlyph> {
        let mut glyphs = self.glyphs.clone();
        glyphs.sort_by_key(|g| (g.frame_index, g.code));
        glyphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph_record(code: u16, width: u8, frame: u16) -> Vec<u8> {
        let mut record = vec![0u8; GLYPH_SIZE];
        record[0..2].copy_from_slice(&code.to_le_bytes());
        record[3] = width;
        record[4] = 16;
        record[8..10].copy_from_slice(&frame.to_le_bytes());
        record
    }

    #[test]
    fn test_decode_glyphs() {
        let mut data = FontTable::empty_bytes();
        data.extend(glyph_record('B' as u16, 9, 5));
        data.extend(glyph_record('A' as u16, 8, 2));

        let table = FontTable::decode(&data).unwrap();
        assert_eq!(table.glyphs().len(), 2);
        assert_eq!(table.glyphs()[0].character(), 'B');
        assert_eq!(table.glyphs()[0].width, 9);
        assert_eq!(table.glyphs()[0].height, 16);

        let ordered = table.glyphs_by_frame();
        assert_eq!(ordered[0].character(), 'A');
        assert_eq!(ordered[0].frame_index, 2);
    }

    #[test]
    fn test_empty_table() {
        let table = FontTable::decode(&FontTable::empty_bytes()).unwrap();
        assert!(table.glyphs().is_empty());
    }

    #[test]
    fn test_rejects_missing_signature() {
        assert!(matches!(
            FontTable::decode(b"Nope and more bytes"),
            Err(FormatError::BadSignature(_))
        ));
    }

    #[test]
    fn test_rejects_partial_glyph() {
        let mut data = FontTable::empty_bytes();
        data.extend([0u8; 5]);
        assert!(matches!(FontTable::decode(&data), Err(FormatError::Truncated { .. })));
    }
}
