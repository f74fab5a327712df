//! DC6 sprites
//!
//! Header, a frame pointer table (directions x frames per direction), then
//! run-length encoded frames. Rows are stored bottom to top.

use super::palette::Palette;
use super::{ByteReader, FormatError};
use image::{Rgba, RgbaImage};

const SUPPORTED_VERSION: i32 = 6;
const HEADER_SIZE: usize = 24;
const END_OF_LINE: u8 = 0x80;
const TRANSPARENT_RUN: u8 = 0x80;
const MAX_FRAME_DIMENSION: u32 = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dc6Frame {
    pub flipped: u32,
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub unknown: u32,
    pub next_block: u32,
    pub frame_data: Vec<u8>,
    pub terminator: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dc6 {
    pub version: i32,
    pub flags: u32,
    pub encoding: u32,
    pub termination: [u8; 4],
    pub directions: u32,
    pub frames_per_direction: u32,
    pub frames: Vec<Dc6Frame>,
}

impl Dc6 {
    pub fn decode(data: &[u8]) -> Result<Self, FormatError> {
        let mut reader = ByteReader::new(data, "DC6 header");
        let version = reader.i32()?;
        if version != SUPPORTED_VERSION {
            return Err(FormatError::UnsupportedVersion { what: "DC6", version: version as i64 });
        }
        let flags = reader.u32()?;
        let encoding = reader.u32()?;
        let mut termination = [0u8; 4];
        termination.copy_from_slice(reader.bytes(4)?);
        let directions = reader.u32()?;
        let frames_per_direction = reader.u32()?;

        let frame_count = (directions as usize)
            .checked_mul(frames_per_direction as usize)
            .filter(|count| count.saturating_mul(4) <= data.len().saturating_sub(HEADER_SIZE))
            .ok_or_else(|| FormatError::Invalid {
                what: "DC6",
                reason: format!("{directions} directions x {frames_per_direction} frames does not fit the file"),
            })?;

        let mut pointers = Vec::with_capacity(frame_count);
        for _ in 0..frame_count {
            pointers.push(reader.u32()? as usize);
        }

        let frames = pointers
            .into_iter()
            .map(|pointer| decode_frame_header(data, pointer))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            version,
            flags,
            encoding,
            termination,
            directions,
            frames_per_direction,
            frames,
        })
    }

    pub fn frame(&self, direction: u32, frame: u32) -> Option<&Dc6Frame> {
        if direction >= self.directions || frame >= self.frames_per_direction {
            return None;
        }
        self.frames.get((direction * self.frames_per_direction + frame) as usize)
    }

    /// Largest frame extent, used to size viewers
    pub fn max_frame_size(&self) -> (u32, u32) {
        self.frames.iter().fold((0, 0), |(w, h), f| (w.max(f.width), h.max(f.height)))
    }
}

fn decode_frame_header(data: &[u8], pointer: usize) -> Result<Dc6Frame, FormatError> {
    let mut reader = ByteReader::at(data, pointer, "DC6 frame");
    let flipped = reader.u32()?;
    let width = reader.u32()?;
    let height = reader.u32()?;
    let offset_x = reader.i32()?;
    let offset_y = reader.i32()?;
    let unknown = reader.u32()?;
    let next_block = reader.u32()?;
    let length = reader.u32()? as usize;
    let frame_data = reader.bytes(length)?.to_vec();
    let mut terminator = [0u8; 3];
    terminator.copy_from_slice(reader.bytes(3)?);

    if width > MAX_FRAME_DIMENSION || height > MAX_FRAME_DIMENSION {
        return Err(FormatError::Invalid {
            what: "DC6 frame",
            reason: format!("{width}x{height} exceeds the maximum frame size"),
        });
    }

    Ok(Dc6Frame {
        flipped,
        width,
        height,
        offset_x,
        offset_y,
        unknown,
        next_block,
        frame_data,
        terminator,
    })
}

impl Dc6Frame {
    /// Expand the run-length data into palette indices, `None` for
    /// transparent pixels. Rows come out top to bottom.
    pub fn decode_indices(&self) -> Result<Vec<Option<u8>>, FormatError> {
        let width = self.width as usize;
        let height = self.height as usize;
        let mut pixels = vec![None; width * height];
        if width == 0 || height == 0 {
            return Ok(pixels);
        }

        let invalid = |reason: &str| FormatError::Invalid { what: "DC6 frame data", reason: reason.to_string() };

        let mut x = 0usize;
        let mut y = height - 1;
        let mut data = self.frame_data.iter().copied();

        while let Some(code) = data.next() {
            if code == END_OF_LINE {
                if y == 0 {
                    break;
                }
                y -= 1;
                x = 0;
            } else if code & TRANSPARENT_RUN != 0 {
                x += (code & 0x7F) as usize;
            } else {
                for _ in 0..code {
                    let index = data.next().ok_or_else(|| invalid("pixel run ends early"))?;
                    if x >= width {
                        return Err(invalid("pixel run overflows row"));
                    }
                    pixels[y * width + x] = Some(index);
                    x += 1;
                }
            }
        }

        Ok(pixels)
    }

    pub fn to_image(&self, palette: &Palette) -> Result<RgbaImage, FormatError> {
        let indices = self.decode_indices()?;
        let mut image = RgbaImage::new(self.width, self.height);
        for (pixel, index) in image.pixels_mut().zip(indices) {
            *pixel = match index {
                Some(index) => {
                    let c = palette.color(index);
                    Rgba([c.r, c.g, c.b, 255])
                }
                None => Rgba([0, 0, 0, 0]),
            };
        }
        Ok(image)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::build_dc6;
    use super::*;

    // 3x2 frame. Bottom row: skip 1, then pixels 7, 8. Top row: pixel 5.
    const RLE: &[u8] = &[0x81, 2, 7, 8, END_OF_LINE, 1, 5, END_OF_LINE];

    #[test]
    fn test_decode_header_and_frames() {
        let dc6 = Dc6::decode(&build_dc6(2, 3, 3, 2, RLE)).unwrap();
        assert_eq!(dc6.directions, 2);
        assert_eq!(dc6.frames_per_direction, 3);
        assert_eq!(dc6.frames.len(), 6);
        assert_eq!(dc6.frame(1, 2).unwrap().offset_y, -1);
        assert!(dc6.frame(2, 0).is_none());
        assert_eq!(dc6.max_frame_size(), (3, 2));
    }

    #[test]
    fn test_decode_rle_rows_bottom_up() {
        let dc6 = Dc6::decode(&build_dc6(1, 1, 3, 2, RLE)).unwrap();
        let pixels = dc6.frames[0].decode_indices().unwrap();
        assert_eq!(pixels, vec![Some(5), None, None, None, Some(7), Some(8)]);
    }

    #[test]
    fn test_to_image_uses_palette_and_alpha() {
        let dc6 = Dc6::decode(&build_dc6(1, 1, 3, 2, RLE)).unwrap();
        let image = dc6.frames[0].to_image(&Palette::grayscale()).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgba([5, 5, 5, 255]));
        assert_eq!(image.get_pixel(1, 0)[3], 0);
        assert_eq!(image.get_pixel(2, 1), &Rgba([8, 8, 8, 255]));
    }

    #[test]
    fn test_rejects_wrong_version() {
        let mut data = build_dc6(1, 1, 1, 1, &[END_OF_LINE]);
        data[0] = 5;
        assert!(matches!(
            Dc6::decode(&data),
            Err(FormatError::UnsupportedVersion { version: 5, .. })
        ));
    }

    #[test]
    fn test_rejects_absurd_frame_count() {
        let mut data = build_dc6(1, 1, 1, 1, &[END_OF_LINE]);
        data[16..20].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(Dc6::decode(&data), Err(FormatError::Invalid { .. })));
    }

    #[test]
    fn test_overflowing_run_is_an_error() {
        let dc6 = Dc6::decode(&build_dc6(1, 1, 1, 1, &[3, 1, 2, 3])).unwrap();
        assert!(dc6.frames[0].decode_indices().is_err());
    }
}
