//! 256-color palettes (`.dat`)
//!
//! Stored as 256 consecutive BGR triples.

use super::FormatError;

pub const PALETTE_COLORS: usize = 256;
const ENTRY_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgb; PALETTE_COLORS],
}

impl Palette {
    pub fn decode(data: &[u8]) -> Result<Self, FormatError> {
        let needed = PALETTE_COLORS * ENTRY_SIZE;
        if data.len() < needed {
            return Err(FormatError::Truncated { what: "palette", needed, got: data.len() });
        }

        let mut colors = [Rgb::default(); PALETTE_COLORS];
        for (color, entry) in colors.iter_mut().zip(data.chunks_exact(ENTRY_SIZE)) {
            *color = Rgb::new(entry[2], entry[1], entry[0]);
        }
        Ok(Self { colors })
    }

    /// Index-as-intensity ramp, used where no game palette is loaded
    pub fn grayscale() -> Self {
        let mut colors = [Rgb::default(); PALETTE_COLORS];
        for (i, color) in colors.iter_mut().enumerate() {
            *color = Rgb::new(i as u8, i as u8, i as u8);
        }
        Self { colors }
    }

    pub fn colors(&self) -> &[Rgb; PALETTE_COLORS] {
        &self.colors
    }

    pub fn color(&self, index: u8) -> Rgb {
        self.colors[index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_swaps_bgr() {
        let mut data = vec![0u8; 768];
        data[0..3].copy_from_slice(&[10, 20, 30]);
        data[765..768].copy_from_slice(&[1, 2, 3]);
        let palette = Palette::decode(&data).unwrap();
        assert_eq!(palette.color(0), Rgb::new(30, 20, 10));
        assert_eq!(palette.color(255), Rgb::new(3, 2, 1));
    }

    #[test]
    fn test_short_palette_fails() {
        assert!(matches!(
            Palette::decode(&[0u8; 100]),
            Err(FormatError::Truncated { needed: 768, got: 100, .. })
        ));
    }

    #[test]
    fn test_grayscale_ramp() {
        let palette = Palette::grayscale();
        assert_eq!(palette.color(128), Rgb::new(128, 128, 128));
    }
}
