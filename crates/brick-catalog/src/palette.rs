//! Fixed colour palette.
//!
//! Placed parts store an index into this palette; the exporter writes the
//! matching LDraw colour code.

/// LDraw "main colour" code, used when an index is out of range.
pub const LDRAW_MAIN_COLOR: u32 = 16;

/// One palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteColor {
    /// Display name.
    pub name: &'static str,
    /// sRGB hex value, `0xRRGGBB`.
    pub rgb: u32,
    /// LDraw colour code.
    pub ldraw_code: u32,
}

const STANDARD: &[PaletteColor] = &[
    PaletteColor { name: "Red", rgb: 0xC91A09, ldraw_code: 4 },
    PaletteColor { name: "Blue", rgb: 0x0055BF, ldraw_code: 1 },
    PaletteColor { name: "Yellow", rgb: 0xF2CD37, ldraw_code: 14 },
    PaletteColor { name: "Green", rgb: 0x237841, ldraw_code: 2 },
    PaletteColor { name: "White", rgb: 0xFFFFFF, ldraw_code: 15 },
    PaletteColor { name: "Black", rgb: 0x1B2A34, ldraw_code: 0 },
    PaletteColor { name: "Orange", rgb: 0xFE8A18, ldraw_code: 25 },
    PaletteColor { name: "Light Bluish Grey", rgb: 0xA0A5A9, ldraw_code: 71 },
    PaletteColor { name: "Dark Bluish Grey", rgb: 0x6C6E68, ldraw_code: 72 },
    PaletteColor { name: "Tan", rgb: 0xE4CD9E, ldraw_code: 19 },
    PaletteColor { name: "Reddish Brown", rgb: 0x582A12, ldraw_code: 70 },
    PaletteColor { name: "Lime", rgb: 0xBBE90B, ldraw_code: 27 },
    PaletteColor { name: "Medium Azure", rgb: 0x36AEBF, ldraw_code: 322 },
    PaletteColor { name: "Dark Red", rgb: 0x720E0F, ldraw_code: 320 },
    PaletteColor { name: "Trans-Clear", rgb: 0xFCFCFC, ldraw_code: 47 },
    PaletteColor { name: "Bright Pink", rgb: 0xE4ADC8, ldraw_code: 29 },
];

/// Ordered colour palette.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<PaletteColor>,
}

impl Palette {
    /// The standard palette.
    pub fn standard() -> Self {
        Self {
            colors: STANDARD.to_vec(),
        }
    }

    /// Build a palette from custom entries.
    pub fn from_colors(colors: Vec<PaletteColor>) -> Self {
        Self { colors }
    }

    /// Entry at `index`.
    pub fn get(&self, index: u32) -> Option<&PaletteColor> {
        self.colors.get(index as usize)
    }

    /// LDraw code for `index`, falling back to the main colour.
    pub fn ldraw_code(&self, index: u32) -> u32 {
        self.get(index).map_or(LDRAW_MAIN_COLOR, |c| c.ldraw_code)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True when the palette has no entries.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &PaletteColor> {
        self.colors.iter()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_entry_is_red() {
        let p = Palette::standard();
        assert_eq!(p.get(0).unwrap().name, "Red");
        assert_eq!(p.ldraw_code(0), 4);
    }

    #[test]
    fn out_of_range_is_main_colour() {
        let p = Palette::standard();
        assert_eq!(p.ldraw_code(p.len() as u32), LDRAW_MAIN_COLOR);
    }
}
