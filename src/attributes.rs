use ab_glyph::FontRef;
use image::Rgb;
use log::{debug, warn};
use nanorand::{Rng, WyRand};

use crate::{colors::PaletteGenerator, error::CloudError, tokenizer::WordRecord};

pub const DEFAULT_FONT_SIZE: f32 = 24.0;
pub const DEFAULT_PALETTE_SIZE: usize = 10;
pub const FALLBACK_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// How a word's font size is derived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FontSizing {
    /// Every word renders at the same size regardless of its count.
    Constant(f32),
    /// Linear in count, from `min` for the rarest word to `max` for the most
    /// frequent one.
    ByCount { min: f32, max: f32 },
}

impl Default for FontSizing {
    fn default() -> Self {
        FontSizing::Constant(DEFAULT_FONT_SIZE)
    }
}

impl FontSizing {
    pub fn size_for(&self, count: usize, min_count: usize, max_count: usize) -> f32 {
        match *self {
            FontSizing::Constant(size) => size,
            FontSizing::ByCount { min, max } => {
                if max_count <= min_count {
                    return max;
                }

                let t = (count.saturating_sub(min_count)) as f32 / (max_count - min_count) as f32;
                min + (max - min) * t.clamp(0.0, 1.0)
            }
        }
    }
}

/// Parses the font once; the returned face is shared read-only by every word.
pub fn load_font(data: &[u8]) -> Result<FontRef<'_>, CloudError> {
    FontRef::try_from_slice(data).map_err(|err| CloudError::FontLoad(err.to_string()))
}

/// Requests a palette, falling back to a single color when the generator fails.
pub fn resolve_palette(
    generator: &dyn PaletteGenerator,
    palette_size: usize,
    fallback: Rgb<u8>,
    rng: &mut WyRand,
) -> Vec<Rgb<u8>> {
    match generator.generate_palette(palette_size, rng) {
        Ok(colors) if !colors.is_empty() => {
            debug!("generated palette of {} colors", colors.len());
            colors
        }
        Ok(_) => {
            warn!("palette generator returned no colors, all text will use the fallback color");
            vec![fallback]
        }
        Err(err) => {
            warn!("failed to generate color palette, all text will use the fallback color: {err}");
            vec![fallback]
        }
    }
}

/// Gives each ranked word a size and a color drawn uniformly, with
/// replacement, from `palette`. Colors are independent of rank; an empty
/// palette colors every word with `fallback`.
pub fn assign_attributes(
    words: &mut [WordRecord],
    palette: &[Rgb<u8>],
    fallback: Rgb<u8>,
    sizing: FontSizing,
    rng: &mut WyRand,
) {
    let max_count = words.iter().map(|w| w.count).max().unwrap_or(0);
    let min_count = words.iter().map(|w| w.count).min().unwrap_or(0);

    for word in words.iter_mut() {
        word.size = sizing.size_for(word.count, min_count, max_count);
        word.color = match palette.len() {
            0 => fallback,
            1 => palette[0],
            len => palette[rng.generate_range(0..len)],
        };
    }
}
