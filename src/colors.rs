use std::collections::HashSet;

use image::Rgb;
use nanorand::{Rng, WyRand};
use palette::{Hsl, IntoColor, Pixel, Srgb};

use crate::error::PaletteError;

/// Produces a set of visually distinct colors.
///
/// Implementations receive the invocation's random source so that a seeded
/// cloud stays reproducible.
pub trait PaletteGenerator {
    fn generate_palette(
        &self,
        count: usize,
        rng: &mut WyRand,
    ) -> Result<Vec<Rgb<u8>>, PaletteError>;
}

/// Hues spread evenly around the wheel from a random offset, with muted
/// saturation and lightness so every color reads on a white canvas.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftPalette;

impl PaletteGenerator for SoftPalette {
    fn generate_palette(
        &self,
        count: usize,
        rng: &mut WyRand,
    ) -> Result<Vec<Rgb<u8>>, PaletteError> {
        if count == 0 {
            return Err(PaletteError::EmptyPalette);
        }

        let offset = rng.generate_range(0..360u32) as f32;
        let step = 360.0 / count as f32;

        let colors: Vec<Rgb<u8>> = (0..count)
            .map(|i| {
                let hue = (offset + step * i as f32) % 360.0;
                let saturation = rng.generate_range(45..=75u32) as f32 / 100.0;
                let lightness = rng.generate_range(30..=50u32) as f32 / 100.0;

                hsl_to_rgb(hue, saturation, lightness)
            })
            .collect();

        let distinct = colors.iter().map(|c| c.0).collect::<HashSet<_>>().len();
        if distinct < count {
            return Err(PaletteError::Exhausted {
                requested: count,
                produced: distinct,
            });
        }

        Ok(colors)
    }
}

/// A caller-chosen set of colors. Returns at most `count` of them.
#[derive(Clone, Debug)]
pub struct FixedPalette(pub Vec<Rgb<u8>>);

impl PaletteGenerator for FixedPalette {
    fn generate_palette(
        &self,
        count: usize,
        _rng: &mut WyRand,
    ) -> Result<Vec<Rgb<u8>>, PaletteError> {
        if count == 0 || self.0.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }

        Ok(self.0.iter().take(count).copied().collect())
    }
}

pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb<u8> {
    let col = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = col.into_color();

    let raw: [u8; 3] = rgb.into_format().into_raw();

    Rgb(raw)
}
