use std::{borrow::Cow, fs, path::Path};

use ab_glyph::FontRef;
use image::{Rgb, RgbaImage};
use log::debug;
use nanorand::WyRand;

pub use attributes::{FontSizing, DEFAULT_FONT_SIZE, DEFAULT_PALETTE_SIZE, FALLBACK_COLOR};
pub use colors::{FixedPalette, PaletteGenerator, SoftPalette};
pub use error::{CloudError, PaletteError};
pub use layout::{PlacedWord, CANVAS_HEIGHT, CANVAS_WIDTH, LINE_STEP, START_Y};
pub use tokenizer::{rank_words, WordRecord, WordTokenizer, STOPWORDS};

mod attributes;
mod colors;
mod error;
mod layout;
mod text;
mod tokenizer;

/// DejaVu Sans, used unless another font is configured.
pub const DEFAULT_FONT: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

/// Renders `text` as a word cloud with the default settings and returns the
/// PNG-encoded image.
pub fn generate_cloud(text: &str) -> Result<Vec<u8>, CloudError> {
    WordCloud::default().generate_png(text)
}

/// Writes encoded image bytes to `path`.
pub fn save_png(bytes: &[u8], path: impl AsRef<Path>) -> Result<(), CloudError> {
    fs::write(path, bytes)?;
    Ok(())
}

pub struct WordCloud {
    tokenizer: WordTokenizer,
    font_data: Cow<'static, [u8]>,
    palette: Box<dyn PaletteGenerator + Send + Sync>,
    palette_size: usize,
    fallback_color: Rgb<u8>,
    font_sizing: FontSizing,
    rng_seed: Option<u64>,
}

impl Default for WordCloud {
    fn default() -> Self {
        WordCloud {
            tokenizer: WordTokenizer::default(),
            font_data: Cow::Borrowed(DEFAULT_FONT),
            palette: Box::new(SoftPalette),
            palette_size: DEFAULT_PALETTE_SIZE,
            fallback_color: FALLBACK_COLOR,
            font_sizing: FontSizing::default(),
            rng_seed: None,
        }
    }
}

impl WordCloud {
    /// Uses the given font file contents. They are parsed on every
    /// generation, so invalid data surfaces as [`CloudError::FontLoad`] there.
    pub fn with_font_bytes(mut self, value: Vec<u8>) -> Self {
        self.font_data = Cow::Owned(value);
        self
    }

    pub fn with_font_from_path(self, path: impl AsRef<Path>) -> Result<Self, CloudError> {
        let font_file = fs::read(path)?;

        Ok(self.with_font_bytes(font_file))
    }

    pub fn with_palette<P>(mut self, value: P) -> Self
    where
        P: PaletteGenerator + Send + Sync + 'static,
    {
        self.palette = Box::new(value);
        self
    }

    pub fn with_palette_size(mut self, size: usize) -> Self {
        self.palette_size = size;
        self
    }

    /// Color used for every word when the palette cannot be generated.
    pub fn with_fallback_color(mut self, value: Rgb<u8>) -> Self {
        self.fallback_color = value;
        self
    }

    pub fn with_font_sizing(mut self, value: FontSizing) -> Self {
        self.font_sizing = value;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Distinct non-stopword words, most frequent first.
    pub fn ranked_words(&self, text: &str) -> Result<Vec<WordRecord>, CloudError> {
        self.tokenizer.ranked_words(text)
    }

    /// Runs the whole pipeline except rasterizing.
    pub fn place_words(&self, text: &str) -> Result<Vec<PlacedWord>, CloudError> {
        self.prepare(text).map(|(_, words)| words)
    }

    pub fn generate_from_text(&self, text: &str) -> Result<RgbaImage, CloudError> {
        let (font, words) = self.prepare(text)?;

        Ok(text::render_words(&words, &font))
    }

    pub fn generate_png(&self, text: &str) -> Result<Vec<u8>, CloudError> {
        let image = self.generate_from_text(text)?;

        text::encode_png(image)
    }

    fn prepare(&self, text: &str) -> Result<(FontRef<'_>, Vec<PlacedWord>), CloudError> {
        let mut words = self.tokenizer.ranked_words(text)?;
        let font = attributes::load_font(&self.font_data)?;

        let mut rng = match self.rng_seed {
            Some(seed) => WyRand::new_seed(seed),
            None => WyRand::new(),
        };

        let palette = attributes::resolve_palette(
            self.palette.as_ref(),
            self.palette_size,
            self.fallback_color,
            &mut rng,
        );
        attributes::assign_attributes(
            &mut words,
            &palette,
            self.fallback_color,
            self.font_sizing,
            &mut rng,
        );
        debug!("placing {} words", words.len());

        Ok((font, layout::layout_words(words)))
    }
}
