use std::io::Cursor;

use ab_glyph::{point, Font, Glyph, GlyphId, Point, PxScale, ScaleFont};
use image::{DynamicImage, ImageOutputFormat, Pixel, Rgba, RgbaImage};

use crate::{
    error::CloudError,
    layout::{PlacedWord, CANVAS_HEIGHT, CANVAS_WIDTH},
};

pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Clone, Debug)]
pub struct GlyphData {
    pub glyphs: Vec<Glyph>,
    pub width: u32,
    pub height: u32,
}

//把文本转换为字体，方便画图
pub fn text_to_glyphs<F: Font>(text: &str, font: &F, scale: PxScale) -> GlyphData {
    let scaled_font = font.as_scaled(scale);

    let mut glyphs: Vec<Glyph> = vec![];
    layout_paragraph(&scaled_font, point(0.0, 0.0), text, &mut glyphs);

    let glyphs_height = scaled_font.height().ceil() as u32;
    let glyphs_width = match (glyphs.first(), glyphs.last()) {
        (Some(first), Some(last)) => {
            let max_x = last.position.x + scaled_font.h_advance(last.id);
            (max_x - first.position.x).ceil() as u32
        }
        _ => 0,
    };

    GlyphData {
        glyphs,
        width: glyphs_width,
        height: glyphs_height,
    }
}

/// Blends glyph coverage into `buffer` with its top-left corner at `origin`.
/// Pixels falling outside the buffer are skipped.
pub fn draw_glyphs_to_rgba_buffer<F: Font>(
    buffer: &mut RgbaImage,
    glyph_data: GlyphData,
    font: &F,
    origin: Point,
    pixel: Rgba<u8>,
) {
    let (width, height) = (buffer.width() as i64, buffer.height() as i64);

    for glyph in glyph_data.glyphs {
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();

            outlined.draw(|x, y, v| {
                let final_x = (origin.x + bounds.min.x) as i64 + x as i64;
                let final_y = (origin.y + bounds.min.y) as i64 + y as i64;
                if final_x < 0 || final_y < 0 || final_x >= width || final_y >= height {
                    return;
                }

                let px = buffer.get_pixel_mut(final_x as u32, final_y as u32);
                px.apply2(&pixel, |old, new| {
                    ((v * new as f32) + (1.0 - v) * old as f32) as u8
                });
                px.0[3] = 0xFF;
            })
        }
    }
}

pub fn layout_paragraph<F, SF>(font: &SF, position: Point, text: &str, target: &mut Vec<Glyph>)
where
    F: Font,
    SF: ScaleFont<F>,
{
    let v_advance = font.height() + font.line_gap();
    let mut caret = position + point(0.0, font.ascent());
    let mut last_glyph: Option<GlyphId> = None;
    for c in text.chars() {
        if c.is_control() {
            if c == '\n' {
                //进行换行
                caret = point(position.x, caret.y + v_advance);
            }
            continue;
        }

        let mut glyph = font.scaled_glyph(c);
        if let Some(previous) = last_glyph.take() {
            caret.x += font.kern(previous, glyph.id);
        }
        glyph.position = caret;
        last_glyph = Some(glyph.id);
        caret.x += font.h_advance(glyph.id);

        target.push(glyph);
    }
}

/// Rasterizes placed words onto a white canvas, each centered on its anchor.
pub fn render_words<F: Font>(words: &[PlacedWord], font: &F) -> RgbaImage {
    let mut final_image_buffer = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND);

    for placed in words {
        let glyphs = text_to_glyphs(&placed.word.content, font, PxScale::from(placed.word.size));
        let origin = point(
            placed.position.x - glyphs.width as f32 / 2.0,
            placed.position.y - glyphs.height as f32 / 2.0,
        );
        let [r, g, b] = placed.word.color.0;

        draw_glyphs_to_rgba_buffer(
            &mut final_image_buffer,
            glyphs,
            font,
            origin,
            Rgba([r, g, b, 0xFF]),
        );
    }

    final_image_buffer
}

pub fn encode_png(image: RgbaImage) -> Result<Vec<u8>, CloudError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use ab_glyph::{point, PxScale};
    use image::{Rgb, Rgba, RgbaImage};

    use super::{draw_glyphs_to_rgba_buffer, encode_png, render_words, text_to_glyphs, BACKGROUND};
    use crate::{attributes::load_font, layout::PlacedWord, tokenizer::WordRecord, DEFAULT_FONT};

    fn placed(content: &str, x: f32, y: f32) -> PlacedWord {
        PlacedWord {
            word: WordRecord {
                content: content.to_string(),
                count: 1,
                size: 24.0,
                color: Rgb([200, 0, 0]),
            },
            position: point(x, y),
        }
    }

    #[test]
    fn measures_text() {
        let font = load_font(DEFAULT_FONT).unwrap();
        let short = text_to_glyphs("ab", &font, PxScale::from(24.0));
        let long = text_to_glyphs("abcdef", &font, PxScale::from(24.0));

        assert_eq!(short.glyphs.len(), 2);
        assert!(long.width > short.width);
        assert_eq!(short.height, long.height);
        assert_eq!(text_to_glyphs("", &font, PxScale::from(24.0)).width, 0);
    }

    #[test]
    fn draws_word_around_anchor() {
        let font = load_font(DEFAULT_FONT).unwrap();
        let image = render_words(&[placed("cloud", 500.0, 500.0)], &font);

        let colored: Vec<(u32, u32)> = image
            .enumerate_pixels()
            .filter(|(_, _, px)| **px != BACKGROUND)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!colored.is_empty());
        assert!(colored.iter().all(|(x, y)| (430..570).contains(x) && (480..520).contains(y)));
    }

    #[test]
    fn off_canvas_words_are_clipped() {
        let font = load_font(DEFAULT_FONT).unwrap();
        let image = render_words(
            &[placed("hidden", 500.0, 1400.0), placed("edge", -5.0, 998.0)],
            &font,
        );
        assert_eq!(image.dimensions(), (1000, 1000));

        let mut small = RgbaImage::from_pixel(4, 4, BACKGROUND);
        let glyphs = text_to_glyphs("W", &font, PxScale::from(40.0));
        draw_glyphs_to_rgba_buffer(&mut small, glyphs, &font, point(-10.0, -10.0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn encodes_png() {
        let bytes = encode_png(RgbaImage::from_pixel(2, 2, BACKGROUND)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
