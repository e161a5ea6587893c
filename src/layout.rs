use ab_glyph::{point, Point};

use crate::tokenizer::WordRecord;

pub const CANVAS_WIDTH: u32 = 1000;
pub const CANVAS_HEIGHT: u32 = 1000;

/// Vertical anchor of the first word.
pub const START_Y: f32 = 10.0;
/// Vertical distance between consecutive words.
pub const LINE_STEP: f32 = 36.0;

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedWord {
    pub word: WordRecord,
    /// Anchor point; the text is centered on it horizontally and vertically.
    pub position: Point,
}

/// Stacks words top to bottom on the canvas center line, in ranking order.
///
/// There is no bounds check: long lists keep advancing past the bottom edge.
pub fn layout_words(words: Vec<WordRecord>) -> Vec<PlacedWord> {
    let x = CANVAS_WIDTH as f32 / 2.0;

    words
        .into_iter()
        .enumerate()
        .map(|(index, word)| PlacedWord {
            word,
            position: point(x, START_Y + LINE_STEP * index as f32),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{layout_words, CANVAS_HEIGHT, LINE_STEP, START_Y};
    use crate::tokenizer::WordTokenizer;

    #[test]
    fn words_are_stacked_in_rank_order() {
        let words = WordTokenizer::default()
            .ranked_words("kiwi kiwi kiwi fig fig lime")
            .unwrap();
        let placed = layout_words(words);

        let contents: Vec<_> = placed.iter().map(|p| p.word.content.as_str()).collect();
        assert_eq!(contents, vec!["kiwi", "fig", "lime"]);
        for (i, p) in placed.iter().enumerate() {
            assert_eq!(p.position.x, 500.0);
            assert_eq!(p.position.y, START_Y + LINE_STEP * i as f32);
        }
    }

    #[test]
    fn long_lists_run_past_the_canvas() {
        let text = (0..40).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let placed = layout_words(WordTokenizer::default().ranked_words(&text).unwrap());

        assert_eq!(placed.len(), 40);
        assert!(placed.last().unwrap().position.y > CANVAS_HEIGHT as f32);
    }

    #[test]
    fn empty_ranking_places_nothing() {
        assert!(layout_words(vec![]).is_empty());
    }
}
