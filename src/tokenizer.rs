use std::collections::{HashMap, HashSet};

use caseless::default_case_fold_str;
use image::Rgb;
use log::debug;
use regex::Regex;

use crate::error::CloudError;

// Letters, digits, `@` and `+`.
const CORE: &str = r"[@+\p{L}\p{N}]";
// Allowed between core runs, never at either end of a token.
const JOINER: &str = r"[-.:/'’\p{M}\x{2032}\x{00A0}\x{200C}\x{200D}~]";

/// Common low-information words dropped before counting.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "and", "around", "at", "beside", "in", "of", "on", "or", "the", "then", "to",
];

/// One distinct normalized word and the attributes derived for it.
#[derive(Clone, Debug, PartialEq)]
pub struct WordRecord {
    pub content: String,
    pub count: usize,
    pub size: f32,
    pub color: Rgb<u8>,
}

impl WordRecord {
    fn new(content: String) -> Self {
        WordRecord {
            content,
            count: 1,
            size: 0.0,
            color: Rgb([0, 0, 0]),
        }
    }
}

pub struct WordTokenizer {
    //分词正则
    regex: Regex,
    stopwords: HashSet<String>,
}

impl Default for WordTokenizer {
    fn default() -> Self {
        let regex = Regex::new(&format!("{CORE}+(?:{JOINER}+{CORE}+)*"))
            .expect("Unable to compile tokenization regex");

        WordTokenizer {
            regex,
            stopwords: STOPWORDS.iter().map(|el| el.to_string()).collect(),
        }
    }
}

impl<'a> WordTokenizer {
    /// Splits `text` into raw tokens.
    ///
    /// Fails with [`CloudError::NoWordsFound`] when the grammar matches nothing,
    /// so an empty iterator is never returned.
    pub fn tokenize(
        &'a self,
        text: &'a str,
    ) -> Result<impl Iterator<Item = &'a str> + 'a, CloudError> {
        let mut iter = self
            .regex
            .find_iter(text)
            .map(|mat| mat.as_str())
            .peekable();

        if iter.peek().is_none() {
            return Err(CloudError::NoWordsFound);
        }

        Ok(iter)
    }

    /// Case-folds a token, returning `None` for stopwords.
    ///
    /// The folded form is the identity of a word: `Straße`, `STRASSE` and
    /// `strasse` all fold to `strasse`.
    pub fn normalize(&self, token: &str) -> Option<String> {
        let folded = default_case_fold_str(token);
        if self.stopwords.contains(&folded) {
            None
        } else {
            Some(folded)
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&default_case_fold_str(word))
    }

    /// Counts every normalized, non-stopword token in a single pass.
    ///
    /// Keyed by the folded form; a record's `content` is the lowercase
    /// spelling of the word's first sighting.
    pub fn get_word_frequencies(
        &'a self,
        text: &'a str,
    ) -> Result<HashMap<String, WordRecord>, CloudError> {
        let mut frequencies: HashMap<String, WordRecord> = HashMap::new();
        let mut tokens = 0usize;

        for (token, key) in self.tokenize(text)?.filter_map(|token| {
            tokens += 1;
            self.normalize(token).map(|key| (token, key))
        }) {
            match frequencies.get_mut(&key) {
                Some(record) => record.count += 1,
                None => {
                    frequencies.insert(key, WordRecord::new(token.to_lowercase()));
                }
            }
        }

        debug!(
            "tokenized {} tokens into {} distinct words",
            tokens,
            frequencies.len()
        );

        Ok(frequencies)
    }

    /// Distinct words ordered by [`rank_words`].
    pub fn ranked_words(&'a self, text: &'a str) -> Result<Vec<WordRecord>, CloudError> {
        let frequencies = self.get_word_frequencies(text)?;

        Ok(rank_words(frequencies.into_values().collect()))
    }
}

/// Sorts by count descending; equal counts fall back to ascending content.
pub fn rank_words(mut words: Vec<WordRecord>) -> Vec<WordRecord> {
    words.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.content.cmp(&b.content))
    });

    words
}
