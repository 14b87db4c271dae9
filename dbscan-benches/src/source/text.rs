//! Synthetic text generator for Levenshtein-distance benchmarks.

use dbscan_core::Dataset;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::SyntheticError;

/// Configuration for synthetic text corpus generation.
#[derive(Clone, Debug)]
pub struct SyntheticTextConfig {
    /// Number of strings to generate.
    pub item_count: usize,
    /// Number of template words the corpus is mutated from.
    pub template_count: usize,
    /// Minimum generated string length.
    pub min_length: usize,
    /// Maximum generated string length.
    pub max_length: usize,
    /// Maximum edit operations applied per generated string.
    pub max_edits_per_item: usize,
    /// Character alphabet used for generation and mutation.
    pub alphabet: String,
    /// Random seed for reproducibility.
    pub seed: u64,
}

/// Generates a corpus of words, each a few random edits away from one of a
/// small set of random templates.
///
/// # Errors
/// Returns [`SyntheticError`] when the configuration is invalid.
pub fn synthetic_text(config: &SyntheticTextConfig) -> Result<Dataset<String>, SyntheticError> {
    validate(config)?;
    let alphabet: Vec<char> = config.alphabet.chars().collect();
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let templates: Vec<Vec<char>> = (0..config.template_count.max(1))
        .map(|_| random_word(config, &alphabet, &mut rng))
        .collect();

    let mut items = Vec::with_capacity(config.item_count);
    for template in templates.iter().cycle().take(config.item_count) {
        let mut current = template.clone();
        for _ in 0..rng.gen_range(0..=config.max_edits_per_item) {
            apply_edit(&mut current, &alphabet, &mut rng);
        }
        enforce_length_bounds(&mut current, config, &alphabet, &mut rng);
        items.push(current.into_iter().collect());
    }
    Ok(Dataset::new("synthetic-text", items))
}

const fn validate(config: &SyntheticTextConfig) -> Result<(), SyntheticError> {
    if config.item_count == 0 {
        return Err(SyntheticError::ZeroTextItems);
    }
    if config.min_length == 0 {
        return Err(SyntheticError::ZeroTextLength);
    }
    if config.min_length > config.max_length {
        return Err(SyntheticError::InvalidTextLengthRange {
            min_length: config.min_length,
            max_length: config.max_length,
        });
    }
    if config.alphabet.is_empty() {
        return Err(SyntheticError::EmptyAlphabet);
    }
    Ok(())
}

fn random_word(config: &SyntheticTextConfig, alphabet: &[char], rng: &mut SmallRng) -> Vec<char> {
    let length = rng.gen_range(config.min_length..=config.max_length);
    (0..length)
        .filter_map(|_| random_alphabet_char(alphabet, rng))
        .collect()
}

fn apply_edit(chars: &mut Vec<char>, alphabet: &[char], rng: &mut SmallRng) {
    match rng.gen_range(0..3) {
        0 => insert_char(chars, alphabet, rng),
        1 => delete_char(chars, rng),
        _ => substitute_char(chars, alphabet, rng),
    }
}

fn insert_char(chars: &mut Vec<char>, alphabet: &[char], rng: &mut SmallRng) {
    let insert_index = rng.gen_range(0..=chars.len());
    if let Some(character) = random_alphabet_char(alphabet, rng) {
        chars.insert(insert_index, character);
    }
}

fn delete_char(chars: &mut Vec<char>, rng: &mut SmallRng) {
    if chars.is_empty() {
        return;
    }
    let delete_index = rng.gen_range(0..chars.len());
    chars.remove(delete_index);
}

fn substitute_char(chars: &mut Vec<char>, alphabet: &[char], rng: &mut SmallRng) {
    if chars.is_empty() {
        insert_char(chars, alphabet, rng);
        return;
    }
    let replace_index = rng.gen_range(0..chars.len());
    if let Some(character) = random_alphabet_char(alphabet, rng)
        && let Some(slot) = chars.get_mut(replace_index)
    {
        *slot = character;
    }
}

fn enforce_length_bounds(
    chars: &mut Vec<char>,
    config: &SyntheticTextConfig,
    alphabet: &[char],
    rng: &mut SmallRng,
) {
    while chars.len() < config.min_length {
        insert_char(chars, alphabet, rng);
    }
    while chars.len() > config.max_length {
        delete_char(chars, rng);
    }
}

fn random_alphabet_char(alphabet: &[char], rng: &mut SmallRng) -> Option<char> {
    if alphabet.is_empty() {
        return None;
    }
    alphabet.get(rng.gen_range(0..alphabet.len())).copied()
}
