//! Sample text generation for testing.
//!
//! When --random-text is given, we generate text that exercises the bit codec:
//! mostly ASCII, plus accented letters (two bytes in UTF-8, one in Latin-1)
//! and, for UTF-8, symbols that take three or four bytes.
//!
//! Characters are drawn only from what the chosen charset can represent, so the
//! generated text always encodes.

use linecode_sim_core::Charset;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ASCII: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'G', 'M', 'O', ' ', ' ', ' ', '.', '!', ',',
    '0', '1', '2', '3',
];

const LATIN1_EXTRA: &[char] = &['á', 'ã', 'ç', 'é', 'ê', 'í', 'ó', 'õ', 'ú', 'Ç'];

const UTF8_EXTRA: &[char] = &['✓', '€', '→', 'λ', '🙂'];

/// Generate `len` characters of text representable in `charset`.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `len`: number of characters (not bytes)
/// - `charset`: limits which characters may appear
pub fn generate_sample_text(seed: u64, len: usize, charset: Charset) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..len)
        .map(|_| {
            // Choose character class randomly
            let class: u8 = rng.gen_range(0..10);
            match (class, charset) {
                // 10% multi-byte symbols where the charset allows them
                (0, Charset::Utf8) => pick(&mut rng, UTF8_EXTRA),

                // 20% accented letters
                (1..=2, Charset::Utf8 | Charset::Latin1) => pick(&mut rng, LATIN1_EXTRA),

                _ => pick(&mut rng, ASCII),
            }
        })
        .collect()
}

fn pick(rng: &mut ChaCha8Rng, alphabet: &[char]) -> char {
    alphabet[rng.gen_range(0..alphabet.len())]
}
