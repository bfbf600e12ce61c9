use pdf_core::rng::{derive_substream_seed, RngHandle};
use rand::RngCore;

#[test]
fn rng_emits_reproducible_sequence() {
    let mut rng_a = RngHandle::from_seed(1234);
    let mut rng_b = RngHandle::from_seed(1234);

    let seq_a: Vec<u64> = (0..100).map(|_| rng_a.next_u64()).collect();
    let seq_b: Vec<u64> = (0..100).map(|_| rng_b.next_u64()).collect();

    assert_eq!(seq_a, seq_b);
}

#[test]
fn substreams_are_stable_and_distinct() {
    assert_eq!(derive_substream_seed(7, 1), derive_substream_seed(7, 1));
    assert_ne!(derive_substream_seed(7, 1), derive_substream_seed(7, 2));

    let mut first = RngHandle::substream(7, 1);
    let mut again = RngHandle::substream(7, 1);
    assert_eq!(first.gaussian_draws(16), again.gaussian_draws(16));
}

#[test]
fn gaussian_draws_look_standard() {
    let mut rng = RngHandle::from_seed(42);
    let draws = rng.gaussian_draws(20_000);
    let mean = draws.iter().sum::<f64>() / draws.len() as f64;
    let var = draws.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / draws.len() as f64;
    assert!(mean.abs() < 0.05, "mean drifted: {mean}");
    assert!((var - 1.0).abs() < 0.05, "variance drifted: {var}");
}

#[test]
fn interleaved_words_and_draws_replay() {
    let mut rng_a = RngHandle::from_seed(99);
    let mut rng_b = RngHandle::from_seed(99);

    let word_a = rng_a.next_u64();
    let draws_a = rng_a.gaussian_draws(8);
    let word_b = rng_b.next_u64();
    let draws_b = rng_b.gaussian_draws(8);

    assert_eq!(word_a, word_b);
    assert_eq!(draws_a, draws_b);
    assert_ne!(draws_a, RngHandle::from_seed(99).gaussian_draws(8));
}
