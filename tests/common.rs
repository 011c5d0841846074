#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[macro_export]
macro_rules! init {
    () => {
        let _tracing_default_guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt::Subscriber::builder()
                .with_test_writer()
                .with_max_level(tracing::Level::DEBUG)
                .finish(),
        );
    };
}

/// `count` keys drawn uniformly from `0..bound`, reproducible per `seed`.
pub fn random_keys(count: usize, bound: i64, seed: u64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(0..bound)).collect()
}

/// Keys of a cursor in list order.
pub fn keys<V>(cursor: fingerskip::Cursor<i64, V>) -> Vec<i64> {
    cursor.into_iter().map(|e| *e.key()).collect()
}
