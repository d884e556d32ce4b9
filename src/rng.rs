//! Reproducible random streams keyed by combination identity.
//!
//! A [`KeyedRng`] is fully determined by the ordered keys it was derived from:
//! keys are joined with `U+001F`, hashed with SHA-256, and the first four
//! digest bytes (big-endian, masked to 31 bits) seed a ChaCha20 stream. Every
//! draw below is built on plain `u64` output so the sequence can be reproduced
//! outside Rust.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};
use std::f64::consts::TAU;

use crate::error::{TrendError, TrendResult};

const KEY_SEPARATOR: char = '\u{1f}';

pub struct KeyedRng {
    inner: ChaCha20Rng,
    spare: Option<f64>,
}

/// Hash the keys into a non-negative 31-bit seed.
///
/// Numeric keys must be rendered with `Display` by the caller, so `5` and
/// `"5"` produce the same seed.
pub fn derive_seed<K: AsRef<str>>(keys: &[K]) -> TrendResult<u32> {
    if keys.is_empty() {
        return Err(TrendError::InvalidArgument(
            "cannot derive a random stream from an empty key tuple".into(),
        ));
    }
    let mut hasher = Sha256::new();
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            let mut buf = [0u8; 4];
            hasher.update(KEY_SEPARATOR.encode_utf8(&mut buf).as_bytes());
        }
        hasher.update(key.as_ref().as_bytes());
    }
    let digest = hasher.finalize();
    let head = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    Ok(head & 0x7fff_ffff)
}

impl KeyedRng {
    pub fn from_keys<K: AsRef<str>>(keys: &[K]) -> TrendResult<Self> {
        let seed = derive_seed(keys)?;
        Ok(Self::from_seed(seed))
    }

    pub fn from_seed(seed: u32) -> Self {
        Self {
            inner: ChaCha20Rng::seed_from_u64(u64::from(seed)),
            spare: None,
        }
    }

    pub fn next_unit(&mut self) -> f64 {
        (self.inner.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    pub fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        debug_assert!(high > low);
        let span = (high - low) as f64;
        low + (self.next_unit() * span).floor() as i64
    }

    /// Normal variate via Box-Muller. The second variate of each pair is kept
    /// for the next call.
    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        if let Some(z) = self.spare.take() {
            return mean + std_dev * z;
        }
        // 1 - u keeps the log argument in (0, 1].
        let u1 = 1.0 - self.next_unit();
        let u2 = self.next_unit();
        let radius = (-2.0 * u1.ln()).sqrt();
        let (sin, cos) = (TAU * u2).sin_cos();
        self.spare = Some(radius * sin);
        mean + std_dev * radius * cos
    }
}
