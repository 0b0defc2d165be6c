use crate::error::{DeckForgeError, DfResult};

/// Finds the first matching row or fails with a fatal `NotFound`.
pub fn find_or_err<'a, T>(
    rows: &'a [T],
    what: &str,
    pred: impl FnMut(&&'a T) -> bool,
) -> DfResult<&'a T> {
    rows.iter()
        .find(pred)
        .ok_or_else(|| DeckForgeError::NotFound(what.to_string()))
}

/// One percentage step of the game's fixed-point bonus math: both factors are
/// rounded to f32 before the multiply, and the product is kept in f32.
/// Per-component results are floored individually before summation.
#[inline]
pub fn rate_step(rate: f64, scale: f32, base: f64) -> f32 {
    (rate as f32 * scale) * base as f32
}

#[inline]
pub fn floor_rate_step(rate: f64, scale: f32, base: f64) -> f64 {
    rate_step(rate, scale, base).floor() as f64
}
