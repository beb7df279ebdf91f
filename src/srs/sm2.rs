//! SM-2 interval calculation.
//!
//! Quality grades 0-5:
//!   0 - no recall at all
//!   1 - wrong, recognized the answer once shown
//!   2 - wrong, but the answer felt known
//!   3 - correct with serious effort
//!   4 - correct after some hesitation
//!   5 - correct instantly

const MIN_EASE_FACTOR: f64 = 1.3;

/// Quality grade outside 0..=5. A bug in the caller, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidQuality(pub u8);

impl std::fmt::Display for InvalidQuality {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "quality grade must be 0-5, got {}", self.0)
  }
}

impl std::error::Error for InvalidQuality {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sm2Result {
  pub ease_factor: f64,
  pub interval_days: i64,
  pub repetitions: i64,
}

/// Apply one SM-2 step to a fact's scheduling state.
///
/// A lapse (quality < 3) resets repetitions and schedules for tomorrow.
/// The first two correct reviews use the fixed 1-day and 6-day intervals;
/// afterwards the interval grows by the ease factor.
pub fn calculate_sm2(
  quality: u8,
  current_repetitions: i64,
  current_ease_factor: f64,
  current_interval: i64,
) -> Result<Sm2Result, InvalidQuality> {
  if quality > 5 {
    return Err(InvalidQuality(quality));
  }

  let (new_interval, new_repetitions) = if quality >= 3 {
    let interval = match current_repetitions {
      0 => 1,
      1 => 6,
      _ => ((current_interval as f64) * current_ease_factor).round() as i64,
    };
    (interval, current_repetitions + 1)
  } else {
    (1, 0)
  };

  // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), floored at 1.3
  let q = quality as f64;
  let ease_delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
  let new_ease_factor = (current_ease_factor + ease_delta).max(MIN_EASE_FACTOR);
  let new_ease_factor = (new_ease_factor * 100.0).round() / 100.0;

  Ok(Sm2Result {
    ease_factor: new_ease_factor,
    interval_days: new_interval,
    repetitions: new_repetitions,
  })
}
