pub mod scheduler;
pub mod sm2;

pub use scheduler::{quality_from_answer, review_card, Difficulty, ReviewOutcome};
pub use sm2::{calculate_sm2, InvalidQuality, Sm2Result};
