//! Bundled study content and database seeding.
//!
//! Baseline N5 decks ship embedded in the binary so a fresh install has
//! something to study. Seeding is idempotent: tables that already hold
//! content are left untouched.

pub mod seed;

pub use seed::{seed_baseline, SeedError, SeedReport};
