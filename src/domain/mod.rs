pub mod entry;
pub mod review;

pub use entry::{GrammarEntry, KanjiEntry, Level, VocabEntry};
pub use review::{status_label, CardKind, ReviewRecord, WeakKanjiUpdate};
