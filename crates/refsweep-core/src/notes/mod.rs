pub mod classify;
pub mod delete;

pub use classify::{
    classify, NoteCandidate, NoteClassification, NoteMetrics, NoteSuspicious,
};
pub use delete::delete_candidates;
