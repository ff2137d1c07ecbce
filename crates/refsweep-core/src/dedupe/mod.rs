pub mod classify;
pub mod delete;
pub mod scan;

pub use classify::{
    classify, Classification, DedupeMetrics, DupAction, ExactDupRow, SuspiciousFinding,
    SuspiciousKind,
};
pub use delete::delete_candidates;
pub use scan::build_records;
