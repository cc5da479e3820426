// Candidate feature engineering.
// Implements: field extraction, location resolution, scoring, corpus post-processing,
// summary statistics and table export. All reference lists come from `taxonomy`.

pub mod export;
pub mod extractors;
pub mod location;
pub mod pipeline;
pub mod post_process;
pub mod scoring;
pub mod stats;
pub mod summary;
pub mod taxonomy;
