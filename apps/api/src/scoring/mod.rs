// Resume scoring core: section extraction, normalization, structure check,
// embedding similarity, score aggregation, and feedback.
// Synchronous and free of network I/O; handlers run it via spawn_blocking.

pub mod aggregate;
pub mod entities;
pub mod feedback;
pub mod handlers;
pub mod normalize;
pub mod report;
pub mod sections;
pub mod similarity;
pub mod structure;
pub mod tokens;
