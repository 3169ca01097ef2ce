// Library root: spreadsheet-to-JSON conversion for the scorekeeper app.
// Re-exports all modules so integration tests and the binary share one API.

pub mod config;
pub mod emit;
pub mod normalize;
pub mod pipeline;
pub mod roster;
pub mod schedule;
pub mod table;
