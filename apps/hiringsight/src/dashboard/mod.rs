// Read-only dashboard API over the exported feature table.
// The table and the optional insights report are loaded once at startup and shared via Arc.

pub mod analytics;
pub mod filters;
pub mod handlers;
pub mod insights;
pub mod table;
