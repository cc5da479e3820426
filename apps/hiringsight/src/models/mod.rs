pub mod features;
pub mod submission;
pub mod table;
