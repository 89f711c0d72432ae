pub mod daily_summary;
pub mod entry;
pub mod mood;
pub mod stats;
pub mod user;
