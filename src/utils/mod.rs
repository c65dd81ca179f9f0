//! Utility modules shared by the document pipeline.

pub mod date;
pub mod fs;
pub mod log;
pub mod slug;
