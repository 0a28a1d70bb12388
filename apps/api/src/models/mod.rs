pub mod history;
pub mod resume;
