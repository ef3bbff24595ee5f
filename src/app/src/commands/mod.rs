pub mod analytics;
pub mod download;
pub mod navigation;
