pub mod analytics;
pub mod common;
pub mod comparison;
pub mod daily;
pub mod invalidate;
pub mod library;
pub mod reload;
pub mod savings;
pub mod stats;
pub mod trends;
