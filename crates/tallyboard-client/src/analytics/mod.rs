pub mod buckets;
pub mod comparison;
pub mod context;
pub mod daily;
pub mod date;
pub mod filter;
pub mod library;
pub mod period;
pub mod savings;
pub mod stats;
pub mod trends;
