pub mod csv_source;
pub mod fixture;
pub mod snapshot;
pub mod store;
pub mod types;
