//! Bar data access: the `BarStore` capability and its implementations.

mod csv_store;
mod store;

pub use csv_store::CsvBarStore;
pub use store::{BarStore, InMemoryBarStore, StoreError};
