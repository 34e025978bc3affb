//! Data module - simulation output loading

mod cache;
mod loader;
mod table;

pub use cache::TableCache;
pub use loader::{DataLoader, LoaderError};
pub use table::{Table, TableError};

#[cfg(test)]
pub(crate) use table::tests::kpi_table;
