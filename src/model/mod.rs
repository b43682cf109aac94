mod database;
pub use database::DbConnection;

mod error;
pub use error::{StoreError, StoreResult};

mod store;
pub use store::{MemoryProgressStore, PgProgressStore, ProgressStore, Versioned};
