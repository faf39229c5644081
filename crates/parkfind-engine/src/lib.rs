pub mod error;
pub mod query;
pub mod store;

pub use error::QueryError;
pub use store::CarparkStore;
