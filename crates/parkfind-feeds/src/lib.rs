pub mod client;
pub mod error;
pub mod fusion;
mod retry;
pub mod types;

pub use client::FeedClient;
pub use error::FeedError;
pub use fusion::fuse;
pub use types::{
    AvailabilityRow, CarparkInfo, DatamallRow, HdbInformationRow, RateRow,
};
