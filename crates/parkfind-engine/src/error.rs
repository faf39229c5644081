use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    /// The query matched nothing. Recoverable; callers show an empty state.
    #[error("no carparks matched the query")]
    NoResults,

    /// The caller supplied an out-of-range page window. A well-behaved
    /// caller never triggers this; it is surfaced rather than clamped.
    #[error("invalid page window [{start}, {end}) over {total} results")]
    InvalidPage {
        start: usize,
        end: usize,
        total: usize,
    },

    /// Lookup by an identifier the snapshot does not contain.
    #[error("no carpark with id {id:?}")]
    NotFound { id: String },
}
