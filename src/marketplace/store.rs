/// Error enumeration shared by every repository trait.
///
/// The relational datastore is an external collaborator; its failures are
/// surfaced verbatim through `Unavailable` with no classification or retry.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("backing store unavailable: {0}")]
    Unavailable(String),
}
