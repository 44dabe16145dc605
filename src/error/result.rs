//! Result type alias for PGE client operations.

use super::pge_error::PgeError;

/// Type alias for Results using PgeError.
///
/// # Example
///
/// ```ignore
/// use pge_client::error::PgeResult;
///
/// async fn sectors(repo: &CatalogRepository) -> PgeResult<Vec<Sector>> {
///     repo.sectors().await
/// }
/// ```
pub type PgeResult<T> = Result<T, PgeError>;
