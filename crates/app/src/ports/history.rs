//! History port: the host's `history/period` API.

use std::future::Future;

use ospi_domain::error::OspiError;
use ospi_domain::history::StateTransition;

/// Reads recorded state changes of an entity.
pub trait HistoryApi {
    /// Transitions of `entity_id`, oldest first.
    ///
    /// The host request path is [`history_path`](ospi_domain::history::history_path).
    fn history(
        &self,
        entity_id: &str,
    ) -> impl Future<Output = Result<Vec<StateTransition>, OspiError>> + Send;
}

impl<T: HistoryApi + Send + Sync> HistoryApi for std::sync::Arc<T> {
    fn history(
        &self,
        entity_id: &str,
    ) -> impl Future<Output = Result<Vec<StateTransition>, OspiError>> + Send {
        (**self).history(entity_id)
    }
}
