//! Service caller port: the host's `callService`.

use std::future::Future;

use ospi_domain::error::OspiError;
use ospi_domain::service::ServiceCall;

/// Hands service calls to the host.
///
/// Resolves once the host has accepted the call; the effect shows up in a
/// later snapshot.
pub trait ServiceCaller {
    fn call_service(&self, call: ServiceCall) -> impl Future<Output = Result<(), OspiError>> + Send;
}

impl<T: ServiceCaller + Send + Sync> ServiceCaller for std::sync::Arc<T> {
    fn call_service(&self, call: ServiceCall) -> impl Future<Output = Result<(), OspiError>> + Send {
        (**self).call_service(call)
    }
}
