//! Card controllers: use-case implementations.
//!
//! Each controller accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from the host.

pub mod station_card;
pub mod system_card;

use ospi_domain::error::OspiError;
use ospi_domain::id::CallId;
use ospi_domain::service::ServiceCall;

use crate::ports::ServiceCaller;

/// What an input dialog shows when it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogPrompt {
    pub title: String,
    pub label: String,
    /// Initial content of the input field.
    pub initial: String,
}

async fn dispatch<S: ServiceCaller>(caller: &S, call: ServiceCall) -> Result<CallId, OspiError> {
    let call_id = call.id;
    tracing::info!(
        %call_id,
        service = %call.service,
        entity_id = %call.entity_id,
        "calling service"
    );
    caller.call_service(call).await.inspect_err(|err| {
        tracing::warn!(%call_id, error = %err, "service call failed");
    })?;
    Ok(call_id)
}
