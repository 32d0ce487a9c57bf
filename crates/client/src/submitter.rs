//! One submission round trip.

use tracing::{info, instrument, warn};

use stockhub_transactions::SubmitRequest;

use crate::gateway::{GatewayError, SubmitAck, TransactionGateway};

/// Send `request` once. Failures are returned unchanged; the caller decides
/// whether the user retries.
#[instrument(skip_all, fields(kind = %request.kind(), items = request.item_count(), path = %request.path()))]
pub async fn send(
    gateway: &dyn TransactionGateway,
    request: &SubmitRequest,
) -> Result<SubmitAck, GatewayError> {
    match gateway.submit(request).await {
        Ok(ack) => {
            info!(message = ack.message.as_deref().unwrap_or(""), "transaction submitted");
            Ok(ack)
        }
        Err(GatewayError::Rejected(fields)) => {
            warn!(
                reason = fields.first_message().unwrap_or(""),
                "transaction rejected by backend"
            );
            Err(GatewayError::Rejected(fields))
        }
        Err(err) => {
            warn!(error = %err, "transaction submission failed");
            Err(err)
        }
    }
}
