use crate::domain::entities::{GuestVisitRequest, RequestStatus};
use crate::domain::errors::GuestRequestError;
use crate::domain::ports::GuestRequestStore;

// Rejection use case with injected dependencies. The reason, when given, is
// persisted alongside the status so the decision stays auditable.
pub struct RejectRequestUseCase<S> {
    pub store: S,
}

impl<S> RejectRequestUseCase<S>
where
    S: GuestRequestStore,
{
    pub async fn execute(
        &self,
        request_id: i64,
        reason: Option<String>,
    ) -> Result<GuestVisitRequest, GuestRequestError> {
        let request = self
            .store
            .get(request_id)
            .await
            .map_err(|_| GuestRequestError::StorageFailure)?
            .ok_or(GuestRequestError::RequestNotFound)?;

        if !request.status.can_transition_to(RequestStatus::Rejected) {
            return Err(GuestRequestError::InvalidStateTransition);
        }

        self.store
            .update_status(request.id, RequestStatus::Rejected, reason.as_deref())
            .await
            .map_err(|_| GuestRequestError::StorageFailure)?
            .ok_or(GuestRequestError::RequestNotFound)
    }
}
