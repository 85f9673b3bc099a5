use crate::domain::entities::{GuestVisitRequest, RequestStatus};
use crate::domain::errors::GuestRequestError;
use crate::domain::ports::GuestRequestStore;

// Host-side cancellation of a still-pending request.
pub struct CancelRequestUseCase<S> {
    pub store: S,
}

impl<S> CancelRequestUseCase<S>
where
    S: GuestRequestStore,
{
    pub async fn execute(&self, request_id: i64) -> Result<GuestVisitRequest, GuestRequestError> {
        let request = self
            .store
            .get(request_id)
            .await
            .map_err(|_| GuestRequestError::StorageFailure)?
            .ok_or(GuestRequestError::RequestNotFound)?;

        if !request.status.can_transition_to(RequestStatus::Cancelled) {
            return Err(GuestRequestError::InvalidStateTransition);
        }

        self.store
            .update_status(request.id, RequestStatus::Cancelled, None)
            .await
            .map_err(|_| GuestRequestError::StorageFailure)?
            .ok_or(GuestRequestError::RequestNotFound)
    }
}
