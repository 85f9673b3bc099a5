use crate::domain::entities::{GuestVisitRequest, RequestStatus};
use crate::domain::errors::GuestRequestError;
use crate::domain::ports::GuestRequestStore;

// Check-out use case: a checked-in stay completes, and completed is terminal.
pub struct CheckOutUseCase<S> {
    pub store: S,
}

impl<S> CheckOutUseCase<S>
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

        if !request.status.can_transition_to(RequestStatus::Completed) {
            return Err(GuestRequestError::InvalidStateTransition);
        }

        self.store
            .update_status(request.id, RequestStatus::Completed, None)
            .await
            .map_err(|_| GuestRequestError::StorageFailure)?
            .ok_or(GuestRequestError::RequestNotFound)
    }
}
