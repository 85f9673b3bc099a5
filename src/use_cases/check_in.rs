use crate::domain::entities::{GuestVisitRequest, RequestStatus};
use crate::domain::errors::GuestRequestError;
use crate::domain::ports::GuestRequestStore;

// Check-in use case. Only an approved request may check in; the permissive
// pending-to-checked-in path is rejected here.
pub struct CheckInUseCase<S> {
    pub store: S,
}

impl<S> CheckInUseCase<S>
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

        if !request.status.can_transition_to(RequestStatus::CheckedIn) {
            return Err(GuestRequestError::InvalidStateTransition);
        }

        self.store
            .update_status(request.id, RequestStatus::CheckedIn, None)
            .await
            .map_err(|_| GuestRequestError::StorageFailure)?
            .ok_or(GuestRequestError::RequestNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{request_fixture, FailureFlags, RecordingRequestStore};

    #[tokio::test]
    async fn when_request_is_approved_then_guest_is_checked_in() {
        let store = RecordingRequestStore::new();
        store.insert_test_request(request_fixture(1, RequestStatus::Approved));
        let use_case = CheckInUseCase {
            store: store.clone(),
        };

        let result = use_case
            .execute(1)
            .await
            .expect("expected check-in to succeed");

        assert_eq!(result.status, RequestStatus::CheckedIn);
        let saved = store.get_test_request(1).expect("request still stored");
        assert_eq!(saved.status, RequestStatus::CheckedIn);
    }

    #[tokio::test]
    async fn when_request_is_still_pending_then_returns_invalid_state_transition() {
        let store = RecordingRequestStore::new();
        store.insert_test_request(request_fixture(1, RequestStatus::Pending));
        let use_case = CheckInUseCase {
            store: store.clone(),
        };

        let result = use_case.execute(1).await;

        assert!(matches!(
            result,
            Err(GuestRequestError::InvalidStateTransition)
        ));
        let saved = store.get_test_request(1).expect("request still stored");
        assert_eq!(saved.status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn when_request_does_not_exist_then_returns_request_not_found() {
        let use_case = CheckInUseCase {
            store: RecordingRequestStore::new(),
        };

        let result = use_case.execute(1).await;

        assert!(matches!(result, Err(GuestRequestError::RequestNotFound)));
    }

    #[tokio::test]
    async fn when_request_is_rejected_then_returns_invalid_state_transition() {
        let store = RecordingRequestStore::new();
        store.insert_test_request(request_fixture(1, RequestStatus::Rejected));
        let use_case = CheckInUseCase { store };

        let result = use_case.execute(1).await;

        assert!(matches!(
            result,
            Err(GuestRequestError::InvalidStateTransition)
        ));
    }

    #[tokio::test]
    async fn when_store_get_fails_then_returns_storage_failure() {
        let use_case = CheckInUseCase {
            store: RecordingRequestStore::new().with_failures(FailureFlags {
                get: true,
                ..Default::default()
            }),
        };

        let result = use_case.execute(1).await;

        assert!(matches!(result, Err(GuestRequestError::StorageFailure)));
    }
}
