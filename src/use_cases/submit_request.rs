use crate::domain::entities::{nights_between, GuestVisitRequest, NewGuestVisitRequest};
use crate::domain::errors::GuestRequestError;
use crate::domain::ports::{AttachmentStore, GuestRequestStore};
use crate::interface_adapters::protocol::SubmitGuestRequest;

// Submission use case with injected dependencies. The overnight-nights cap
// is injected at construction rather than read from ambient configuration.
pub struct SubmitRequestUseCase<S, A> {
    pub store: S,
    pub attachments: A,
    pub max_overnight_nights: i64,
}

impl<S, A> SubmitRequestUseCase<S, A>
where
    S: GuestRequestStore,
    A: AttachmentStore,
{
    pub async fn execute(
        &self,
        payload: SubmitGuestRequest,
    ) -> Result<GuestVisitRequest, GuestRequestError> {
        if payload.guest_name.trim().is_empty() {
            return Err(GuestRequestError::MissingGuestName);
        }
        if payload.check_out <= payload.check_in {
            return Err(GuestRequestError::InvalidDateRange);
        }

        // Computed once here and stored; never recomputed after creation.
        let nights = nights_between(payload.check_in, payload.check_out);

        if nights > self.max_overnight_nights {
            // The upload collaborator has already stored the document by the
            // time submission runs, so an over-long stay must not leave an
            // orphaned file behind. Best-effort: the validation verdict wins.
            if let Some(path) = payload.id_proof_path.as_deref() {
                let _ = self.attachments.discard(path).await;
            }
            return Err(GuestRequestError::StayTooLong {
                max_nights: self.max_overnight_nights,
            });
        }

        if nights >= 1 && payload.id_proof_path.is_none() {
            return Err(GuestRequestError::MissingIdentityProof);
        }

        self.store
            .insert(NewGuestVisitRequest {
                host_student_id: payload.host_student_id,
                guest_name: payload.guest_name,
                guest_phone: payload.guest_phone,
                guest_email: payload.guest_email,
                guest_relation: payload.guest_relation,
                check_in: payload.check_in,
                check_out: payload.check_out,
                nights_calculated: nights,
                id_proof_path: payload.id_proof_path,
                requested_by_user_id: payload.requested_by_user_id,
            })
            .await
            .map_err(|_| GuestRequestError::StorageFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RequestStatus;
    use crate::use_cases::test_support::{
        ts, FailureFlags, RecordingAttachmentStore, RecordingRequestStore,
    };
    use chrono::{DateTime, Utc};

    fn payload(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> SubmitGuestRequest {
        SubmitGuestRequest {
            host_student_id: 7,
            guest_name: "Asha Verma".to_string(),
            guest_phone: Some("555-0101".to_string()),
            guest_email: Some("asha@example.com".to_string()),
            guest_relation: Some("sister".to_string()),
            check_in,
            check_out,
            id_proof_path: Some("proof-1.pdf".to_string()),
            requested_by_user_id: 7,
        }
    }

    fn use_case(
        store: RecordingRequestStore,
        attachments: RecordingAttachmentStore,
    ) -> SubmitRequestUseCase<RecordingRequestStore, RecordingAttachmentStore> {
        SubmitRequestUseCase {
            store,
            attachments,
            max_overnight_nights: 3,
        }
    }

    #[tokio::test]
    async fn when_payload_is_valid_then_request_is_stored_pending_with_computed_nights() {
        let store = RecordingRequestStore::new();
        let use_case = use_case(store.clone(), RecordingAttachmentStore::new());

        let result = use_case
            .execute(payload(ts(10, 18), ts(11, 10)))
            .await
            .expect("expected submission to succeed");

        assert_eq!(result.status, RequestStatus::Pending);
        assert_eq!(result.nights_calculated, 1);
        assert_eq!(result.assigned_guest_room_id, None);
        assert!(!result.overstay_checked);

        let saved = store
            .get_test_request(result.id)
            .expect("expected request to be stored");
        assert_eq!(saved.guest_name, "Asha Verma");
        assert_eq!(saved.nights_calculated, 1);
        assert_eq!(saved.requested_by_user_id, 7);
    }

    #[tokio::test]
    async fn when_check_out_equals_check_in_then_returns_invalid_date_range_and_stores_nothing() {
        let store = RecordingRequestStore::new();
        let use_case = use_case(store.clone(), RecordingAttachmentStore::new());

        let result = use_case.execute(payload(ts(10, 18), ts(10, 18))).await;

        assert!(matches!(result, Err(GuestRequestError::InvalidDateRange)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn when_check_out_is_before_check_in_then_returns_invalid_date_range() {
        let use_case = use_case(RecordingRequestStore::new(), RecordingAttachmentStore::new());

        let result = use_case.execute(payload(ts(11, 10), ts(10, 18))).await;

        assert!(matches!(result, Err(GuestRequestError::InvalidDateRange)));
    }

    #[tokio::test]
    async fn when_guest_name_is_blank_then_returns_missing_guest_name() {
        let use_case = use_case(RecordingRequestStore::new(), RecordingAttachmentStore::new());
        let mut request = payload(ts(10, 18), ts(11, 10));
        request.guest_name = "   ".to_string();

        let result = use_case.execute(request).await;

        assert!(matches!(result, Err(GuestRequestError::MissingGuestName)));
    }

    #[tokio::test]
    async fn when_stay_is_five_nights_then_returns_stay_too_long_and_discards_attachment() {
        let store = RecordingRequestStore::new();
        let attachments = RecordingAttachmentStore::new();
        let use_case = use_case(store.clone(), attachments.clone());

        let result = use_case.execute(payload(ts(10, 9), ts(15, 9))).await;

        assert!(matches!(
            result,
            Err(GuestRequestError::StayTooLong { max_nights: 3 })
        ));
        assert_eq!(store.len(), 0);
        assert_eq!(attachments.discarded(), vec!["proof-1.pdf".to_string()]);
    }

    #[tokio::test]
    async fn when_stay_is_too_long_without_attachment_then_nothing_is_discarded() {
        let attachments = RecordingAttachmentStore::new();
        let use_case = use_case(RecordingRequestStore::new(), attachments.clone());
        let mut request = payload(ts(10, 9), ts(15, 9));
        request.id_proof_path = None;

        let result = use_case.execute(request).await;

        assert!(matches!(result, Err(GuestRequestError::StayTooLong { .. })));
        assert!(attachments.discarded().is_empty());
    }

    #[tokio::test]
    async fn when_attachment_discard_fails_then_stay_too_long_is_still_returned() {
        let use_case = use_case(
            RecordingRequestStore::new(),
            RecordingAttachmentStore::failing(),
        );

        let result = use_case.execute(payload(ts(10, 9), ts(15, 9))).await;

        assert!(matches!(result, Err(GuestRequestError::StayTooLong { .. })));
    }

    #[tokio::test]
    async fn when_stay_is_exactly_the_cap_then_submission_succeeds() {
        let use_case = use_case(RecordingRequestStore::new(), RecordingAttachmentStore::new());

        let result = use_case
            .execute(payload(ts(10, 9), ts(13, 9)))
            .await
            .expect("expected a three-night stay to pass the cap");

        assert_eq!(result.nights_calculated, 3);
    }

    #[tokio::test]
    async fn when_stay_is_one_second_over_the_cap_then_returns_stay_too_long() {
        let use_case = use_case(RecordingRequestStore::new(), RecordingAttachmentStore::new());

        let result = use_case.execute(payload(ts(10, 9), ts(13, 10))).await;

        assert!(matches!(
            result,
            Err(GuestRequestError::StayTooLong { max_nights: 3 })
        ));
    }

    #[tokio::test]
    async fn when_overnight_stay_has_no_identity_proof_then_returns_missing_identity_proof() {
        let store = RecordingRequestStore::new();
        let use_case = use_case(store.clone(), RecordingAttachmentStore::new());
        let mut request = payload(ts(10, 18), ts(11, 10));
        request.id_proof_path = None;

        let result = use_case.execute(request).await;

        assert!(matches!(
            result,
            Err(GuestRequestError::MissingIdentityProof)
        ));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn when_store_insert_fails_then_returns_storage_failure() {
        let store = RecordingRequestStore::new().with_failures(FailureFlags {
            insert: true,
            ..Default::default()
        });
        let use_case = use_case(store, RecordingAttachmentStore::new());

        let result = use_case.execute(payload(ts(10, 18), ts(11, 10))).await;

        assert!(matches!(result, Err(GuestRequestError::StorageFailure)));
    }
}
