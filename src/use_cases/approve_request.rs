use serde_json::json;

use crate::domain::entities::{GuestVisitRequest, RequestStatus, RoomType};
use crate::domain::errors::GuestRequestError;
use crate::domain::ports::{AuditSink, GuestRequestStore, RoomStore};

// Audit action name recorded for every successful approval.
pub const APPROVE_AUDIT_ACTION: &str = "GUEST_REQUEST_APPROVED";

// Approval use case with injected dependencies.
pub struct ApproveRequestUseCase<S, R, A> {
    pub requests: S,
    pub rooms: R,
    pub audit: A,
}

impl<S, R, A> ApproveRequestUseCase<S, R, A>
where
    S: GuestRequestStore,
    R: RoomStore,
    A: AuditSink,
{
    pub async fn execute(
        &self,
        request_id: i64,
        room_id: i64,
        actor_id: i64,
    ) -> Result<GuestVisitRequest, GuestRequestError> {
        let request = self
            .requests
            .get(request_id)
            .await
            .map_err(|_| GuestRequestError::StorageFailure)?
            .ok_or(GuestRequestError::RequestNotFound)?;

        if !request.status.can_transition_to(RequestStatus::Approved) {
            return Err(GuestRequestError::InvalidStateTransition);
        }

        let room = self
            .rooms
            .get(room_id)
            .await
            .map_err(|_| GuestRequestError::StorageFailure)?
            .ok_or(GuestRequestError::RoomNotFound)?;

        // Student rooms are invisible to this flow, matching the guest-only
        // room lookup of the booking surface.
        if room.room_type != RoomType::Guest {
            return Err(GuestRequestError::RoomNotFound);
        }
        if !room.active {
            return Err(GuestRequestError::RoomInactive);
        }

        // The store performs the half-open overlap test and the status write
        // as one atomic unit, so two concurrent approvals for the same room
        // cannot both claim an overlapping interval.
        let approved = self
            .requests
            .approve_if_room_free(request.id, room.id, request.check_in, request.check_out)
            .await
            .map_err(|_| GuestRequestError::StorageFailure)?
            .ok_or(GuestRequestError::RoomUnavailable)?;

        // Best-effort audit write; the approval stands even if the sink fails.
        let _ = self
            .audit
            .record(
                actor_id,
                APPROVE_AUDIT_ACTION,
                json!({ "request_id": approved.id, "room_id": room.id }),
            )
            .await;

        Ok(approved)
    }
}
