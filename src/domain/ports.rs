use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{GuestVisitRequest, NewGuestVisitRequest, RequestStatus, Room};

// Port for guest-visit request persistence used by the lifecycle use cases.
#[async_trait]
pub trait GuestRequestStore: Send + Sync {
    async fn insert(&self, request: NewGuestVisitRequest) -> Result<GuestVisitRequest, String>;

    async fn get(&self, id: i64) -> Result<Option<GuestVisitRequest>, String>;

    // Plain status transition; the reject reason rides along when present.
    async fn update_status(
        &self,
        id: i64,
        status: RequestStatus,
        reject_reason: Option<&str>,
    ) -> Result<Option<GuestVisitRequest>, String>;

    // Conditional approval write: succeeds only while the request is still
    // pending and no approved/checked-in stay on the room overlaps the
    // half-open interval [check_in, check_out). Returns None on conflict.
    // Implementations must make the overlap test and the write one atomic
    // unit against concurrent approvals of the same room.
    async fn approve_if_room_free(
        &self,
        id: i64,
        room_id: i64,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<Option<GuestVisitRequest>, String>;
}

// Port for room lookups during approval.
#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<Room>, String>;
}

// Port for the append-only audit sink.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(
        &self,
        actor_id: i64,
        action: &str,
        payload: serde_json::Value,
    ) -> Result<(), String>;
}

// Port for discarding identity-proof attachments the upload collaborator
// already stored, so rejected submissions leave no orphaned files.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn discard(&self, path: &str) -> Result<(), String>;
}
