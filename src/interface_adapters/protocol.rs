use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{GuestVisitRequest, RequestStatus};

// Request payload for submitting a guest-visit request. The identity proof,
// when present, is the opaque token handed back by the upload collaborator.
#[derive(Debug, Deserialize)]
pub struct SubmitGuestRequest {
    pub host_student_id: i64,
    pub guest_name: String,
    pub guest_phone: Option<String>,
    pub guest_email: Option<String>,
    pub guest_relation: Option<String>,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub id_proof_path: Option<String>,
    pub requested_by_user_id: i64,
}

// Request payload for approving a request with a chosen guest room.
#[derive(Debug, Deserialize)]
pub struct ApproveGuestRequest {
    pub assigned_guest_room_id: Option<i64>,
    pub acting_user_id: i64,
}

// Request payload for rejecting a request.
#[derive(Debug, Deserialize)]
pub struct RejectGuestRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

// Response payload carrying one guest-visit request record.
#[derive(Debug, Serialize)]
pub struct GuestRequestResponse {
    pub id: i64,
    pub host_student_id: i64,
    pub guest_name: String,
    pub guest_phone: Option<String>,
    pub guest_email: Option<String>,
    pub guest_relation: Option<String>,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub nights_calculated: i64,
    pub id_proof_path: Option<String>,
    pub status: RequestStatus,
    pub assigned_guest_room_id: Option<i64>,
    pub fee_per_night: Option<f64>,
    pub payment_id: Option<i64>,
    pub reject_reason: Option<String>,
    pub requested_by_user_id: i64,
}

impl From<GuestVisitRequest> for GuestRequestResponse {
    fn from(request: GuestVisitRequest) -> Self {
        GuestRequestResponse {
            id: request.id,
            host_student_id: request.host_student_id,
            guest_name: request.guest_name,
            guest_phone: request.guest_phone,
            guest_email: request.guest_email,
            guest_relation: request.guest_relation,
            check_in: request.check_in,
            check_out: request.check_out,
            nights_calculated: request.nights_calculated,
            id_proof_path: request.id_proof_path,
            status: request.status,
            assigned_guest_room_id: request.assigned_guest_room_id,
            fee_per_night: request.fee_per_night,
            payment_id: request.payment_id,
            reject_reason: request.reject_reason,
            requested_by_user_id: request.requested_by_user_id,
        }
    }
}

// Error envelope: a machine-readable kind plus a human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub kind: &'static str,
    pub message: String,
}
