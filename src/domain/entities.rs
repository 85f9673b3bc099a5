use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Lifecycle states of a guest-visit request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    CheckedIn,
    Completed,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
            RequestStatus::CheckedIn => "checked_in",
            RequestStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<RequestStatus> {
        match value {
            "pending" => Some(RequestStatus::Pending),
            "approved" => Some(RequestStatus::Approved),
            "rejected" => Some(RequestStatus::Rejected),
            "cancelled" => Some(RequestStatus::Cancelled),
            "checked_in" => Some(RequestStatus::CheckedIn),
            "completed" => Some(RequestStatus::Completed),
            _ => None,
        }
    }

    // Allowed lifecycle edges. Rejected, cancelled and completed are terminal.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (RequestStatus::Pending, RequestStatus::Approved)
                | (RequestStatus::Pending, RequestStatus::Rejected)
                | (RequestStatus::Pending, RequestStatus::Cancelled)
                | (RequestStatus::Approved, RequestStatus::CheckedIn)
                | (RequestStatus::CheckedIn, RequestStatus::Completed)
        )
    }
}

// One request for an external guest to stay with a host student.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuestVisitRequest {
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
    pub overstay_checked: bool,
    pub fee_per_night: Option<f64>,
    pub payment_id: Option<i64>,
    pub reject_reason: Option<String>,
    pub requested_by_user_id: i64,
}

// Field set persisted when a request is first submitted.
#[derive(Clone, Debug)]
pub struct NewGuestVisitRequest {
    pub host_student_id: i64,
    pub guest_name: String,
    pub guest_phone: Option<String>,
    pub guest_email: Option<String>,
    pub guest_relation: Option<String>,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub nights_calculated: i64,
    pub id_proof_path: Option<String>,
    pub requested_by_user_id: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Student,
    Guest,
}

impl RoomType {
    pub fn parse(value: &str) -> Option<RoomType> {
        match value {
            "student" => Some(RoomType::Student),
            "guest" => Some(RoomType::Guest),
            _ => None,
        }
    }
}

// Room record consumed by approval; owned by the wider inventory subsystem.
#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub room_type: RoomType,
    pub capacity: i64,
    pub active: bool,
}

// Number of billable nights: any started 24-hour span counts as a night.
pub fn nights_between(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> i64 {
    const SECONDS_PER_DAY: i64 = 86_400;
    // Equivalent to i64::div_ceil (unstable on this toolchain): ceil division
    // toward positive infinity; SECONDS_PER_DAY > 0 so only r > 0 rounds up.
    let secs = (check_out - check_in).num_seconds();
    let quotient = secs / SECONDS_PER_DAY;
    let remainder = secs % SECONDS_PER_DAY;
    if remainder > 0 {
        quotient + 1
    } else {
        quotient
    }
}
