use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::entities::{
    GuestVisitRequest, NewGuestVisitRequest, RequestStatus, Room, RoomType,
};
use crate::domain::ports::{AttachmentStore, AuditSink, GuestRequestStore, RoomStore};

// Timestamp helper anchored in January 2024 so interval assertions read as
// calendar dates.
pub(crate) fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0)
        .single()
        .expect("valid test timestamp")
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub insert: bool,
    pub get: bool,
    pub update: bool,
    pub approve: bool,
}

type RequestTable = Arc<Mutex<HashMap<i64, GuestVisitRequest>>>;

// In-memory request store mirroring the Postgres adapter's contract,
// including the atomic approve-if-free write (the whole table sits behind
// one mutex, so the overlap check and the update are a single unit).
#[derive(Clone)]
pub(crate) struct RecordingRequestStore {
    requests: RequestTable,
    next_id: Arc<Mutex<i64>>,
    failures: FailureFlags,
}

impl RecordingRequestStore {
    pub(crate) fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(1)),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_request(&self, request: GuestVisitRequest) {
        let mut guard = self.requests.lock().expect("requests mutex poisoned");
        guard.insert(request.id, request);
    }

    pub(crate) fn get_test_request(&self, id: i64) -> Option<GuestVisitRequest> {
        let guard = self.requests.lock().expect("requests mutex poisoned");
        guard.get(&id).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        let guard = self.requests.lock().expect("requests mutex poisoned");
        guard.len()
    }
}

// Request fixture in the given status; interval 2024-01-10 18:00 → 01-11 10:00.
pub(crate) fn request_fixture(id: i64, status: RequestStatus) -> GuestVisitRequest {
    GuestVisitRequest {
        id,
        host_student_id: 7,
        guest_name: "Asha Verma".to_string(),
        guest_phone: Some("555-0101".to_string()),
        guest_email: None,
        guest_relation: Some("sister".to_string()),
        check_in: ts(10, 18),
        check_out: ts(11, 10),
        nights_calculated: 1,
        id_proof_path: Some("proof-1.pdf".to_string()),
        status,
        assigned_guest_room_id: None,
        overstay_checked: false,
        fee_per_night: None,
        payment_id: None,
        reject_reason: None,
        requested_by_user_id: 7,
    }
}

#[async_trait]
impl GuestRequestStore for RecordingRequestStore {
    async fn insert(&self, request: NewGuestVisitRequest) -> Result<GuestVisitRequest, String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let id = {
            let mut guard = self.next_id.lock().expect("next_id mutex poisoned");
            let id = *guard;
            *guard += 1;
            id
        };
        let record = GuestVisitRequest {
            id,
            host_student_id: request.host_student_id,
            guest_name: request.guest_name,
            guest_phone: request.guest_phone,
            guest_email: request.guest_email,
            guest_relation: request.guest_relation,
            check_in: request.check_in,
            check_out: request.check_out,
            nights_calculated: request.nights_calculated,
            id_proof_path: request.id_proof_path,
            status: RequestStatus::Pending,
            assigned_guest_room_id: None,
            overstay_checked: false,
            fee_per_night: None,
            payment_id: None,
            reject_reason: None,
            requested_by_user_id: request.requested_by_user_id,
        };

        let mut guard = self.requests.lock().expect("requests mutex poisoned");
        guard.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Option<GuestVisitRequest>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.requests.lock().expect("requests mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: i64,
        status: RequestStatus,
        reject_reason: Option<&str>,
    ) -> Result<Option<GuestVisitRequest>, String> {
        if self.failures.update {
            return Err("update failed".to_string());
        }

        let mut guard = self.requests.lock().expect("requests mutex poisoned");
        let Some(record) = guard.get_mut(&id) else {
            return Ok(None);
        };
        record.status = status;
        if let Some(reason) = reject_reason {
            record.reject_reason = Some(reason.to_string());
        }
        Ok(Some(record.clone()))
    }

    async fn approve_if_room_free(
        &self,
        id: i64,
        room_id: i64,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<Option<GuestVisitRequest>, String> {
        if self.failures.approve {
            return Err("approve failed".to_string());
        }

        let mut guard = self.requests.lock().expect("requests mutex poisoned");

        let overlaps = guard.values().any(|other| {
            other.id != id
                && other.assigned_guest_room_id == Some(room_id)
                && matches!(
                    other.status,
                    RequestStatus::Approved | RequestStatus::CheckedIn
                )
                && other.check_out > check_in
                && other.check_in < check_out
        });
        if overlaps {
            return Ok(None);
        }

        let Some(record) = guard.get_mut(&id) else {
            return Ok(None);
        };
        if record.status != RequestStatus::Pending {
            return Ok(None);
        }
        record.status = RequestStatus::Approved;
        record.assigned_guest_room_id = Some(room_id);
        record.overstay_checked = true;
        Ok(Some(record.clone()))
    }
}

#[derive(Clone)]
pub(crate) struct RecordingRoomStore {
    rooms: Arc<Mutex<HashMap<i64, Room>>>,
    should_fail: bool,
}

impl RecordingRoomStore {
    pub(crate) fn new() -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            should_fail: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            should_fail: true,
        }
    }

    pub(crate) fn with_room(self, room: Room) -> Self {
        {
            let mut guard = self.rooms.lock().expect("rooms mutex poisoned");
            guard.insert(room.id, room);
        }
        self
    }
}

pub(crate) fn guest_room(id: i64) -> Room {
    Room {
        id,
        name: format!("G-{id}"),
        room_type: RoomType::Guest,
        capacity: 2,
        active: true,
    }
}

#[async_trait]
impl RoomStore for RecordingRoomStore {
    async fn get(&self, id: i64) -> Result<Option<Room>, String> {
        if self.should_fail {
            return Err("room lookup failed".to_string());
        }

        let guard = self.rooms.lock().expect("rooms mutex poisoned");
        Ok(guard.get(&id).cloned())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RecordedAudit {
    pub actor_id: i64,
    pub action: String,
    pub payload: serde_json::Value,
}

#[derive(Clone)]
pub(crate) struct RecordingAuditSink {
    entries: Arc<Mutex<Vec<RecordedAudit>>>,
    should_fail: bool,
}

impl RecordingAuditSink {
    pub(crate) fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            should_fail: true,
        }
    }

    pub(crate) fn entries(&self) -> Vec<RecordedAudit> {
        let guard = self.entries.lock().expect("audit mutex poisoned");
        guard.clone()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn record(
        &self,
        actor_id: i64,
        action: &str,
        payload: serde_json::Value,
    ) -> Result<(), String> {
        if self.should_fail {
            return Err("audit write failed".to_string());
        }

        let mut guard = self.entries.lock().expect("audit mutex poisoned");
        guard.push(RecordedAudit {
            actor_id,
            action: action.to_string(),
            payload,
        });
        Ok(())
    }
}

#[derive(Clone)]
pub(crate) struct RecordingAttachmentStore {
    discarded: Arc<Mutex<Vec<String>>>,
    should_fail: bool,
}

impl RecordingAttachmentStore {
    pub(crate) fn new() -> Self {
        Self {
            discarded: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            discarded: Arc::new(Mutex::new(Vec::new())),
            should_fail: true,
        }
    }

    pub(crate) fn discarded(&self) -> Vec<String> {
        let guard = self.discarded.lock().expect("discarded mutex poisoned");
        guard.clone()
    }
}

#[async_trait]
impl AttachmentStore for RecordingAttachmentStore {
    async fn discard(&self, path: &str) -> Result<(), String> {
        if self.should_fail {
            return Err("discard failed".to_string());
        }

        let mut guard = self.discarded.lock().expect("discarded mutex poisoned");
        guard.push(path.to_string());
        Ok(())
    }
}
