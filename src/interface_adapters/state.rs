use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entities::{
    GuestVisitRequest, NewGuestVisitRequest, RequestStatus, Room, RoomType,
};
use crate::domain::ports::{AttachmentStore, AuditSink, GuestRequestStore, RoomStore};

// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub max_overnight_nights: i64,
    pub upload_dir: PathBuf,
}

// Database row for a guest-visit request; status stays a plain string until
// it is parsed into the domain enum.
#[derive(sqlx::FromRow)]
struct GuestRequestRow {
    id: i64,
    host_student_id: i64,
    guest_name: String,
    guest_phone: Option<String>,
    guest_email: Option<String>,
    guest_relation: Option<String>,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    nights_calculated: i64,
    id_proof_path: Option<String>,
    status: String,
    assigned_guest_room_id: Option<i64>,
    overstay_checked: bool,
    fee_per_night: Option<f64>,
    payment_id: Option<i64>,
    reject_reason: Option<String>,
    requested_by_user_id: i64,
}

impl TryFrom<GuestRequestRow> for GuestVisitRequest {
    type Error = String;

    fn try_from(row: GuestRequestRow) -> Result<Self, Self::Error> {
        let status = RequestStatus::parse(&row.status)
            .ok_or_else(|| format!("unknown request status '{}'", row.status))?;

        Ok(GuestVisitRequest {
            id: row.id,
            host_student_id: row.host_student_id,
            guest_name: row.guest_name,
            guest_phone: row.guest_phone,
            guest_email: row.guest_email,
            guest_relation: row.guest_relation,
            check_in: row.check_in,
            check_out: row.check_out,
            nights_calculated: row.nights_calculated,
            id_proof_path: row.id_proof_path,
            status,
            assigned_guest_room_id: row.assigned_guest_room_id,
            overstay_checked: row.overstay_checked,
            fee_per_night: row.fee_per_night,
            payment_id: row.payment_id,
            reject_reason: row.reject_reason,
            requested_by_user_id: row.requested_by_user_id,
        })
    }
}

// PostgreSQL-backed store for guest-visit requests.
#[derive(Clone)]
pub struct PostgresGuestRequestStore {
    pub db: PgPool,
}

#[async_trait]
impl GuestRequestStore for PostgresGuestRequestStore {
    async fn insert(&self, request: NewGuestVisitRequest) -> Result<GuestVisitRequest, String> {
        let row = sqlx::query_as::<_, GuestRequestRow>(
            r#"
            INSERT INTO guest_visit_requests
                (host_student_id, guest_name, guest_phone, guest_email, guest_relation,
                 check_in, check_out, nights_calculated, id_proof_path, status,
                 requested_by_user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', $10)
            RETURNING id, host_student_id, guest_name, guest_phone, guest_email,
                      guest_relation, check_in, check_out, nights_calculated,
                      id_proof_path, status, assigned_guest_room_id, overstay_checked,
                      fee_per_night, payment_id, reject_reason, requested_by_user_id
            "#,
        )
        .bind(request.host_student_id)
        .bind(&request.guest_name)
        .bind(&request.guest_phone)
        .bind(&request.guest_email)
        .bind(&request.guest_relation)
        .bind(request.check_in)
        .bind(request.check_out)
        .bind(request.nights_calculated)
        .bind(&request.id_proof_path)
        .bind(request.requested_by_user_id)
        .fetch_one(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        GuestVisitRequest::try_from(row)
    }

    async fn get(&self, id: i64) -> Result<Option<GuestVisitRequest>, String> {
        let row = sqlx::query_as::<_, GuestRequestRow>(
            r#"
            SELECT id, host_student_id, guest_name, guest_phone, guest_email,
                   guest_relation, check_in, check_out, nights_calculated,
                   id_proof_path, status, assigned_guest_room_id, overstay_checked,
                   fee_per_night, payment_id, reject_reason, requested_by_user_id
            FROM guest_visit_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        row.map(GuestVisitRequest::try_from).transpose()
    }

    async fn update_status(
        &self,
        id: i64,
        status: RequestStatus,
        reject_reason: Option<&str>,
    ) -> Result<Option<GuestVisitRequest>, String> {
        let row = sqlx::query_as::<_, GuestRequestRow>(
            r#"
            UPDATE guest_visit_requests
            SET status = $2,
                reject_reason = COALESCE($3, reject_reason)
            WHERE id = $1
            RETURNING id, host_student_id, guest_name, guest_phone, guest_email,
                      guest_relation, check_in, check_out, nights_calculated,
                      id_proof_path, status, assigned_guest_room_id, overstay_checked,
                      fee_per_night, payment_id, reject_reason, requested_by_user_id
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(reject_reason)
        .fetch_optional(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        row.map(GuestVisitRequest::try_from).transpose()
    }

    async fn approve_if_room_free(
        &self,
        id: i64,
        room_id: i64,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<Option<GuestVisitRequest>, String> {
        let mut tx = self.db.begin().await.map_err(|err| err.to_string())?;

        // Concurrent approvals for the same room serialize on this row lock,
        // so the overlap test below always runs against committed truth.
        sqlx::query("SELECT id FROM rooms WHERE id = $1 FOR UPDATE")
            .bind(room_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|err| err.to_string())?;

        let row = sqlx::query_as::<_, GuestRequestRow>(
            r#"
            UPDATE guest_visit_requests
            SET status = 'approved',
                assigned_guest_room_id = $2,
                overstay_checked = TRUE
            WHERE id = $1
              AND status = 'pending'
              AND NOT EXISTS (
                  SELECT 1
                  FROM guest_visit_requests other
                  WHERE other.assigned_guest_room_id = $2
                    AND other.status IN ('approved', 'checked_in')
                    AND other.check_out > $3
                    AND other.check_in < $4
              )
            RETURNING id, host_student_id, guest_name, guest_phone, guest_email,
                      guest_relation, check_in, check_out, nights_calculated,
                      id_proof_path, status, assigned_guest_room_id, overstay_checked,
                      fee_per_night, payment_id, reject_reason, requested_by_user_id
            "#,
        )
        .bind(id)
        .bind(room_id)
        .bind(check_in)
        .bind(check_out)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|err| err.to_string())?;

        tx.commit().await.map_err(|err| err.to_string())?;

        row.map(GuestVisitRequest::try_from).transpose()
    }
}

// Database row for a room.
#[derive(sqlx::FromRow)]
struct RoomRow {
    id: i64,
    name: String,
    room_type: String,
    capacity: i64,
    active: bool,
}

// PostgreSQL-backed room lookups.
#[derive(Clone)]
pub struct PostgresRoomStore {
    pub db: PgPool,
}

#[async_trait]
impl RoomStore for PostgresRoomStore {
    async fn get(&self, id: i64) -> Result<Option<Room>, String> {
        let row = sqlx::query_as::<_, RoomRow>(
            r#"
            SELECT id, name, room_type, capacity, active
            FROM rooms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        let Some(row) = row else {
            return Ok(None);
        };
        let room_type = RoomType::parse(&row.room_type)
            .ok_or_else(|| format!("unknown room type '{}'", row.room_type))?;

        Ok(Some(Room {
            id: row.id,
            name: row.name,
            room_type,
            capacity: row.capacity,
            active: row.active,
        }))
    }
}

// PostgreSQL-backed audit sink; payloads are stored as rendered JSON text.
#[derive(Clone)]
pub struct PostgresAuditSink {
    pub db: PgPool,
}

#[async_trait]
impl AuditSink for PostgresAuditSink {
    async fn record(
        &self,
        actor_id: i64,
        action: &str,
        payload: serde_json::Value,
    ) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (user_id, action, details)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(actor_id)
        .bind(action)
        .bind(payload.to_string())
        .execute(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        Ok(())
    }
}

// Attachment discards against the upload directory the upload collaborator
// writes into.
#[derive(Clone)]
pub struct FilesystemAttachmentStore {
    pub root: PathBuf,
}

#[async_trait]
impl AttachmentStore for FilesystemAttachmentStore {
    async fn discard(&self, path: &str) -> Result<(), String> {
        // Only the final path component is honored, so a stored token can
        // never reach outside the upload directory.
        let name = Path::new(path)
            .file_name()
            .ok_or_else(|| format!("invalid attachment path '{path}'"))?;

        tokio::fs::remove_file(self.root.join(name))
            .await
            .map_err(|err| err.to_string())
    }
}
