use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::domain::errors::GuestRequestError;
use crate::domain::ports::GuestRequestStore;
use crate::interface_adapters::protocol::{
    ApproveGuestRequest, ErrorResponse, GuestRequestResponse, RejectGuestRequest,
    SubmitGuestRequest,
};
use crate::interface_adapters::state::{
    AppState, FilesystemAttachmentStore, PostgresAuditSink, PostgresGuestRequestStore,
    PostgresRoomStore,
};
use crate::use_cases::approve_request::ApproveRequestUseCase;
use crate::use_cases::cancel_request::CancelRequestUseCase;
use crate::use_cases::check_in::CheckInUseCase;
use crate::use_cases::check_out::CheckOutUseCase;
use crate::use_cases::reject_request::RejectRequestUseCase;
use crate::use_cases::submit_request::SubmitRequestUseCase;

type HandlerResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

// Handler for submitting a new guest-visit request.
pub async fn submit_request(
    State(state): State<AppState>,
    Json(payload): Json<SubmitGuestRequest>,
) -> HandlerResult<(StatusCode, Json<GuestRequestResponse>)> {
    let use_case = SubmitRequestUseCase {
        store: PostgresGuestRequestStore {
            db: state.db.clone(),
        },
        attachments: FilesystemAttachmentStore {
            root: state.upload_dir.clone(),
        },
        max_overnight_nights: state.max_overnight_nights,
    };

    let created = use_case.execute(payload).await.map_err(map_guest_error)?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

// Handler for fetching a single guest-visit request.
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<Json<GuestRequestResponse>> {
    let store = PostgresGuestRequestStore {
        db: state.db.clone(),
    };

    let request = store
        .get(id)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "guest request lookup failed");
            map_guest_error(GuestRequestError::StorageFailure)
        })?
        .ok_or_else(|| map_guest_error(GuestRequestError::RequestNotFound))?;

    Ok(Json(request.into()))
}

// Handler for approving a request with a staff-chosen guest room.
pub async fn approve_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ApproveGuestRequest>,
) -> HandlerResult<Json<GuestRequestResponse>> {
    // Payload completeness is checked before any lookup work.
    let room_id = payload
        .assigned_guest_room_id
        .ok_or_else(|| map_guest_error(GuestRequestError::MissingRoomAssignment))?;

    let use_case = ApproveRequestUseCase {
        requests: PostgresGuestRequestStore {
            db: state.db.clone(),
        },
        rooms: PostgresRoomStore {
            db: state.db.clone(),
        },
        audit: PostgresAuditSink {
            db: state.db.clone(),
        },
    };

    let approved = use_case
        .execute(id, room_id, payload.acting_user_id)
        .await
        .map_err(map_guest_error)?;

    tracing::info!(request_id = id, room_id, "guest request approved");

    Ok(Json(approved.into()))
}

// Handler for rejecting a request.
pub async fn reject_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RejectGuestRequest>,
) -> HandlerResult<Json<GuestRequestResponse>> {
    let use_case = RejectRequestUseCase {
        store: PostgresGuestRequestStore {
            db: state.db.clone(),
        },
    };

    let rejected = use_case
        .execute(id, payload.reason)
        .await
        .map_err(map_guest_error)?;

    Ok(Json(rejected.into()))
}

// Handler for cancelling a still-pending request.
pub async fn cancel_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<Json<GuestRequestResponse>> {
    let use_case = CancelRequestUseCase {
        store: PostgresGuestRequestStore {
            db: state.db.clone(),
        },
    };

    let cancelled = use_case.execute(id).await.map_err(map_guest_error)?;

    Ok(Json(cancelled.into()))
}

// Handler for checking a guest in.
pub async fn check_in_guest(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<Json<GuestRequestResponse>> {
    let use_case = CheckInUseCase {
        store: PostgresGuestRequestStore {
            db: state.db.clone(),
        },
    };

    let checked_in = use_case.execute(id).await.map_err(map_guest_error)?;

    Ok(Json(checked_in.into()))
}

// Handler for checking a guest out.
pub async fn check_out_guest(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<Json<GuestRequestResponse>> {
    let use_case = CheckOutUseCase {
        store: PostgresGuestRequestStore {
            db: state.db.clone(),
        },
    };

    let completed = use_case.execute(id).await.map_err(map_guest_error)?;

    Ok(Json(completed.into()))
}

// Helper to build a JSON error response.
fn error_response(
    status: StatusCode,
    kind: &'static str,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            kind,
            message: message.into(),
        }),
    )
}

// Maps domain errors onto the HTTP contract: validation 400, missing
// entities 404, availability/state conflicts 409, storage faults 500.
fn map_guest_error(err: GuestRequestError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        GuestRequestError::MissingGuestName => error_response(
            StatusCode::BAD_REQUEST,
            "missing_guest_name",
            "guest_name is required",
        ),
        GuestRequestError::InvalidDateRange => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_date_range",
            "check-out must be after check-in",
        ),
        GuestRequestError::StayTooLong { max_nights } => error_response(
            StatusCode::BAD_REQUEST,
            "stay_too_long",
            format!("maximum overnight stay is {max_nights} nights"),
        ),
        GuestRequestError::MissingIdentityProof => error_response(
            StatusCode::BAD_REQUEST,
            "missing_identity_proof",
            "identity proof is required for overnight stays",
        ),
        GuestRequestError::MissingRoomAssignment => error_response(
            StatusCode::BAD_REQUEST,
            "missing_room_assignment",
            "a guest room must be assigned",
        ),
        GuestRequestError::RequestNotFound => error_response(
            StatusCode::NOT_FOUND,
            "request_not_found",
            "guest request not found",
        ),
        GuestRequestError::RoomNotFound => error_response(
            StatusCode::NOT_FOUND,
            "room_not_found",
            "guest room not found",
        ),
        GuestRequestError::RoomInactive => error_response(
            StatusCode::CONFLICT,
            "room_inactive",
            "guest room is not active",
        ),
        GuestRequestError::RoomUnavailable => error_response(
            StatusCode::CONFLICT,
            "room_unavailable",
            "room not available for the selected dates",
        ),
        GuestRequestError::InvalidStateTransition => error_response(
            StatusCode::CONFLICT,
            "invalid_state_transition",
            "request is not in a state that allows this action",
        ),
        GuestRequestError::StorageFailure => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "storage_failure",
            "storage error",
        ),
    }
}
