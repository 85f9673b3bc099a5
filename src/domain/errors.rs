// Domain-level errors for the guest-visit workflows.
#[derive(Debug, PartialEq, Eq)]
pub enum GuestRequestError {
    MissingGuestName,
    InvalidDateRange,
    StayTooLong { max_nights: i64 },
    MissingIdentityProof,
    MissingRoomAssignment,
    RequestNotFound,
    RoomNotFound,
    RoomInactive,
    RoomUnavailable,
    InvalidStateTransition,
    StorageFailure,
}
