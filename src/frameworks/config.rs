use std::{env, path::PathBuf};

// Runtime/service settings sourced from the environment (dotenv is loaded
// by the server before these run).

pub fn http_port() -> u16 {
    env::var("GUEST_SERVER_PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000)
}

// Hard cap on overnight nights per guest-visit request.
pub fn max_overnight_nights() -> i64 {
    env::var("MAX_OVERNIGHT_NIGHTS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3)
}

// Directory the upload collaborator stores identity proofs in; discards of
// rejected submissions resolve against it.
pub fn upload_dir() -> PathBuf {
    env::var("FILE_UPLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./uploads"))
}
