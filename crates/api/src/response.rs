use serde::Serialize;

/// Standard success envelope: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}
