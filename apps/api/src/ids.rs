use uuid::Uuid;

/// Fresh opaque identifier. Used to tag request spans.
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}
