use crate::models::media::{PickData, PickResult};

/// Reply channel of an external pick request.
pub trait PickResponder: Send {
    fn post_result(&self, result: PickResult);

    fn post_error(&self, message: &str);
}

/// A pick request waiting for the user to capture and confirm media.
pub struct PendingPick {
    pub data: PickData,
    pub responder: Box<dyn PickResponder>,
}

impl PendingPick {
    pub fn new(data: PickData, responder: Box<dyn PickResponder>) -> Self {
        Self { data, responder }
    }
}

impl std::fmt::Debug for PendingPick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingPick").field("data", &self.data).finish_non_exhaustive()
    }
}
