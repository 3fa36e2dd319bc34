pub mod request_lifecycle;
pub mod session;
pub mod session_store;

pub use request_lifecycle::{
    IgnoreReason, RequestLifecycleController, SubmitOutcome, UploadOutcome,
    GENERIC_FAILURE_MESSAGE,
};
pub use session::{LifecycleState, Session};
pub use session_store::SessionStore;
