pub mod qa_client;

pub use qa_client::{AskResponse, HttpQaClient, RemoteQaService, UploadResponse};
