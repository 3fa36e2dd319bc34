pub mod answer;
pub mod document;
pub mod message;

pub use answer::{Answer, AnswerSource, FallbackTier, ResultSource};
pub use document::{Document, DocumentId, Registration, UploadFile, PDF_MIME_TYPE};
pub use message::{Message, Role};
