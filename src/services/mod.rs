pub mod answer_resolver;
pub mod fallback_answers;
pub mod unmatched_writer;
pub mod upload_registrar;

pub use answer_resolver::AnswerResolver;
pub use unmatched_writer::UnmatchedWriter;
pub use upload_registrar::UploadRegistrar;
