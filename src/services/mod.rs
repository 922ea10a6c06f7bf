pub mod audit;
pub mod extractor;
pub mod llm;
pub mod pipeline;

pub use audit::{AuditLog, JsonlAuditLog};
pub use extractor::{DocumentExtractor, TextExtractor};
pub use llm::{Matcher, OllamaMatcher, OllamaSummarizer, Summarizer};
pub use pipeline::RequestPipeline;
