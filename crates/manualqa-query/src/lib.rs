//! Query-side pipeline for manualqa: retrieve the most relevant chunks for
//! a question and compose a grounded, cited answer.

pub mod composer;
pub mod retriever;

pub use composer::AnswerComposer;
pub use retriever::Retriever;
