// Document comparison and keyword-gap analysis engine.
// Everything under this module is synchronous and free of I/O; external collaborators
// live in `collaborators` and are consulted by the handlers.

pub mod config;
pub mod error;
pub mod feedback;
pub mod fuzzy;
pub mod gaps;
pub mod handlers;
pub mod keywords;
pub mod lexicon;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod similarity;
pub mod stopwords;
pub mod strategy;
