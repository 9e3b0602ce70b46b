// TopicSum: multi-document extractive summarization with a hierarchical topic model
//
// This is the library root. Each module corresponds to a stage of the
// pipeline: load the corpus, fit the topic model, select and order sentences.

pub mod config;
pub mod corpus;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod status;
pub mod summarize;
