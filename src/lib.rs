pub mod aggregate;
pub mod cleaner;
pub mod config;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod records;
pub mod stats;
