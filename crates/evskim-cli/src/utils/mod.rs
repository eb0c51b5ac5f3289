pub mod discovery;
pub mod parser;
pub mod progress;
