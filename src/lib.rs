pub mod feed;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod stats;
pub mod wire;
