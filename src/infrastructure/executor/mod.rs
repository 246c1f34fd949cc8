//! Query executor implementations

mod http;

pub use http::HttpQueryExecutor;
