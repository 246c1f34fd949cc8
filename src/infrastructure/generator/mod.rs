//! SQL generator implementations

mod openai;

pub use openai::OpenAiSqlGenerator;
