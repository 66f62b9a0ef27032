pub mod http;
pub mod llm;

pub use http::HttpGateway;
pub use llm::LlmGateway;
