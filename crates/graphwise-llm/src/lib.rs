pub mod types;
pub mod traits;
pub mod streaming;
pub mod buffer_utils;
pub mod openai;
pub mod config;
pub mod data_stream;

pub use traits::{
    ChatClient,
    ChatRequest, ChatResponse, ChatOptions,
    TokenUsage,
};

pub use streaming::StreamEvent;
pub use buffer_utils::CircularLineBuffer;
pub use openai::OpenAIClient;
pub use config::{ClientFactory, OpenAIConfig, ProviderConfig};
pub use data_stream::{
    decode_summary_stream, decode_text_part, encode_finish_part, encode_text_part,
    DecodeError, SummaryDecoder,
};
pub use types::{Message, Content, ContentPart};
