pub mod contracts;
pub mod gateway;
pub mod groq;
pub mod observability;
pub mod prompts;
pub mod validation;

pub use contracts::{AnecdoteReply, reply_schema};
pub use gateway::{
    LlmGateway, LlmGatewayError, LlmGatewayFuture, LlmGatewayRequest, LlmGatewayResponse,
    LlmTokenUsage,
};
pub use groq::{GroqConfigError, GroqGateway, GroqGatewayConfig};
pub use observability::{LlmTelemetryEvent, generate_with_telemetry};
pub use prompts::anecdote_prompt;
pub use validation::{
    AnecdoteParseError, extract_embedded_object, parse_anecdote_reply, validate_anecdote_value,
};
