mod traits;
mod openai;
mod factory;

pub use traits::{ChatClient, ChatMessage, ChatRequest, Role};
pub use openai::OpenAiClient;
pub use factory::{ClientBuilder, ClientFactory};
