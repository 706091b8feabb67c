//! Canned `ChatModel` implementations for tests.

use ai_client::ChatModel;
use anyhow::{anyhow, Result};

/// Replies with a fixed string, or fails with a fixed message.
pub struct StubModel {
    reply: Result<String, String>,
}

impl StubModel {
    pub fn replying(reply: &str) -> Self {
        StubModel {
            reply: Ok(reply.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        StubModel {
            reply: Err(message.to_string()),
        }
    }
}

impl ChatModel for StubModel {
    fn chat(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(message) => Err(anyhow!("{message}")),
        }
    }
}
