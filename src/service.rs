//! Running a role against the model backend.

use crate::config::RunConfig;
use crate::llm::{ChatRequest, Completion, HttpCompletion, Message};
use crate::role::AgentRole;
use crate::step::StepError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

/// What a role call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub final_output: String,
    /// Tools the model invoked on the way, in call order.
    pub tools_invoked: Vec<String>,
}

/// Run one role to completion and hand back its final text.
pub trait ExecutionService {
    fn run_sync(
        &mut self,
        role: &AgentRole,
        input: &str,
        config: &RunConfig,
    ) -> Result<RunResult, StepError>;
}

/// [`ExecutionService`] backed by a chat-completions endpoint.
///
/// Each call is a fresh conversation of the role's instructions and the input.
/// Whenever the model asks for tools they are resolved through the role's
/// registry and the conversation is sent again, up to
/// [`RunConfig::max_tool_rounds`] times.
pub struct ChatService<C: Completion> {
    completion: C,
    rng: StdRng,
}

impl ChatService<HttpCompletion> {
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(HttpCompletion::new(config), config.seed)
    }
}

impl<C: Completion> ChatService<C> {
    pub fn new(completion: C, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { completion, rng }
    }

    pub fn completion(&self) -> &C {
        &self.completion
    }
}

impl<C: Completion> ExecutionService for ChatService<C> {
    fn run_sync(
        &mut self,
        role: &AgentRole,
        input: &str,
        config: &RunConfig,
    ) -> Result<RunResult, StepError> {
        info!(role = role.name, model = %config.model, "running role");

        let tools = role.tool_specs();
        let mut messages = vec![Message::system(role.instructions), Message::user(input)];
        let mut tools_invoked = Vec::new();

        for round in 0..=config.max_tool_rounds {
            let request = ChatRequest {
                model: &config.model,
                messages: &messages,
                tools: &tools,
            };
            let reply = self.completion.complete(&request)?.into_message()?;

            if reply.tool_calls.is_empty() {
                return Ok(RunResult {
                    final_output: reply.content.unwrap_or_default(),
                    tools_invoked,
                });
            }
            if round == config.max_tool_rounds {
                break;
            }

            let calls = reply.tool_calls.clone();
            messages.push(reply);
            for call in calls {
                let name = call.function.name;
                let output = role
                    .tools
                    .invoke(&name, &mut self.rng)
                    .unwrap_or_else(|| format!("unknown tool: {name}"));
                debug!(role = role.name, tool = %name, %output, "tool called");

                messages.push(Message::tool_result(call.id, output));
                tools_invoked.push(name);
            }
        }

        Err(StepError::invalid(format!(
            "{} still calling tools after {} rounds",
            role.name, config.max_tool_rounds
        )))
    }
}
