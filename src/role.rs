//! The three agent roles a turn is played through.

use crate::llm::ToolSpec;
use crate::tools::{ROLL_DICE, SPACE_EVENT, ToolRegistry};

/// A named bundle of instructions and tools submitted to the execution
/// service. Built once at startup and never changed.
#[derive(Debug, Clone)]
pub struct AgentRole {
    pub name: &'static str,
    pub instructions: &'static str,
    pub tools: ToolRegistry,
}

impl AgentRole {
    pub fn new(name: &'static str, instructions: &'static str) -> Self {
        Self {
            name,
            instructions,
            tools: ToolRegistry::new(),
        }
    }

    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    /// The role's tools in the shape the model expects.
    pub fn tool_specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(ToolSpec::from).collect()
    }
}

pub fn narrator() -> AgentRole {
    AgentRole::new(
        "NarratorAgent",
        "Narrate the space adventure in an engaging way. \
         Ask the player for choices and guide them into the story.",
    )
}

pub fn alien() -> AgentRole {
    AgentRole::new(
        "AlienAgent",
        "Handle alien encounters and unexpected dangers. \
         Make use of dice rolls and random space events to shape the outcome.",
    )
    .with_tools(ToolRegistry::new().register(ROLL_DICE).register(SPACE_EVENT))
}

pub fn reward() -> AgentRole {
    AgentRole::new(
        "RewardAgent",
        "Grant futuristic rewards, spaceship upgrades, or cosmic treasures \
         to the player after surviving encounters.",
    )
}
