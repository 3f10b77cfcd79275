//! Callables the execution service may hand to the model.

pub mod dice;
pub mod space_event;

pub use dice::{roll, roll_dice};
pub use space_event::{SPACE_EVENTS, generate_space_event};

use rand::RngCore;
use std::collections::BTreeMap;

/// Signature every tool shares: draw from the service's RNG, describe the result.
pub type ToolFn = fn(&mut dyn RngCore) -> String;

/// A named, zero-argument callable with a description the model reads.
#[derive(Clone, Copy)]
pub struct Tool {
    pub name: &'static str,
    pub description: &'static str,
    call: ToolFn,
}

impl Tool {
    pub const fn new(name: &'static str, description: &'static str, call: ToolFn) -> Self {
        Self {
            name,
            description,
            call,
        }
    }

    pub fn call(&self, rng: &mut dyn RngCore) -> String {
        (self.call)(rng)
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool").field("name", &self.name).finish()
    }
}

pub const ROLL_DICE: Tool = Tool::new("roll_dice", dice::ROLL_DICE_DESCRIPTION, roll_dice);

pub const SPACE_EVENT: Tool = Tool::new(
    "generate_space_event",
    space_event::SPACE_EVENT_DESCRIPTION,
    generate_space_event,
);

/// Tools a role exposes, looked up by name when the model asks for one.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. A later tool with the same name replaces the earlier one.
    pub fn register(mut self, tool: Tool) -> Self {
        self.tools.insert(tool.name, tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Call the tool named `name`, or `None` if this registry doesn't have it.
    pub fn invoke(&self, name: &str, rng: &mut dyn RngCore) -> Option<String> {
        self.get(name).map(|tool| tool.call(rng))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
