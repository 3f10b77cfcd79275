//! Galactic Quest, a terminal space adventure narrated by three LLM agent roles.
//!
//! Each turn runs a small [`Workflow`] of [`Step`]s: the narrator answers the
//! player's choice, the alien role resolves an encounter (and may roll dice or
//! draw a random space event through its [`tools`]), and the reward role hands
//! out loot. Steps talk to the model through an [`ExecutionService`] held in
//! the shared [`Ctx`], and signal control flow with [`Outcome`]s.
//!
//! # Quick start
//!
//! ```rust
//! use galactic_quest::tools::{ToolRegistry, ROLL_DICE, SPACE_EVENT};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let tools = ToolRegistry::new().register(ROLL_DICE).register(SPACE_EVENT);
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let roll = tools.invoke("roll_dice", &mut rng).unwrap();
//! assert!(roll.starts_with("🎲 Dice Roll: "));
//! assert!(tools.invoke("hyperdrive", &mut rng).is_none());
//! ```

pub mod config;
pub mod console;
mod ctx;
pub mod game;
pub mod llm;
pub mod role;
mod runner;
pub mod service;
mod step;
pub mod tools;
mod workflow;

pub use config::{ConfigError, RunConfig};
pub use console::{Console, StdConsole};
pub use ctx::Ctx;
pub use game::{Game, PlaySummary, Turn};
pub use role::AgentRole;
pub use runner::{ErrorEvent, Runner, StepEvent};
pub use service::{ChatService, ExecutionService, RunResult};
pub use step::{Outcome, RetryHint, Step, StepError, StepResult};
pub use workflow::Workflow;
