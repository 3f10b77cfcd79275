//! Galactic Quest: the turn stages and the loop that plays them.
//!
//! A turn asks for the player's choice, then runs three stages in order
//! (narrate, encounter, reward) through a [`Workflow`], and finally asks
//! whether to play again. The encounter and reward stages are fed fixed
//! trigger lines regardless of what the narrator said.

use crate::config::RunConfig;
use crate::console::Console;
use crate::ctx::Ctx;
use crate::role::{self, AgentRole};
use crate::runner::Runner;
use crate::service::ExecutionService;
use crate::step::{Outcome, RetryHint, Step, StepError, StepResult};
use crate::workflow::Workflow;
use tracing::info;

pub const WELCOME: &str = "\n🪐 Welcome to Galactic Quest!\n";
pub const CHOICE_PROMPT: &str = "🌌 Do you explore a new planet or stay in orbit? → ";
pub const CONTINUE_PROMPT: &str = "\n🔁 Do you want another space adventure? (yes/no): ";
pub const FAREWELL: &str = "\n🙏 Thanks for playing Galactic Quest! 🚀✨";

pub const ENCOUNTER_TRIGGER: &str = "Alien encounter";
pub const REWARD_TRIGGER: &str = "Give futuristic reward";

/// Everything produced during one turn. Each field is written once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Turn {
    pub choice: String,
    pub story: Option<String>,
    pub encounter: Option<String>,
    pub reward: Option<String>,
}

impl Turn {
    pub fn new(choice: impl Into<String>) -> Self {
        Self {
            choice: choice.into(),
            ..Self::default()
        }
    }

    fn slot(&mut self, kind: StageKind) -> &mut Option<String> {
        match kind {
            StageKind::Narrate => &mut self.story,
            StageKind::Encounter => &mut self.encounter,
            StageKind::Reward => &mut self.reward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Narrate,
    Encounter,
    Reward,
}

impl StageKind {
    pub fn step_name(self) -> &'static str {
        match self {
            StageKind::Narrate => "narrate",
            StageKind::Encounter => "encounter",
            StageKind::Reward => "reward",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StageKind::Narrate => "📖 Story:",
            StageKind::Encounter => "👽 Encounter:",
            StageKind::Reward => "🛸 Reward:",
        }
    }

    /// What the role is asked: the player's own words for narration, a
    /// fixed trigger for the rest.
    fn input<'a>(self, turn: &'a Turn) -> &'a str {
        match self {
            StageKind::Narrate => &turn.choice,
            StageKind::Encounter => ENCOUNTER_TRIGGER,
            StageKind::Reward => REWARD_TRIGGER,
        }
    }
}

/// Runs one role, shows its text under the stage label and stores it.
pub struct Stage {
    kind: StageKind,
    role: AgentRole,
}

impl Stage {
    pub fn new(kind: StageKind, role: AgentRole) -> Self {
        Self { kind, role }
    }

    pub fn narrate() -> Self {
        Self::new(StageKind::Narrate, role::narrator())
    }

    pub fn encounter() -> Self {
        Self::new(StageKind::Encounter, role::alien())
    }

    pub fn reward() -> Self {
        Self::new(StageKind::Reward, role::reward())
    }
}

impl Step<Turn> for Stage {
    fn name(&self) -> &'static str {
        self.kind.step_name()
    }

    fn run(&mut self, mut turn: Turn, ctx: &mut Ctx) -> StepResult<Turn> {
        let result = match ctx.run_role(&self.role, self.kind.input(&turn)) {
            Ok(result) => result,
            Err(StepError::Transient(reason)) => {
                let hint = RetryHint::new(reason).after(ctx.config().retry_backoff);
                return Ok((turn, Outcome::Retry(hint)));
            }
            Err(err) => return Err(err),
        };

        if result.final_output.trim().is_empty() {
            let hint = RetryHint::new(format!("{} returned no text", self.role.name));
            return Ok((turn, Outcome::Retry(hint.after(ctx.config().retry_backoff))));
        }

        if !result.tools_invoked.is_empty() {
            info!(role = self.role.name, tools = ?result.tools_invoked, "tools used");
        }

        ctx.console()
            .say(&format!("\n{} {}", self.kind.label(), result.final_output))?;
        *turn.slot(self.kind) = Some(result.final_output);

        Ok((turn, Outcome::Continue))
    }
}

/// Whether a continuation answer means "play again".
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "yes" | "y")
}

/// How a session went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaySummary {
    /// Turns where all three stages produced text.
    pub turns: usize,
    /// Turns abandoned because a stage failed.
    pub failed_turns: usize,
}

/// The interactive loop.
pub struct Game {
    runner: Runner<Turn>,
    ctx: Ctx,
}

impl Game {
    pub fn new(
        config: RunConfig,
        service: impl ExecutionService + 'static,
        console: impl Console + 'static,
    ) -> Self {
        let wf = Workflow::new("galactic-quest-turn")
            .then(Stage::narrate())
            .then(Stage::encounter())
            .then(Stage::reward());

        let runner = Runner::new(wf)
            .with_max_retries(config.max_retries)
            .with_tracing();

        Self {
            runner,
            ctx: Ctx::new(config, service, console),
        }
    }

    /// Stage names of one turn, in run order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.runner.workflow().stage_names()
    }

    /// Play turns until the player declines another one or input runs out.
    ///
    /// A failed stage abandons its turn with a message but does not end the
    /// session; only console I/O errors are returned.
    pub fn play(&mut self) -> Result<PlaySummary, StepError> {
        let mut summary = PlaySummary::default();
        self.ctx.console().say(WELCOME)?;

        loop {
            let Some(choice) = self.ctx.console().ask(CHOICE_PROMPT)? else {
                info!("input closed at choice prompt");
                break;
            };

            match self.runner.run(Turn::new(choice), &mut self.ctx) {
                Ok(_) => summary.turns += 1,
                Err(err) => {
                    summary.failed_turns += 1;
                    self.ctx
                        .console()
                        .say(&format!("\n⚠️ Transmission lost: {err}"))?;
                }
            }

            let again = self.ctx.console().ask(CONTINUE_PROMPT)?;
            if !again.as_deref().is_some_and(is_affirmative) {
                break;
            }
        }

        self.ctx.console().say(FAREWELL)?;
        info!(turns = summary.turns, failed = summary.failed_turns, "session over");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::testing::quiet_ctx;

    #[test]
    fn affirmative_answers() {
        for yes in ["yes", "y", "YES", "Y", "Yes", "yEs"] {
            assert!(is_affirmative(yes), "{yes:?} should continue");
        }
    }

    #[test]
    fn everything_else_stops() {
        for no in ["no", "n", "", " yes", "yes ", "yeah", "sure", "ye", "yes!"] {
            assert!(!is_affirmative(no), "{no:?} should stop");
        }
    }

    #[test]
    fn narrate_forwards_the_choice_verbatim() {
        let mut stage = Stage::narrate();
        let (turn, outcome) = stage.run(Turn::new("  explore  "), &mut quiet_ctx()).unwrap();
        assert_eq!(turn.story.as_deref(), Some("NarratorAgent:   explore  "));
        assert!(matches!(outcome, Outcome::Continue));
    }

    #[test]
    fn encounter_and_reward_use_fixed_triggers() {
        let mut ctx = quiet_ctx();
        let turn = Turn::new("explore");

        let (turn, outcome) = Stage::encounter().run(turn, &mut ctx).unwrap();
        assert_eq!(turn.encounter.as_deref(), Some("AlienAgent: Alien encounter"));
        assert!(matches!(outcome, Outcome::Continue));

        let (turn, outcome) = Stage::reward().run(turn, &mut ctx).unwrap();
        assert_eq!(turn.reward.as_deref(), Some("RewardAgent: Give futuristic reward"));
        assert!(matches!(outcome, Outcome::Continue));
    }

    #[test]
    fn reply_text_is_shown_and_stored_unchanged() {
        let mut stage = Stage::narrate();
        let (turn, _) = stage.run(Turn::new("\n  drift\n"), &mut quiet_ctx()).unwrap();
        assert_eq!(turn.story.as_deref(), Some("NarratorAgent: \n  drift\n"));
    }

    #[test]
    fn turn_runs_the_three_stages_in_order() {
        let game = Game::new(
            RunConfig::new("k"),
            crate::ctx::testing::Echo,
            crate::StdConsole::new(std::io::empty(), std::io::sink()),
        );
        assert_eq!(game.stage_names(), vec!["narrate", "encounter", "reward"]);
    }

    #[test]
    fn stage_names_match_the_workflow_chain() {
        assert_eq!(Stage::narrate().name(), "narrate");
        assert_eq!(Stage::encounter().name(), "encounter");
        assert_eq!(Stage::reward().name(), "reward");
    }
}
