use crate::config::RunConfig;
use crate::console::Console;
use crate::role::AgentRole;
use crate::service::{ExecutionService, RunResult};
use crate::step::StepError;

/// Execution context handed to every step: run settings, the execution
/// service and the player's console.
pub struct Ctx {
    config: RunConfig,
    service: Box<dyn ExecutionService>,
    console: Box<dyn Console>,
}

impl Ctx {
    pub fn new(
        config: RunConfig,
        service: impl ExecutionService + 'static,
        console: impl Console + 'static,
    ) -> Self {
        Self {
            config,
            service: Box::new(service),
            console: Box::new(console),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn console(&mut self) -> &mut dyn Console {
        self.console.as_mut()
    }

    /// Run `role` on `input` with the shared settings.
    pub fn run_role(&mut self, role: &AgentRole, input: &str) -> Result<RunResult, StepError> {
        self.service.run_sync(role, input, &self.config)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::quiet_ctx;
    use crate::role;

    #[test]
    fn run_role_goes_through_the_service() {
        let mut ctx = quiet_ctx();
        let result = ctx.run_role(&role::narrator(), "explore").unwrap();
        assert_eq!(result.final_output, "NarratorAgent: explore");
    }

    #[test]
    fn console_and_config_are_reachable() {
        let mut ctx = quiet_ctx();
        assert_eq!(ctx.config().api_key, "test-key");
        assert_eq!(ctx.console().ask("> ").unwrap(), None);
    }
}
