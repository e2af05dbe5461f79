//! Dynamic agent - one run configuration, instructions chosen per request

use crate::{Agent, RunResult, Runner, TaskType};
use runcraft_model::{Error, LlmProvider, Result, RunConfig};
use tracing::info;

/// Builds a task-specific agent for every request
#[derive(Debug, Clone)]
pub struct DynamicAgent {
    base_name: String,
    config: RunConfig,
}

impl DynamicAgent {
    pub fn new(base_name: impl Into<String>, config: RunConfig) -> Self {
        Self {
            base_name: base_name.into(),
            config,
        }
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Agent named `"<base name> - <Task>"` with the task's instructions
    pub fn create_agent_for_task(&self, task_type: &str, additional_context: &str) -> Result<Agent> {
        let task: TaskType = task_type
            .parse()
            .map_err(|e: Error| e.with_operation("dynamic::create_agent_for_task"))?;

        Ok(Agent::new(
            format!("{} - {}", self.base_name, task.title()),
            task.instructions(additional_context),
        ))
    }

    /// Resolve the agent for `task_type` and run it on `user_input`
    pub async fn handle_request<P: LlmProvider>(
        &self,
        provider: &P,
        task_type: &str,
        user_input: &str,
        context: &str,
    ) -> Result<RunResult> {
        let agent = self.create_agent_for_task(task_type, context)?;
        info!(agent = %agent.name, "handling request");

        Runner::run(provider, &agent, user_input, &self.config)
            .await
            .map_err(|e| e.with_operation("dynamic::handle_request"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::tests::StubProvider;
    use runcraft_model::ErrorKind;

    fn system() -> DynamicAgent {
        DynamicAgent::new("Versatile Assistant", RunConfig::default())
    }

    #[test]
    fn test_agent_name_and_instructions() {
        let agent = system()
            .create_agent_for_task("creative", "Focus on environmental sustainability.")
            .unwrap();

        assert_eq!(agent.name, "Versatile Assistant - Creative");
        assert!(agent.instructions.starts_with("You are a creative writing assistant."));
        assert!(agent.instructions.ends_with("Focus on environmental sustainability."));
    }

    #[test]
    fn test_unknown_task_type() {
        let err = system().create_agent_for_task("poem", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownTaskType);
        assert_eq!(err.operation(), "dynamic::create_agent_for_task");
    }

    #[test]
    fn test_handle_request() {
        let provider = StubProvider::default();
        let reply = tokio_test::block_on(system().handle_request(
            &provider,
            "tutor",
            "what is machine learning?",
            "The student is a college computer science major.",
        ))
        .unwrap();

        assert_eq!(reply.output_text, "WHAT IS MACHINE LEARNING?");
        assert_eq!(reply.model, "gemini-2.0-flash");
        assert_eq!(reply.usage.total_tokens, 5);

        let seen = provider.seen.lock().unwrap();
        let system_prompt = seen[0].messages[0].content.as_deref().unwrap();
        assert!(system_prompt.contains("patient and encouraging tutor"));
        assert!(system_prompt.contains("college computer science major"));
    }

    #[test]
    fn test_handle_request_unknown_type_skips_call() {
        let provider = StubProvider::default();
        let err = tokio_test::block_on(system().handle_request(&provider, "poem", "hi", ""))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnknownTaskType);
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_handle_request_remote_failure() {
        let provider = StubProvider::default();
        let err = tokio_test::block_on(system().handle_request(&provider, "code", "fail now", ""))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RemoteCallFailed);
        assert_eq!(err.operation(), "dynamic::handle_request");
    }
}
