//! Runner - executes agents against a provider

use crate::Agent;
use futures_util::future::join_all;
use runcraft_model::error::remote_call_failed;
use runcraft_model::{
    ChatMessage, CompletionRequest, Error, LlmProvider, ProviderError, Result, RunConfig, Usage,
};
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// Output of one agent run
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub output_text: String,
    /// Model name as reported by the server
    pub model: String,
    pub usage: Usage,
}

/// One entry of a batch
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub agent: Agent,
    pub input: String,
}

impl BatchJob {
    pub fn new(agent: Agent, input: impl Into<String>) -> Self {
        Self {
            agent,
            input: input.into(),
        }
    }
}

/// Result slot of a deadline-bounded batch
#[derive(Debug)]
pub enum BatchOutcome {
    /// The call returned before the deadline, successfully or not
    Finished(Result<RunResult>),
    /// The call was still outstanding at the deadline and was dropped
    Cancelled,
}

impl BatchOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, BatchOutcome::Cancelled)
    }

    pub fn into_result(self) -> Result<RunResult> {
        match self {
            BatchOutcome::Finished(result) => result,
            BatchOutcome::Cancelled => {
                Err(Error::cancelled().with_operation("runner::run_batch_with_deadline"))
            }
        }
    }
}

/// Stateless entry points for running agents
pub struct Runner;

impl Runner {
    /// Send the agent's instructions and `input` to the model.
    ///
    /// Provider failures come back as `RemoteCallFailed` with the provider
    /// error attached as the source. Nothing is retried.
    pub async fn run<P: LlmProvider>(
        provider: &P,
        agent: &Agent,
        input: &str,
        config: &RunConfig,
    ) -> Result<RunResult> {
        debug!(agent = %agent.name, model = %config.model, provider = provider.name(), "running agent");

        let request = CompletionRequest::new(vec![
            ChatMessage::system(&agent.instructions),
            ChatMessage::user(input),
        ])
        .with_model(config.model.as_str());
        let request = config.settings.apply(request);

        let response = provider.complete(request).await.map_err(|e| {
            remote_call_failed(e)
                .with_operation("runner::run")
                .with_context("agent", agent.name.clone())
                .with_context("model", config.model.as_str())
        })?;

        let output_text = response.content.ok_or_else(|| {
            remote_call_failed(ProviderError::Other("No content in response".into()))
                .with_operation("runner::run")
                .with_context("agent", agent.name.clone())
        })?;

        debug!(
            agent = %agent.name,
            chars = output_text.len(),
            tokens = response.usage.total_tokens,
            "agent finished"
        );

        Ok(RunResult {
            output_text,
            model: response.model,
            usage: response.usage,
        })
    }

    /// Run every job concurrently and wait for all of them.
    ///
    /// Results line up with `jobs` by position.
    pub async fn run_batch<P: LlmProvider>(
        provider: &P,
        jobs: &[BatchJob],
        config: &RunConfig,
    ) -> Vec<Result<RunResult>> {
        debug!(jobs = jobs.len(), "running batch");
        let calls = jobs
            .iter()
            .map(|job| Self::run(provider, &job.agent, &job.input, config));
        join_all(calls).await
    }

    /// Like [`Runner::run_batch`], but returns once `deadline` has elapsed.
    ///
    /// Calls still outstanding at the deadline are dropped and reported as
    /// [`BatchOutcome::Cancelled`]. A deadline too far out to be represented
    /// as an instant never fires.
    pub async fn run_batch_with_deadline<P: LlmProvider>(
        provider: &P,
        jobs: &[BatchJob],
        config: &RunConfig,
        deadline: Duration,
    ) -> Vec<BatchOutcome> {
        let Some(deadline_at) = Instant::now().checked_add(deadline) else {
            debug!(jobs = jobs.len(), ?deadline, "deadline out of range, waiting for every call");
            let results = Self::run_batch(provider, jobs, config).await;
            return results.into_iter().map(BatchOutcome::Finished).collect();
        };
        debug!(jobs = jobs.len(), deadline_ms = deadline.as_millis() as u64, "running batch with deadline");

        let calls = jobs.iter().enumerate().map(|(index, job)| async move {
            match timeout_at(deadline_at, Self::run(provider, &job.agent, &job.input, config)).await {
                Ok(result) => BatchOutcome::Finished(result),
                Err(_) => {
                    warn!(index, agent = %job.agent.name, "call not complete in time, cancelled");
                    BatchOutcome::Cancelled
                }
            }
        });
        join_all(calls).await
    }
}
