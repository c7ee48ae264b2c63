use std::time::Duration;

use crate::{
    error::{PrintmockError, PrintmockResult},
    provider::{MockupFile, RenderProvider, TaskKey, TaskStatus},
};

/// Polling budget for one generation job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Fixed sleep between polls.
    pub interval: Duration,
    /// Attempt ceiling before the job is declared timed out.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 30,
        }
    }
}

/// One in-flight generation job, owned by the polling loop for its lifetime.
///
/// Mutated only by poll responses and discarded after the terminal state is
/// reported; callers wanting persistence must snapshot the result.
#[derive(Clone, Debug)]
pub struct MockupTask {
    pub key: TaskKey,
    pub variant_ids: Vec<u64>,
    pub design_image_url: String,
    pub status: TaskStatus,
    /// Poll attempts made so far.
    pub attempts: u32,
}

/// Successful terminal result of a generation job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedMockups {
    pub key: TaskKey,
    pub mockups: Vec<MockupFile>,
    /// Number of polls it took to reach the terminal state.
    pub polls: u32,
}

/// Submit a generation job and drive it to a terminal state.
///
/// The first poll happens immediately after the provider acknowledges the
/// submission; subsequent polls are separated by `cfg.interval`. The three
/// terminal outcomes map to distinct results: success, `ProviderRejected`
/// (with the provider's detail, not retried here), and `Timeout` once the
/// attempt ceiling is exhausted. Dropping the returned future cancels the
/// job client-side; no provider-side cancel call exists.
#[tracing::instrument(skip(provider, cfg), fields(max_attempts = cfg.max_attempts))]
pub async fn generate_mockup<P: RenderProvider>(
    provider: &P,
    variant_ids: &[u64],
    design_image_url: &str,
    cfg: &PollConfig,
) -> PrintmockResult<GeneratedMockups> {
    let key = provider
        .create_task(variant_ids, design_image_url, "png")
        .await?;
    tracing::debug!(%key, "task submitted");

    let mut task = MockupTask {
        key,
        variant_ids: variant_ids.to_vec(),
        design_image_url: design_image_url.to_string(),
        status: TaskStatus::Pending,
        attempts: 0,
    };
    poll_to_completion(provider, &mut task, cfg).await
}

/// Poll an already-submitted task until it reaches a terminal state or the
/// attempt ceiling is hit.
///
/// A failed poll round-trip is absorbed and retried on the next attempt; it
/// still consumes an attempt so an unreachable provider terminates at the
/// ceiling.
pub async fn poll_to_completion<P: RenderProvider>(
    provider: &P,
    task: &mut MockupTask,
    cfg: &PollConfig,
) -> PrintmockResult<GeneratedMockups> {
    for attempt in 1..=cfg.max_attempts {
        task.attempts = attempt;
        match provider.poll_task(&task.key).await {
            Ok(poll) => {
                task.status = poll.status;
                match poll.status {
                    TaskStatus::Completed => {
                        tracing::debug!(attempt, "task completed");
                        return Ok(GeneratedMockups {
                            key: task.key.clone(),
                            mockups: poll.mockups,
                            polls: attempt,
                        });
                    }
                    TaskStatus::Failed => {
                        let detail = poll.error.unwrap_or_else(|| "unknown error".to_string());
                        return Err(PrintmockError::provider_rejected(detail));
                    }
                    TaskStatus::Pending => {}
                }
            }
            Err(err) => {
                tracing::warn!(attempt, %err, "poll round-trip failed, will retry");
            }
        }

        if attempt < cfg.max_attempts {
            tokio::time::sleep(cfg.interval).await;
        }
    }

    Err(PrintmockError::timeout(format!(
        "task {} reached no terminal status after {} poll attempts",
        task.key, cfg.max_attempts
    )))
}

/// Run [`generate_mockup`] under a caller-imposed wall-clock deadline,
/// independent of the attempt ceiling.
pub async fn generate_mockup_with_deadline<P: RenderProvider>(
    provider: &P,
    variant_ids: &[u64],
    design_image_url: &str,
    cfg: &PollConfig,
    deadline: Duration,
) -> PrintmockResult<GeneratedMockups> {
    match tokio::time::timeout(
        deadline,
        generate_mockup(provider, variant_ids, design_image_url, cfg),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(PrintmockError::timeout(format!(
            "deadline of {deadline:?} elapsed before the provider answered"
        ))),
    }
}
