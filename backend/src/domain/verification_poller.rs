//! Background verification polling.
//!
//! After a verify request leaves a domain in `added`, a bounded poll keeps
//! re-checking it with exponential backoff and promotes it to `verified`
//! once both the provider and DNS agree. One task runs per project:
//! scheduling again replaces the previous task and removing the domain
//! cancels it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::domain::ports::{ProjectRepository, ProjectRepositoryError, VerificationSleeper};
use crate::domain::{DomainName, DomainStatus, ProjectId, RegistrarService, TraceId};

/// Poll bounds and backoff curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationPollConfig {
    /// Maximum number of checks; zero disables polling.
    pub max_attempts: u32,
    /// Delay before the first check.
    pub initial_backoff: Duration,
    /// Cap applied to the doubled delay.
    pub max_backoff: Duration,
}

impl Default for VerificationPollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_secs(5),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl VerificationPollConfig {
    /// Delay before the 1-based `attempt`: `min(initial * 2^(attempt-1), max)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = 2_u32.saturating_pow(attempt.saturating_sub(1));
        let base_ms = u64::try_from(self.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.max_backoff.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(base_ms.saturating_mul(u64::from(exponent)).min(max_ms))
    }
}

/// How a poll run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The domain was promoted to `verified`.
    Verified { attempts: u32 },
    /// The project no longer holds the domain in `added`.
    Abandoned { attempts: u32 },
    /// Every attempt ran without full verification.
    Exhausted { attempts: u32 },
}

struct PollWorker {
    repository: Arc<dyn ProjectRepository>,
    registrar: RegistrarService,
    sleeper: Arc<dyn VerificationSleeper>,
    config: VerificationPollConfig,
}

#[derive(Default)]
struct TaskRegistry {
    next_generation: u64,
    tasks: HashMap<ProjectId, (u64, AbortHandle)>,
}

/// Schedules and tracks per-project verification polls.
#[derive(Clone)]
pub struct VerificationPoller {
    worker: Arc<PollWorker>,
    registry: Arc<Mutex<TaskRegistry>>,
}

impl VerificationPoller {
    pub fn new(
        repository: Arc<dyn ProjectRepository>,
        registrar: RegistrarService,
        sleeper: Arc<dyn VerificationSleeper>,
        config: VerificationPollConfig,
    ) -> Self {
        Self {
            worker: Arc::new(PollWorker {
                repository,
                registrar,
                sleeper,
                config,
            }),
            registry: Arc::new(Mutex::new(TaskRegistry::default())),
        }
    }

    /// Start a background poll for `domain`, replacing any running poll for
    /// the project. Returns `false` when polling is disabled.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&self, project_id: ProjectId, domain: DomainName) -> bool {
        if self.worker.config.max_attempts == 0 {
            return false;
        }

        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry.next_generation = registry.next_generation.wrapping_add(1);
        let generation = registry.next_generation;

        let worker = Arc::clone(&self.worker);
        let cleanup = Arc::clone(&self.registry);
        let handle = tokio::spawn(TraceId::propagate(async move {
            let outcome = worker.run(project_id, &domain).await;
            debug!(%project_id, %domain, ?outcome, "verification poll finished");
            let mut registry = cleanup.lock().unwrap_or_else(PoisonError::into_inner);
            if registry
                .tasks
                .get(&project_id)
                .is_some_and(|(current, _)| *current == generation)
            {
                registry.tasks.remove(&project_id);
            }
        }));

        if let Some((_, previous)) = registry
            .tasks
            .insert(project_id, (generation, handle.abort_handle()))
        {
            previous.abort();
        }
        true
    }

    /// Abort the running poll for `project_id`, if any.
    pub fn cancel(&self, project_id: &ProjectId) -> bool {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        match registry.tasks.remove(project_id) {
            Some((_, handle)) => {
                handle.abort();
                debug!(%project_id, "verification poll cancelled");
                true
            }
            None => false,
        }
    }

    /// Whether a poll is currently tracked for `project_id`.
    pub fn is_scheduled(&self, project_id: &ProjectId) -> bool {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tasks
            .contains_key(project_id)
    }

    /// Run a poll to completion on the current task.
    pub async fn run(&self, project_id: ProjectId, domain: &DomainName) -> PollOutcome {
        self.worker.run(project_id, domain).await
    }
}

impl PollWorker {
    async fn run(&self, project_id: ProjectId, domain: &DomainName) -> PollOutcome {
        let max_attempts = self.config.max_attempts;
        for attempt in 1..=max_attempts {
            self.sleeper.sleep(self.config.delay_for(attempt)).await;

            if !self.still_awaiting(project_id, domain).await {
                return PollOutcome::Abandoned { attempts: attempt };
            }

            if let Err(error) = self.registrar.registrar().verify_domain(domain).await {
                debug!(%error, %domain, attempt, "verification trigger failed");
            }

            let status = match self.registrar.check_verification_status(domain).await {
                Ok(status) => status,
                Err(error) => {
                    debug!(%error, %domain, attempt, "verification status check failed");
                    continue;
                }
            };
            if !status.is_fully_verified() {
                debug!(
                    %domain,
                    attempt,
                    provider_verified = status.verified,
                    using_provider_dns = status.using_provider_dns,
                    "domain not yet verified"
                );
                continue;
            }

            match self
                .repository
                .transition_status(
                    &project_id,
                    domain,
                    DomainStatus::Added,
                    DomainStatus::Verified,
                )
                .await
            {
                Ok(_) => {
                    info!(%project_id, %domain, attempt, "domain verified by background poll");
                    return PollOutcome::Verified { attempts: attempt };
                }
                Err(ProjectRepositoryError::NotFound { .. }) => {
                    debug!(%project_id, %domain, "attachment changed before promotion");
                    return PollOutcome::Abandoned { attempts: attempt };
                }
                Err(error) => {
                    warn!(%error, %project_id, %domain, "failed to persist verified status");
                }
            }
        }
        PollOutcome::Exhausted {
            attempts: max_attempts,
        }
    }

    async fn still_awaiting(&self, project_id: ProjectId, domain: &DomainName) -> bool {
        match self.repository.find_by_id(&project_id).await {
            Ok(Some(project)) => project
                .custom_domain
                .as_ref()
                .is_some_and(|attachment| attachment.is(domain, DomainStatus::Added)),
            Ok(None) => false,
            Err(error) => {
                warn!(%error, %project_id, "project lookup failed during verification poll");
                true
            }
        }
    }
}

#[cfg(test)]
#[path = "verification_poller_tests.rs"]
mod tests;
