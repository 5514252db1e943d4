use std::time::Duration;

use journal_core::LocatorCandidate;
use journal_logging::{journal_debug, journal_info, journal_warn};
use tokio::time::{sleep, Instant};

use crate::browser::{Browser, DriverError, ElementHandle};
use crate::types::{FaultKind, StepError};

/// Generic ordered-fallback element resolution.
///
/// One routine consumes the declarative candidate tables: each candidate
/// is polled until it resolves or its timeout elapses, in declaration
/// order, so the first hit is always the most reliable locator that
/// still works on this page revision.
pub struct Resolver<'a> {
    browser: &'a dyn Browser,
    poll_interval: Duration,
}

impl<'a> Resolver<'a> {
    pub fn new(browser: &'a dyn Browser, poll_interval: Duration) -> Self {
        Self {
            browser,
            poll_interval,
        }
    }

    /// Returns the first candidate that resolves to a present element.
    /// Failing to resolve a required field is a fault carrying the
    /// field's role.
    pub async fn resolve(
        &self,
        role: &str,
        candidates: &[LocatorCandidate],
        timeout: Duration,
    ) -> Result<ElementHandle, StepError> {
        self.resolve_inner(role, candidates, timeout, false).await
    }

    /// Like [`Resolver::resolve`], but the element must also be
    /// interactable before it counts as a hit.
    pub async fn resolve_clickable(
        &self,
        role: &str,
        candidates: &[LocatorCandidate],
        timeout: Duration,
    ) -> Result<ElementHandle, StepError> {
        self.resolve_inner(role, candidates, timeout, true).await
    }

    /// Best-effort variant for optional lookups: `None` on exhaustion,
    /// no fault and no diagnostics.
    pub async fn try_resolve(
        &self,
        candidates: &[LocatorCandidate],
        timeout: Duration,
        require_interactable: bool,
    ) -> Result<Option<ElementHandle>, DriverError> {
        for candidate in candidates {
            if let Some(element) = self
                .poll_candidate(candidate, timeout, require_interactable)
                .await?
            {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    async fn resolve_inner(
        &self,
        role: &str,
        candidates: &[LocatorCandidate],
        timeout: Duration,
        require_interactable: bool,
    ) -> Result<ElementHandle, StepError> {
        for candidate in candidates {
            match self
                .poll_candidate(candidate, timeout, require_interactable)
                .await?
            {
                Some(element) => {
                    journal_info!(
                        "resolved {role} via {:?} {}",
                        candidate.strategy,
                        candidate.selector
                    );
                    return Ok(element);
                }
                None => {
                    journal_debug!(
                        "candidate {:?} {} timed out for {role}",
                        candidate.strategy,
                        candidate.selector
                    );
                }
            }
        }

        journal_warn!("every candidate timed out for {role}");
        self.log_page_inputs().await;
        Err(StepError::new(
            FaultKind::ResolutionTimeout { role: role.into() },
            format!("no candidate resolved within {timeout:?} each"),
        ))
    }

    /// Polls one candidate until it is present (and interactable when
    /// required) or the bound elapses. Always makes at least one
    /// attempt, so a zero timeout degrades to a single lookup.
    async fn poll_candidate(
        &self,
        candidate: &LocatorCandidate,
        timeout: Duration,
        require_interactable: bool,
    ) -> Result<Option<ElementHandle>, DriverError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(element) = self.browser.find(candidate).await? {
                if !require_interactable || self.browser.is_interactable(&element).await? {
                    return Ok(Some(element));
                }
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn log_page_inputs(&self) {
        match self.browser.describe_inputs().await {
            Ok(inputs) if !inputs.is_empty() => {
                journal_debug!("page inputs: {inputs:?}");
            }
            Ok(_) => {}
            Err(err) => journal_debug!("could not enumerate page inputs: {err}"),
        }
    }
}
