use std::future::Future;

use thiserror::Error;

use journal_core::{LocatorCandidate, Strategy};

/// Opaque reference to a located page element. Valid until the page it
/// was found on is replaced.
pub type ElementHandle = String;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("webdriver endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("webdriver session not created: {0}")]
    SessionNotCreated(String),
    #[error("no such element")]
    NoSuchElement,
    #[error("webdriver protocol error: {0}")]
    Protocol(String),
}

/// The opaque browser-driving capability the controller runs against.
///
/// The controller never assumes more than this surface: navigate, find
/// by strategy, read the current URL or page text, type, click, and
/// switch into/out of a nested document context. Production code binds
/// it to a WebDriver session; tests bind it to a scripted double.
#[async_trait::async_trait]
pub trait Browser: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    async fn current_url(&self) -> Result<String, DriverError>;

    /// Rendered text of the current document context; the only oracle
    /// the target site offers for login and submission state.
    async fn page_text(&self) -> Result<String, DriverError>;

    /// First element matching the candidate, or `None` when absent.
    /// Absence is an answer, not an error.
    async fn find(&self, candidate: &LocatorCandidate)
        -> Result<Option<ElementHandle>, DriverError>;

    async fn find_all(
        &self,
        candidate: &LocatorCandidate,
    ) -> Result<Vec<ElementHandle>, DriverError>;

    async fn is_interactable(&self, element: &ElementHandle) -> Result<bool, DriverError>;

    async fn clear(&self, element: &ElementHandle) -> Result<(), DriverError>;

    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<(), DriverError>;

    /// Keyboard submit signal on a focused field.
    async fn press_enter(&self, element: &ElementHandle) -> Result<(), DriverError>;

    async fn click(&self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Selects the option with the given value on a list-valued control.
    /// Returns `false` when no option carries that value.
    async fn select_by_value(
        &self,
        element: &ElementHandle,
        value: &str,
    ) -> Result<bool, DriverError>;

    /// Option values offered by a list-valued control, for diagnostics.
    async fn option_values(&self, element: &ElementHandle) -> Result<Vec<String>, DriverError>;

    /// Number of nested document contexts in the current document.
    async fn frame_count(&self) -> Result<usize, DriverError> {
        Ok(self
            .find_all(&LocatorCandidate::new(Strategy::Tag, "iframe"))
            .await?
            .len())
    }

    /// Switches into the nested document context at `index`.
    async fn enter_frame(&self, index: usize) -> Result<(), DriverError>;

    /// Restores the top-level document context.
    async fn leave_frame(&self) -> Result<(), DriverError>;

    /// Id/name/type of the page's input controls, for post-hoc
    /// diagnosis when a required field cannot be resolved.
    async fn describe_inputs(&self) -> Result<Vec<String>, DriverError> {
        Ok(Vec::new())
    }

    /// Releases the underlying session.
    async fn close(&self) -> Result<(), DriverError>;
}

/// Runs `body` inside the nested document context at `index`, restoring
/// the top-level context on every exit path, faults included.
pub async fn with_frame<T, E, F, Fut>(
    browser: &dyn Browser,
    index: usize,
    body: F,
) -> Result<T, E>
where
    E: From<DriverError>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    browser.enter_frame(index).await.map_err(E::from)?;
    let outcome = body().await;
    let restored = browser.leave_frame().await;
    match (outcome, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(E::from(err)),
        (Err(err), _) => Err(err),
    }
}
