use journal_core::{
    login_account_candidates, login_secret_candidates, login_submit_candidates, Credentials,
    MarkerClassifier, OutcomeClassifier, PageVerdict,
};
use journal_logging::{journal_info, journal_warn};
use tokio::time::sleep;

use crate::browser::Browser;
use crate::resolve::Resolver;
use crate::types::{BatchSettings, FaultKind, StepError};

/// Establishes the authenticated browser session for one run.
pub struct SessionController<'a> {
    browser: &'a dyn Browser,
    settings: &'a BatchSettings,
}

impl<'a> SessionController<'a> {
    pub fn new(browser: &'a dyn Browser, settings: &'a BatchSettings) -> Self {
        Self { browser, settings }
    }

    /// Opens the endpoint, submits the credentials, and classifies the
    /// resulting page as authenticated or not.
    ///
    /// The site returns no machine-readable auth result; success is
    /// inferred from the page text via the login marker set.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<(), StepError> {
        journal_info!("opening session against {}", credentials.endpoint);
        self.browser.goto(&credentials.endpoint).await?;
        sleep(self.settings.page_settle).await;

        let resolver = Resolver::new(self.browser, self.settings.poll_interval);
        let account = resolver
            .resolve(
                "account field",
                &login_account_candidates(),
                self.settings.resolve_timeout,
            )
            .await?;
        let secret = resolver
            .resolve(
                "secret field",
                &login_secret_candidates(),
                self.settings.resolve_timeout,
            )
            .await?;

        self.browser.clear(&account).await?;
        self.browser.type_text(&account, &credentials.account).await?;
        sleep(self.settings.typing_pause).await;
        self.browser.clear(&secret).await?;
        self.browser.type_text(&secret, &credentials.secret).await?;
        sleep(self.settings.typing_pause).await;

        match resolver
            .resolve_clickable(
                "login control",
                &login_submit_candidates(),
                self.settings.control_timeout,
            )
            .await
        {
            Ok(control) => {
                journal_info!("activating login control");
                self.browser.click(&control).await?;
            }
            Err(err) if matches!(err.kind, FaultKind::ResolutionTimeout { .. }) => {
                // No submit control on this page revision; the secret
                // field accepts a keyboard submit instead.
                journal_warn!("no login control resolved, submitting via keyboard");
                self.browser.press_enter(&secret).await?;
            }
            Err(err) => return Err(err),
        }

        sleep(self.settings.page_settle).await;

        let page = self.browser.page_text().await?;
        match MarkerClassifier::login(&credentials.account).classify(&page) {
            PageVerdict::Positive => {
                journal_info!("login succeeded");
                Ok(())
            }
            _ => Err(StepError::new(
                FaultKind::AuthFailure,
                "no authenticated-page marker found after login",
            )),
        }
    }
}
