use journal_core::{
    category_candidates, content_field_candidates, date_field_candidates,
    entry_submit_candidates, to_domestic_era, EntrySpec, OutcomeClassifier, PageVerdict,
    SubmissionOutcome,
};
use journal_logging::{journal_error, journal_info, journal_warn};
use tokio::time::sleep;

use crate::browser::{with_frame, Browser, DriverError};
use crate::resolve::Resolver;
use crate::types::{BatchSettings, FaultKind, StepError};

/// Fills and submits one day's entry form.
pub struct EntrySubmitter<'a> {
    browser: &'a dyn Browser,
    settings: &'a BatchSettings,
    classifier: &'a dyn OutcomeClassifier,
}

impl<'a> EntrySubmitter<'a> {
    pub fn new(
        browser: &'a dyn Browser,
        settings: &'a BatchSettings,
        classifier: &'a dyn OutcomeClassifier,
    ) -> Self {
        Self {
            browser,
            settings,
            classifier,
        }
    }

    /// Submits one entry and classifies the resulting page.
    ///
    /// Never escalates: any step fault converts the day to an explicit
    /// failure instead of propagating, so a single bad day never takes
    /// the batch down with it. The top-level document context is
    /// restored on all paths.
    pub async fn submit(&self, entry: &EntrySpec) -> SubmissionOutcome {
        match self.try_submit(entry).await {
            Ok(outcome) => outcome,
            Err(err) => {
                journal_error!("submission aborted: {err}");
                SubmissionOutcome::ExplicitFailure(err.to_string())
            }
        }
    }

    async fn try_submit(&self, entry: &EntrySpec) -> Result<SubmissionOutcome, StepError> {
        sleep(self.settings.page_settle).await;
        // Start from a known context regardless of what the previous
        // step left behind.
        self.browser.leave_frame().await?;

        match self.locate_form_context().await? {
            Some(index) => {
                journal_info!("entry form found in nested context {index}");
                with_frame(self.browser, index, || self.fill_and_send(entry)).await?;
            }
            None => self.fill_and_send(entry).await?,
        }

        sleep(self.settings.page_settle).await;
        let page = self.browser.page_text().await?;
        Ok(match self.classifier.classify(&page) {
            PageVerdict::Positive => {
                journal_info!("submission confirmed by page text");
                SubmissionOutcome::Success
            }
            PageVerdict::Negative => {
                journal_warn!("site reported rejection, possibly a duplicate entry");
                SubmissionOutcome::ExplicitFailure("site reported rejection".into())
            }
            PageVerdict::Unrecognized => {
                journal_info!("submitted without a recognizable status message");
                SubmissionOutcome::Ambiguous
            }
        })
    }

    /// The form lives either at the top level or inside one nested
    /// context. Probes the top level first with the date field's primary
    /// locator, then each context in turn.
    async fn locate_form_context(&self) -> Result<Option<usize>, StepError> {
        let Some(probe) = date_field_candidates().into_iter().next() else {
            return Ok(None);
        };

        if self.browser.find(&probe).await?.is_some() {
            return Ok(None);
        }

        let frames = self.browser.frame_count().await?;
        for index in 0..frames {
            let present = with_frame(self.browser, index, || async {
                Ok::<bool, DriverError>(self.browser.find(&probe).await?.is_some())
            })
            .await?;
            if present {
                return Ok(Some(index));
            }
        }

        // Nothing probed positive; stay at the top level and let the
        // resolver produce the timeout fault with full diagnostics.
        Ok(None)
    }

    async fn fill_and_send(&self, entry: &EntrySpec) -> Result<(), StepError> {
        let era_date = to_domestic_era(entry.date)
            .map_err(|err| StepError::new(FaultKind::Driver, err.to_string()))?;
        journal_info!("date encoded as {era_date}");

        let resolver = Resolver::new(self.browser, self.settings.poll_interval);

        let date_field = resolver
            .resolve(
                "date field",
                &date_field_candidates(),
                self.settings.resolve_timeout,
            )
            .await?;
        self.browser.clear(&date_field).await?;
        sleep(self.settings.typing_pause).await;
        self.browser.type_text(&date_field, &era_date).await?;

        let content_field = resolver
            .resolve(
                "content field",
                &content_field_candidates(),
                self.settings.resolve_timeout,
            )
            .await?;
        self.browser.clear(&content_field).await?;
        sleep(self.settings.typing_pause).await;
        self.browser.type_text(&content_field, &entry.content).await?;

        self.select_category(&resolver, &entry.category).await;

        let submit = resolver
            .resolve_clickable(
                "submit control",
                &entry_submit_candidates(),
                self.settings.resolve_timeout,
            )
            .await?;
        journal_info!("activating submit control");
        self.browser.click(&submit).await?;
        Ok(())
    }

    /// Category selection is best-effort: the entry may still be
    /// accepted with the site's default category, so a miss is a
    /// warning, not a fault.
    async fn select_category(&self, resolver: &Resolver<'_>, category: &str) {
        let selector = match resolver
            .try_resolve(&category_candidates(), self.settings.control_timeout, false)
            .await
        {
            Ok(Some(selector)) => selector,
            Ok(None) => {
                journal_warn!("category selector not found, site default will apply");
                return;
            }
            Err(err) => {
                journal_warn!("category selector lookup faulted: {err}");
                return;
            }
        };

        match self.browser.select_by_value(&selector, category).await {
            Ok(true) => journal_info!("category {category} selected"),
            Ok(false) => {
                let available = self
                    .browser
                    .option_values(&selector)
                    .await
                    .unwrap_or_default();
                journal_warn!("category {category} not offered, available: {available:?}");
            }
            Err(err) => journal_warn!("category selection faulted: {err}"),
        }
    }
}
