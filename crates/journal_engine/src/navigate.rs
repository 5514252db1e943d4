use journal_core::{
    journal_link_candidates, journal_page_markers, journal_path_suffixes, JOURNAL_URL_MARKER,
};
use journal_logging::{journal_debug, journal_info, journal_warn};
use tokio::time::sleep;

use crate::browser::{with_frame, Browser, DriverError};
use crate::resolve::Resolver;
use crate::types::{BatchSettings, FaultKind, StepError};

/// Places the browser on a fresh journal entry form.
///
/// Four strategies are tried in order: a discoverable in-page link, the
/// same search inside each nested document context, direct URL
/// construction from the session root, and a bounded manual-intervention
/// window. Wire faults during one strategy are logged and demote to the
/// next strategy rather than aborting; only exhausting all four is a
/// navigation failure.
pub struct PageNavigator<'a> {
    browser: &'a dyn Browser,
    settings: &'a BatchSettings,
    endpoint: &'a str,
}

impl<'a> PageNavigator<'a> {
    pub fn new(browser: &'a dyn Browser, settings: &'a BatchSettings, endpoint: &'a str) -> Self {
        Self {
            browser,
            settings,
            endpoint,
        }
    }

    pub async fn reach_entry_form(&self) -> Result<(), StepError> {
        if self.strategy(self.click_journal_link(), "link click").await {
            return Ok(());
        }
        if self
            .strategy(self.search_nested_contexts(), "nested contexts")
            .await
        {
            return Ok(());
        }
        if self.strategy(self.try_direct_urls(), "direct URLs").await {
            return Ok(());
        }
        if self.strategy(self.manual_window(), "manual window").await {
            return Ok(());
        }
        Err(StepError::new(
            FaultKind::NavigationFailure,
            "entry form unreachable by any strategy",
        ))
    }

    async fn strategy(
        &self,
        attempt: impl std::future::Future<Output = Result<bool, DriverError>>,
        label: &str,
    ) -> bool {
        match attempt.await {
            Ok(reached) => {
                if reached {
                    journal_info!("entry form reached via {label}");
                }
                reached
            }
            Err(err) => {
                journal_warn!("navigation strategy '{label}' faulted: {err}");
                false
            }
        }
    }

    /// Strategy 1: click a link whose text or href names the feature.
    async fn click_journal_link(&self) -> Result<bool, DriverError> {
        let resolver = Resolver::new(self.browser, self.settings.poll_interval);
        for candidate in journal_link_candidates() {
            let link = match resolver
                .try_resolve(
                    std::slice::from_ref(&candidate),
                    self.settings.control_timeout,
                    true,
                )
                .await?
            {
                Some(link) => link,
                None => continue,
            };
            self.browser.click(&link).await?;
            sleep(self.settings.nav_settle).await;
            if self.at_entry_form().await? {
                return Ok(true);
            }
            journal_debug!("clicked {} but form markers absent", candidate.selector);
        }
        Ok(false)
    }

    /// Strategy 2: repeat the link search one level deep inside each
    /// nested document context, restoring the top level every time.
    async fn search_nested_contexts(&self) -> Result<bool, DriverError> {
        let frames = self.browser.frame_count().await?;
        if frames == 0 {
            return Ok(false);
        }
        journal_info!("searching {frames} nested context(s) for the journal link");
        for index in 0..frames {
            let clicked = with_frame(self.browser, index, || async {
                for candidate in journal_link_candidates() {
                    if let Some(link) = self.browser.find(&candidate).await? {
                        self.browser.click(&link).await?;
                        return Ok::<bool, DriverError>(true);
                    }
                }
                Ok(false)
            })
            .await?;
            if clicked {
                sleep(self.settings.nav_settle).await;
                if self.at_entry_form().await? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Strategy 3: substitute known path suffixes onto the session root.
    async fn try_direct_urls(&self) -> Result<bool, DriverError> {
        let root = self.session_root().await?;
        for suffix in journal_path_suffixes() {
            let target = format!("{root}/{suffix}");
            journal_info!("trying direct URL {target}");
            self.browser.goto(&target).await?;
            sleep(self.settings.nav_settle).await;
            // URL checks are useless here (we just set it); only the
            // page's own markers count.
            if self.page_has_form_markers().await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Strategy 4: wait a bounded window for external progression, then
    /// re-check once.
    async fn manual_window(&self) -> Result<bool, DriverError> {
        journal_info!(
            "automatic navigation failed; waiting {:?} for manual progression",
            self.settings.manual_window
        );
        sleep(self.settings.manual_window).await;
        self.at_entry_form().await
    }

    /// Root of the current session's URL space. The feature pages hang
    /// off the segment before `/punch/`.
    async fn session_root(&self) -> Result<String, DriverError> {
        let current = self.browser.current_url().await?;
        let root = split_root(&current)
            .or_else(|| split_root(self.endpoint))
            .unwrap_or_else(|| self.endpoint.trim_end_matches('/').to_string());
        Ok(root)
    }

    async fn at_entry_form(&self) -> Result<bool, DriverError> {
        let url = self.browser.current_url().await?;
        if url.contains(JOURNAL_URL_MARKER) {
            return Ok(true);
        }
        self.page_has_form_markers().await
    }

    async fn page_has_form_markers(&self) -> Result<bool, DriverError> {
        let text = self.browser.page_text().await?;
        Ok(journal_page_markers()
            .iter()
            .any(|marker| text.contains(marker.as_str())))
    }
}

fn split_root(url: &str) -> Option<String> {
    url.find("/punch/").map(|idx| url[..idx].to_string())
}
