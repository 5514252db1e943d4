use std::sync::mpsc;
use std::thread;

use journal_core::{
    BatchResult, CancelToken, ContentGenerator, DayRecord, EntrySpec, MarkerClassifier,
    RunState, VerbatimContent,
};
use journal_logging::{journal_error, journal_info, journal_warn};
use tokio::time::sleep;

use crate::browser::Browser;
use crate::navigate::PageNavigator;
use crate::session::SessionController;
use crate::submit::EntrySubmitter;
use crate::types::{BatchEvent, BatchInputs, BatchProgress, BatchSettings};
use crate::wire::{WebDriverBrowser, WebDriverSettings};

/// Consumes progress events from the running batch.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: BatchEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<BatchEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<BatchEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: BatchEvent) {
        let _ = self.tx.send(event);
    }
}

/// Sequential day-by-day driver: one browser session, one date at a
/// time, no parallel submissions. One instance processes exactly one
/// run to completion or cancellation.
pub struct BatchDriver<'a> {
    browser: &'a dyn Browser,
    settings: &'a BatchSettings,
    content: &'a dyn ContentGenerator,
    sink: &'a dyn ProgressSink,
    cancel: CancelToken,
    state: RunState,
}

impl<'a> BatchDriver<'a> {
    pub fn new(
        browser: &'a dyn Browser,
        settings: &'a BatchSettings,
        content: &'a dyn ContentGenerator,
        sink: &'a dyn ProgressSink,
        cancel: CancelToken,
    ) -> Self {
        Self {
            browser,
            settings,
            content,
            sink,
            cancel,
            state: RunState::Idle,
        }
    }

    /// Runs the batch. The browser session is released on every exit
    /// path, and the caller always gets a `BatchResult` reflecting
    /// whatever was processed before any fault.
    pub async fn run(mut self, inputs: &BatchInputs) -> BatchResult {
        let result = self.drive(inputs).await;
        if let Err(err) = self.browser.close().await {
            journal_warn!("browser session release failed: {err}");
        }
        journal_logging::clear_active_date();
        result
    }

    async fn drive(&mut self, inputs: &BatchInputs) -> BatchResult {
        self.state = self.state.start();

        let session = SessionController::new(self.browser, self.settings);
        if let Err(err) = session.authenticate(&inputs.credentials).await {
            journal_error!("batch aborted: {err}");
            self.sink.emit(BatchEvent::Fault {
                message: err.to_string(),
            });
            self.state = self.state.finish();
            return BatchResult::empty();
        }

        let navigator =
            PageNavigator::new(self.browser, self.settings, &inputs.credentials.endpoint);
        if let Err(err) = navigator.reach_entry_form().await {
            journal_error!("batch aborted: {err}");
            self.sink.emit(BatchEvent::Fault {
                message: err.to_string(),
            });
            self.state = self.state.finish();
            return BatchResult::empty();
        }

        let dates = inputs.range.days();
        let mut result = BatchResult::with_total(dates.len());
        journal_info!(
            "starting daily batch: {} day(s), category {}",
            dates.len(),
            inputs.category
        );

        let classifier = MarkerClassifier::submission();
        let submitter = EntrySubmitter::new(self.browser, self.settings, &classifier);

        for (index, date) in dates.iter().enumerate() {
            // Cancellation is honored between days; the in-flight day
            // always finishes.
            if self.cancel.is_cancelled() {
                self.state = self.state.request_stop();
                journal_info!("cancellation requested, stopping before {date}");
                break;
            }

            journal_logging::set_active_date(date.to_string());
            let entry = EntrySpec {
                date: *date,
                content: self.content.content_for(&inputs.base_content, index),
                category: inputs.category.clone(),
            };

            let outcome = submitter.submit(&entry).await;
            result.record(DayRecord {
                date: entry.date,
                content: entry.content,
                category: entry.category,
                outcome,
            });
            self.sink.emit(BatchEvent::Progress(BatchProgress {
                processed: result.processed(),
                total: result.total,
                succeeded: result.succeeded,
                failed: result.failed,
            }));

            // The form is single-use per submission; reacquire a fresh
            // one for the next day. A miss here is not batch-fatal: the
            // next day's own submission attempt records its failure.
            if index + 1 < dates.len() {
                sleep(inputs.inter_submission_delay).await;
                if let Err(err) = navigator.reach_entry_form().await {
                    journal_warn!("re-navigation failed, continuing: {err}");
                }
            }
            journal_logging::clear_active_date();
        }

        self.state = self.state.finish();
        log_summary(&result, self.state);
        result
    }
}

fn log_summary(result: &BatchResult, state: RunState) {
    journal_info!(
        "batch {:?}: {}/{} processed, {} succeeded, {} failed",
        state,
        result.processed(),
        result.total,
        result.succeeded,
        result.failed
    );
    if result.total > 0 {
        let rate = result.succeeded as f64 / result.total as f64 * 100.0;
        journal_info!("success rate {rate:.1}%");
    }
}

/// Runs a batch on a dedicated background thread so cancellation and
/// progress reads never block the caller.
///
/// The thread owns a tokio runtime and the browser session; events flow
/// back over an mpsc channel. A terminal `Completed` event is always
/// delivered, even when the browser capability cannot be acquired.
pub struct BatchHandle {
    event_rx: mpsc::Receiver<BatchEvent>,
    cancel: CancelToken,
}

impl BatchHandle {
    pub fn spawn(
        webdriver: WebDriverSettings,
        settings: BatchSettings,
        inputs: BatchInputs,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancelToken::new();
        let run_cancel = cancel.clone();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            runtime.block_on(async move {
                let browser = match WebDriverBrowser::create(&webdriver).await {
                    Ok(browser) => browser,
                    Err(err) => {
                        journal_error!("browser capability unavailable: {err}");
                        let _ = event_tx.send(BatchEvent::Fault {
                            message: err.to_string(),
                        });
                        let _ = event_tx.send(BatchEvent::Completed {
                            result: BatchResult::empty(),
                        });
                        return;
                    }
                };

                let sink = ChannelProgressSink::new(event_tx.clone());
                let content = VerbatimContent;
                let driver =
                    BatchDriver::new(&browser, &settings, &content, &sink, run_cancel);
                let result = driver.run(&inputs).await;
                let _ = event_tx.send(BatchEvent::Completed { result });
            });
        });

        Self { event_rx, cancel }
    }

    /// Requests cooperative cancellation; the in-flight day finishes
    /// before the loop stops.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Non-blocking event read for polling callers.
    pub fn try_recv(&self) -> Option<BatchEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocking event read; `None` once the batch thread is gone.
    pub fn recv(&self) -> Option<BatchEvent> {
        self.event_rx.recv().ok()
    }
}
