//! Journal core: pure domain model for the auto-fill controller.
mod calendar;
mod classify;
mod content;
mod locator;
mod state;
mod types;

pub use calendar::{to_domestic_era, CalendarError, DateRange};
pub use classify::{MarkerClassifier, OutcomeClassifier, PageVerdict};
pub use content::{ContentGenerator, VerbatimContent};
pub use locator::{
    category_candidates, content_field_candidates, date_field_candidates,
    entry_submit_candidates, journal_link_candidates, journal_page_markers,
    journal_path_suffixes, login_account_candidates, login_secret_candidates,
    login_submit_candidates, LocatorCandidate, Strategy, JOURNAL_URL_MARKER,
};
pub use state::{CancelToken, RunState};
pub use types::{BatchResult, Credentials, DayRecord, EntrySpec, SubmissionOutcome};
