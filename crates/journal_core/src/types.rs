use chrono::NaiveDate;

/// Login material for one run. Immutable once the run begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub endpoint: String,
    pub account: String,
    pub secret: String,
}

/// One day's entry: the date, the free-text content, and the category
/// identifier selected in the form's list control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySpec {
    pub date: NaiveDate,
    pub content: String,
    pub category: String,
}

/// Result of submitting one entry, as read back from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success,
    ExplicitFailure(String),
    /// No recognized marker text on the post-submission page. The site
    /// does not always surface a status message, so this counts as a
    /// success for bookkeeping.
    Ambiguous,
}

impl SubmissionOutcome {
    pub fn counts_as_success(&self) -> bool {
        !matches!(self, SubmissionOutcome::ExplicitFailure(_))
    }
}

/// One processed day in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub content: String,
    pub category: String,
    pub outcome: SubmissionOutcome,
}

/// Aggregate bookkeeping for one batch run. Mutated only by appending
/// one record per processed day; never shared across concurrent runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchResult {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub records: Vec<DayRecord>,
}

impl BatchResult {
    /// An empty result, produced when the batch aborts before any date
    /// is scheduled (auth failure, unreachable entry form).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_total(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Appends one day's record and updates the counters.
    pub fn record(&mut self, record: DayRecord) {
        if record.outcome.counts_as_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.records.push(record);
    }

    pub fn processed(&self) -> usize {
        self.records.len()
    }
}
