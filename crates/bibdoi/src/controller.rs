//! Sequential, rate limited resolution of the DOI names found in a text.
//!
//! A [`Controller`] is either [`State::Idle`] or [`State::Running`]. [`Controller::start`] fills
//! the pending queue from a text and each [`Controller::step`] resolves the head of the queue with
//! a single request. [`Controller::run`] drives the steps, waiting the throttle delay before every
//! request that follows another, so at most one request is in flight and the service sees roughly
//! one request per delay.

use std::{collections::VecDeque, thread, time::Duration};

use log::{info, trace, warn};

use crate::{
    api::{Client, MetadataClient},
    doi::{self, Doi},
    record::{self, ResolvedRecord},
};

/// Delay between two consecutive requests, about twenty requests per second.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

/// Extraction of DOI names from free-form text.
pub trait Extract {
    /// Extract the unique DOI names of `text` in order.
    fn extract(&self, text: &str) -> Vec<Doi>;
}

impl<F> Extract for F
where
    F: Fn(&str) -> Vec<Doi>,
{
    fn extract(&self, text: &str) -> Vec<Doi> {
        self(text)
    }
}

/// The default extractor, see [`crate::extract`].
pub type DefaultExtract = fn(&str) -> Vec<Doi>;

/// State of a [`Controller`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    /// No run in progress, a new run can be started.
    Idle,
    /// A run is draining its queue.
    Running,
}

/// Result of a single [`Controller::step`].
#[derive(Debug, PartialEq, Eq)]
pub enum Step<'a> {
    /// A DOI name was resolved (or failed) and its record appended.
    Resolved(&'a ResolvedRecord),
    /// The queue was empty and the controller is idle again.
    Finished,
}

/// Drives one resolution run at a time.
pub struct Controller<C: Client, E: Extract = DefaultExtract> {
    client: MetadataClient<C>,
    extractor: E,
    delay: Duration,
    state: State,
    pending: VecDeque<Doi>,
    records: Vec<ResolvedRecord>,
}

impl<C: Client> Controller<C> {
    /// A controller using the default extractor.
    pub fn new(client: MetadataClient<C>, delay: Duration) -> Self {
        Self::with_extractor(client, doi::extract, delay)
    }
}

impl<C: Client, E: Extract> Controller<C, E> {
    /// A controller using `extractor` to find the DOI names of a text.
    pub fn with_extractor(client: MetadataClient<C>, extractor: E, delay: Duration) -> Self {
        Self {
            client,
            extractor,
            delay,
            state: State::Idle,
            pending: VecDeque::new(),
            records: Vec::new(),
        }
    }

    /// Start a run for the DOI names found in `text`.
    ///
    /// Records of a previous run are discarded. Returns `false` and changes nothing when a run is
    /// already in progress.
    pub fn start(&mut self, text: &str) -> bool {
        if self.is_running() {
            warn!("A run is already in progress - ignoring start");
            return false;
        }

        self.pending = self.extractor.extract(text).into();
        self.records.clear();
        self.state = State::Running;

        info!("Resolving {} DOI names", self.pending.len());
        true
    }

    /// Resolve the next pending DOI name.
    ///
    /// When the queue is empty the controller returns to [`State::Idle`] and [`Step::Finished`]
    /// is returned. Failures are recorded and never end the run early.
    pub fn step(&mut self) -> Step<'_> {
        if !self.is_running() {
            return Step::Finished;
        }

        let Some(doi) = self.pending.pop_front() else {
            trace!("Queue drained - run finished");
            self.state = State::Idle;
            return Step::Finished;
        };

        let record = ResolvedRecord::from(self.client.resolve(&doi));
        self.records.push(record);

        self.records.last().map_or(Step::Finished, Step::Resolved)
    }

    /// Drain the queue, calling `on_record` with every record as it is appended.
    ///
    /// Every request after the first is made once the throttle delay has passed. Returns the
    /// records of the run once the controller is idle again.
    pub fn run<F>(&mut self, mut on_record: F) -> &[ResolvedRecord]
    where
        F: FnMut(&ResolvedRecord),
    {
        loop {
            match self.step() {
                Step::Resolved(record) => on_record(record),
                Step::Finished => break,
            }

            if !self.pending.is_empty() {
                thread::sleep(self.delay);
            }
        }

        info!(
            "Resolved {} of {} DOI names",
            self.records.iter().filter(|r| r.is_success()).count(),
            self.records.len()
        );
        &self.records
    }

    /// Start a run for `text` and drain it, see [`Controller::start`] and [`Controller::run`].
    pub fn resolve<F>(&mut self, text: &str, on_record: F) -> &[ResolvedRecord]
    where
        F: FnMut(&ResolvedRecord),
    {
        self.start(text);
        self.run(on_record)
    }

    /// Drop the pending DOI names and return to [`State::Idle`].
    ///
    /// Records resolved so far are kept. Returns how many DOI names were dropped.
    pub fn cancel(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.state = State::Idle;

        if dropped > 0 {
            info!("Run cancelled - {dropped} DOI names were not resolved");
        }
        dropped
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Whether a run is in progress.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, State::Running)
    }

    /// The DOI names still to be resolved, head first.
    pub fn pending(&self) -> impl Iterator<Item = &Doi> {
        self.pending.iter()
    }

    /// The records of the current (or last) run in resolution order.
    #[must_use]
    pub fn records(&self) -> &[ResolvedRecord] {
        &self.records
    }

    /// Take the records of the last run, leaving none behind.
    pub fn take_records(&mut self) -> Vec<ResolvedRecord> {
        std::mem::take(&mut self.records)
    }

    /// The database of the successful records, see [`record::export_text`].
    #[must_use]
    pub fn export_text(&self) -> String {
        record::export_text(&self.records)
    }

    /// The configured throttle delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}
