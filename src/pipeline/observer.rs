//! Pipeline observer: hooks for logging, profiling and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic. Use cases include timing stages and emitting structured
//! telemetry; [`RecordingObserver`] keeps every report for later inspection.

use std::time::{Duration, Instant};

/// Morphological analysis of the input text.
pub const STAGE_TOKENIZE: &str = "tokenize";
/// Frequency report.
pub const STAGE_REPORT: &str = "report";
/// Word-cloud source list.
pub const STAGE_WORD_CLOUD: &str = "word_cloud";
/// Co-occurrence network.
pub const STAGE_NETWORK: &str = "network";
/// Keyword-in-context search.
pub const STAGE_KWIC: &str = "kwic";

/// Measurements for one completed stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    elapsed: Duration,
    items: Option<usize>,
    nodes: Option<usize>,
    edges: Option<usize>,
    cache_hit: bool,
}

impl StageReport {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::default()
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Rows, words, morphemes or hits the stage produced.
    pub fn items(&self) -> Option<usize> {
        self.items
    }

    pub fn nodes(&self) -> Option<usize> {
        self.nodes
    }

    pub fn edges(&self) -> Option<usize> {
        self.edges
    }

    /// Whether the result came from a memo cache.
    pub fn cache_hit(&self) -> bool {
        self.cache_hit
    }
}

/// Fluent construction of a [`StageReport`] with optional metrics.
#[derive(Debug)]
pub struct StageReportBuilder {
    report: StageReport,
}

impl StageReportBuilder {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            report: StageReport::new(elapsed),
        }
    }

    pub fn items(mut self, items: usize) -> Self {
        self.report.items = Some(items);
        self
    }

    pub fn nodes(mut self, nodes: usize) -> Self {
        self.report.nodes = Some(nodes);
        self
    }

    pub fn edges(mut self, edges: usize) -> Self {
        self.report.edges = Some(edges);
        self
    }

    pub fn cache_hit(mut self, hit: bool) -> Self {
        self.report.cache_hit = hit;
        self
    }

    pub fn build(self) -> StageReport {
        self.report
    }
}

/// Wall-clock timer for a stage.
#[derive(Debug, Clone, Copy)]
pub struct StageClock(Instant);

impl StageClock {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Receives stage boundary notifications. Both hooks default to no-ops.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}
}

/// Ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Keeps the report of every completed stage, in completion order.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    started: Vec<&'static str>,
    reports: Vec<(&'static str, StageReport)>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages in the order they started.
    pub fn started(&self) -> &[&'static str] {
        &self.started
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    /// The report of the most recent run of `stage`.
    pub fn report(&self, stage: &str) -> Option<&StageReport> {
        self.reports
            .iter()
            .rev()
            .find(|(name, _)| *name == stage)
            .map(|(_, report)| report)
    }

    /// Sum of all recorded stage durations.
    pub fn total_elapsed(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed()).sum()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_stage_start(&mut self, stage: &'static str) {
        self.started.push(stage);
    }

    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, report.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_optional_metrics() {
        let report = StageReportBuilder::new(Duration::from_millis(3))
            .nodes(4)
            .edges(5)
            .build();
        assert_eq!(report.elapsed(), Duration::from_millis(3));
        assert_eq!(report.nodes(), Some(4));
        assert_eq!(report.edges(), Some(5));
        assert_eq!(report.items(), None);
        assert!(!report.cache_hit());
    }

    #[test]
    fn test_recording_observer_keeps_order() {
        let mut obs = RecordingObserver::new();
        for stage in [STAGE_TOKENIZE, STAGE_REPORT] {
            obs.on_stage_start(stage);
            obs.on_stage_end(stage, &StageReport::new(Duration::from_millis(1)));
        }
        obs.on_stage_start(STAGE_REPORT);
        obs.on_stage_end(
            STAGE_REPORT,
            &StageReportBuilder::new(Duration::from_millis(2)).items(7).build(),
        );

        assert_eq!(obs.started(), &[STAGE_TOKENIZE, STAGE_REPORT, STAGE_REPORT]);
        assert_eq!(obs.reports().len(), 3);
        assert_eq!(obs.report(STAGE_REPORT).unwrap().items(), Some(7));
        assert_eq!(obs.total_elapsed(), Duration::from_millis(4));
        assert!(obs.report(STAGE_KWIC).is_none());
    }

    #[test]
    fn test_stage_clock_is_monotonic() {
        let clock = StageClock::start();
        let a = clock.elapsed();
        let b = clock.elapsed();
        assert!(b >= a);
    }
}
