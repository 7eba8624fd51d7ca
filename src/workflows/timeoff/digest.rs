use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::domain::{EnrichedRecord, GroupedRequests, JobTitleIndex};
use super::hr::HrGateway;
use super::message::format_digest_message;
use super::notifier::ChatNotifier;
use super::parser;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactWriteError {
    #[error("could not serialize digest artifact: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not write digest artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one pipeline stage. A failed stage carries the detail that was
/// also logged, so the run summary and exit status can surface it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    Completed,
    Failed { detail: String },
}

impl StageStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, StageStatus::Failed { .. })
    }

    fn failed(err: impl std::fmt::Display) -> Self {
        StageStatus::Failed {
            detail: err.to_string(),
        }
    }
}

/// Per-stage outcome of one digest run. No stage failure aborts the run;
/// this report is how callers tell a clean empty day from a degraded one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestRunReport {
    pub digest_date: NaiveDate,
    pub record_count: usize,
    pub requests_stage: StageStatus,
    pub directory_stage: StageStatus,
    pub artifact_stage: StageStatus,
    pub delivery_stage: StageStatus,
}

impl DigestRunReport {
    /// True when the digest came out empty because an upstream fetch failed,
    /// as opposed to a day with no approved time off.
    pub fn empty_due_to_upstream_failure(&self) -> bool {
        self.record_count == 0
            && (self.requests_stage.is_failed() || self.directory_stage.is_failed())
    }
}

/// Linear fetch -> join -> artifact -> delivery pipeline over the two
/// outbound seams.
#[derive(Debug)]
pub struct DailyDigestWorkflow {
    hr: Box<dyn HrGateway>,
    notifier: Box<dyn ChatNotifier>,
}

impl DailyDigestWorkflow {
    pub fn new(hr: Box<dyn HrGateway>, notifier: Box<dyn ChatNotifier>) -> Self {
        Self { hr, notifier }
    }

    pub fn run(&self, digest_date: NaiveDate, artifact_path: &Path) -> DigestRunReport {
        let (grouped, requests_stage) = self.fetch_approved_requests(digest_date);
        let (index, directory_stage) = self.fetch_job_titles();

        let records = enrich(&grouped, &index);
        info!(
            approved = grouped.len(),
            indexed = index.len(),
            published = records.len(),
            "joined approved requests with directory titles"
        );

        let artifact_stage = match write_artifact(artifact_path, &records) {
            Ok(()) => {
                info!(path = %artifact_path.display(), "digest artifact written");
                StageStatus::Completed
            }
            Err(err) => {
                warn!(%err, "failed to write digest artifact; continuing to delivery");
                StageStatus::failed(err)
            }
        };

        // The webhook is posted even when the digest is empty; an empty
        // message is the agreed signal for "nothing to report".
        let message = format_digest_message(&records);
        let delivery_stage = match self.notifier.post_message(&message) {
            Ok(()) => {
                info!("digest delivered to chat webhook");
                StageStatus::Completed
            }
            Err(err) => {
                warn!(%err, "failed to deliver digest to chat webhook");
                StageStatus::failed(err)
            }
        };

        DigestRunReport {
            digest_date,
            record_count: records.len(),
            requests_stage,
            directory_stage,
            artifact_stage,
            delivery_stage,
        }
    }

    fn fetch_approved_requests(&self, digest_date: NaiveDate) -> (GroupedRequests, StageStatus) {
        let body = match self.hr.fetch_time_off_requests(digest_date, digest_date) {
            Ok(body) => body,
            Err(err) => {
                warn!(%err, "time-off fetch failed; continuing with an empty result set");
                return (GroupedRequests::default(), StageStatus::failed(err));
            }
        };

        match parser::parse_approved_requests(&body) {
            Ok(requests) => (
                GroupedRequests::from_requests(requests),
                StageStatus::Completed,
            ),
            Err(err) => {
                warn!(%err, "time-off response was unparseable; continuing with an empty result set");
                (GroupedRequests::default(), StageStatus::failed(err))
            }
        }
    }

    fn fetch_job_titles(&self) -> (JobTitleIndex, StageStatus) {
        let body = match self.hr.fetch_employee_directory() {
            Ok(body) => body,
            Err(err) => {
                warn!(%err, "directory fetch failed; continuing with an empty index");
                return (JobTitleIndex::default(), StageStatus::failed(err));
            }
        };

        match parser::parse_job_titles(&body) {
            Ok(index) => (index, StageStatus::Completed),
            Err(err) => {
                warn!(%err, "directory response was unparseable; continuing with an empty index");
                (JobTitleIndex::default(), StageStatus::failed(err))
            }
        }
    }
}

/// The join: requests whose employee id is absent from the index are
/// dropped entirely. Group order and in-group encounter order carry through
/// to the flattened output.
fn enrich(grouped: &GroupedRequests, index: &JobTitleIndex) -> Vec<EnrichedRecord> {
    let mut records = Vec::new();
    for (_, requests) in grouped.iter() {
        for request in requests {
            if let Some(job_title) = index.job_title(&request.employee_id) {
                records.push(EnrichedRecord {
                    employee_id: request.employee_id.clone(),
                    employee_name: request.employee_name.clone(),
                    start_date: request.start_date.clone(),
                    end_date: request.end_date.clone(),
                    vacation_type: request.vacation_type.clone(),
                    job_title: job_title.to_string(),
                });
            }
        }
    }
    records
}

fn write_artifact(path: &Path, records: &[EnrichedRecord]) -> Result<(), ArtifactWriteError> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}
