use serde::Serialize;
use std::collections::HashMap;

/// Sentinel stored when a directory entry carries no usable job title.
pub const JOB_TITLE_NOT_FOUND: &str = "Job Title Not Found";

/// One approved time-off request as returned by the HR feed. Dates stay in
/// the feed's ISO `YYYY-MM-DD` form; the digest does no date arithmetic on
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOffRequest {
    pub employee_id: String,
    pub employee_name: String,
    pub start_date: String,
    pub end_date: String,
    pub vacation_type: String,
}

/// Approved requests grouped by vacation type. Groups keep the first-seen
/// order of their type across the feed traversal, and requests keep their
/// encounter order within a group, so output ordering is deterministic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GroupedRequests {
    groups: Vec<(String, Vec<TimeOffRequest>)>,
}

impl GroupedRequests {
    pub fn from_requests(requests: impl IntoIterator<Item = TimeOffRequest>) -> Self {
        let mut grouped = Self::default();
        for request in requests {
            grouped.push(request);
        }
        grouped
    }

    pub fn push(&mut self, request: TimeOffRequest) {
        match self
            .groups
            .iter_mut()
            .find(|(vacation_type, _)| *vacation_type == request.vacation_type)
        {
            Some((_, requests)) => requests.push(request),
            None => self
                .groups
                .push((request.vacation_type.clone(), vec![request])),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TimeOffRequest])> {
        self.groups
            .iter()
            .map(|(vacation_type, requests)| (vacation_type.as_str(), requests.as_slice()))
    }

    /// Total request count across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, requests)| requests.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Lookup from employee id to job title built from the directory feed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JobTitleIndex {
    titles: HashMap<String, String>,
}

impl JobTitleIndex {
    /// Indexes an employee. A missing or blank title stores the sentinel so
    /// the employee still resolves during the join.
    pub fn insert(&mut self, employee_id: String, job_title: Option<String>) {
        let title = job_title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| JOB_TITLE_NOT_FOUND.to_string());
        self.titles.insert(employee_id, title);
    }

    pub fn job_title(&self, employee_id: &str) -> Option<&str> {
        self.titles.get(employee_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// A time-off request joined with its resolved job title. Only requests
/// whose employee id resolved in the index become enriched records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedRecord {
    pub employee_id: String,
    pub employee_name: String,
    pub start_date: String,
    pub end_date: String,
    pub vacation_type: String,
    pub job_title: String,
}
