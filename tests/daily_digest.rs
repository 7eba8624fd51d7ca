use std::fs;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use timeoff_digest::workflows::timeoff::domain::JOB_TITLE_NOT_FOUND;
use timeoff_digest::workflows::timeoff::{
    ChatNotifier, DailyDigestWorkflow, HrGateway, HrGatewayError, NotifyError,
};

const TIME_OFF_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<requests>
  <request id="1421">
    <employee id="101">Ada Lovelace</employee>
    <start>2026-08-08</start>
    <end>2026-08-11</end>
    <type id="78">Vacation</type>
    <status lastChanged="2026-08-01">approved</status>
  </request>
  <request id="1422">
    <employee id="102">Grace Hopper</employee>
    <start>2026-08-08</start>
    <end>2026-08-08</end>
    <type id="79">Sick Leave</type>
    <status>approved</status>
  </request>
  <request id="1423">
    <employee id="103">Alan Turing</employee>
    <start>2026-08-08</start>
    <end>2026-08-09</end>
    <type id="78">Vacation</type>
    <status>denied</status>
  </request>
</requests>"#;

const DIRECTORY_FEED: &str = r#"<?xml version="1.0"?>
<directory>
  <fieldset>
    <field id="displayName">Display name</field>
    <field id="jobTitle">Job title</field>
  </fieldset>
  <employees>
    <employee id="101">
      <field id="displayName">Ada Lovelace</field>
      <field id="jobTitle">Staff Engineer</field>
    </employee>
    <employee id="102">
      <field id="displayName">Grace Hopper</field>
    </employee>
    <employee id="999">
      <field id="displayName">Inactive Employee</field>
      <field id="jobTitle">Archivist</field>
    </employee>
  </employees>
</directory>"#;

#[derive(Debug)]
enum CannedResponse {
    Body(&'static str),
    Failure { status: u16, body: &'static str },
}

#[derive(Debug)]
struct FakeHrGateway {
    time_off: CannedResponse,
    directory: CannedResponse,
}

impl FakeHrGateway {
    fn respond(canned: &CannedResponse) -> Result<String, HrGatewayError> {
        match canned {
            CannedResponse::Body(body) => Ok((*body).to_string()),
            CannedResponse::Failure { status, body } => Err(HrGatewayError::Status {
                status: *status,
                body: (*body).to_string(),
            }),
        }
    }
}

impl HrGateway for FakeHrGateway {
    fn fetch_time_off_requests(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<String, HrGatewayError> {
        Self::respond(&self.time_off)
    }

    fn fetch_employee_directory(&self) -> Result<String, HrGatewayError> {
        Self::respond(&self.directory)
    }
}

#[derive(Debug, Default)]
struct RecordingNotifier {
    posts: Arc<Mutex<Vec<String>>>,
}

impl ChatNotifier for RecordingNotifier {
    fn post_message(&self, text: &str) -> Result<(), NotifyError> {
        self.posts
            .lock()
            .expect("notifier mutex poisoned")
            .push(text.to_string());
        Ok(())
    }
}

fn digest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 8).expect("valid digest date")
}

fn workflow_with(
    time_off: CannedResponse,
    directory: CannedResponse,
) -> (DailyDigestWorkflow, Arc<Mutex<Vec<String>>>) {
    let notifier = RecordingNotifier::default();
    let posts = Arc::clone(&notifier.posts);
    let gateway = FakeHrGateway { time_off, directory };
    (
        DailyDigestWorkflow::new(Box::new(gateway), Box::new(notifier)),
        posts,
    )
}

#[test]
fn round_trip_publishes_joined_records() {
    let dir = tempfile::tempdir().expect("temp dir");
    let artifact_path = dir.path().join("output.json");
    let (workflow, posts) = workflow_with(
        CannedResponse::Body(TIME_OFF_FEED),
        CannedResponse::Body(DIRECTORY_FEED),
    );

    let report = workflow.run(digest_date(), &artifact_path);

    assert_eq!(report.record_count, 2);
    assert!(!report.requests_stage.is_failed());
    assert!(!report.directory_stage.is_failed());
    assert!(!report.artifact_stage.is_failed());
    assert!(!report.delivery_stage.is_failed());
    assert!(!report.empty_due_to_upstream_failure());

    let artifact = fs::read_to_string(&artifact_path).expect("artifact readable");
    let records: serde_json::Value = serde_json::from_str(&artifact).expect("artifact is JSON");
    let records = records.as_array().expect("artifact is an array");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["employee_id"], "101");
    assert_eq!(records[0]["job_title"], "Staff Engineer");
    assert_eq!(records[0]["vacation_type"], "Vacation");
    assert_eq!(records[1]["employee_id"], "102");
    assert_eq!(records[1]["job_title"], JOB_TITLE_NOT_FOUND);

    let posts = posts.lock().expect("notifier mutex poisoned");
    assert_eq!(posts.len(), 1);
    let message = &posts[0];
    assert_eq!(message.matches("From:").count(), 2);
    assert_eq!(message.matches("*On Vacation*").count(), 1);
    assert_eq!(message.matches("*On Sick Leave*").count(), 1);
    assert!(message.contains("Grace Hopper (Job Title Not Found)"));
    // The denied request never reaches the digest.
    assert!(!message.contains("Alan Turing"));
}

#[test]
fn approved_request_without_directory_entry_is_excluded() {
    let feed = r#"<requests>
  <request id="1">
    <employee id="101">Ada Lovelace</employee>
    <start>2026-08-08</start>
    <end>2026-08-11</end>
    <type>Vacation</type>
    <status>approved</status>
  </request>
  <request id="2">
    <employee id="104">Departed Employee</employee>
    <start>2026-08-08</start>
    <end>2026-08-08</end>
    <type>Vacation</type>
    <status>approved</status>
  </request>
</requests>"#;

    let dir = tempfile::tempdir().expect("temp dir");
    let artifact_path = dir.path().join("output.json");
    let (workflow, posts) = workflow_with(
        CannedResponse::Body(feed),
        CannedResponse::Body(DIRECTORY_FEED),
    );

    let report = workflow.run(digest_date(), &artifact_path);

    assert_eq!(report.record_count, 1);
    let artifact = fs::read_to_string(&artifact_path).expect("artifact readable");
    assert!(artifact.contains("\"101\""));
    assert!(!artifact.contains("\"104\""));

    let posts = posts.lock().expect("notifier mutex poisoned");
    assert!(!posts[0].contains("Departed Employee"));
}

#[test]
fn failed_time_off_fetch_still_notifies_with_empty_digest() {
    let dir = tempfile::tempdir().expect("temp dir");
    let artifact_path = dir.path().join("output.json");
    let (workflow, posts) = workflow_with(
        CannedResponse::Failure {
            status: 500,
            body: "upstream exploded",
        },
        CannedResponse::Body(DIRECTORY_FEED),
    );

    let report = workflow.run(digest_date(), &artifact_path);

    assert_eq!(report.record_count, 0);
    assert!(report.requests_stage.is_failed());
    assert!(!report.directory_stage.is_failed());
    assert!(report.empty_due_to_upstream_failure());

    assert_eq!(
        fs::read_to_string(&artifact_path).expect("artifact readable"),
        "[]"
    );

    let posts = posts.lock().expect("notifier mutex poisoned");
    assert_eq!(posts.len(), 1);
    assert!(posts[0].is_empty(), "empty digest still posts an empty message");
}

#[test]
fn malformed_time_off_feed_degrades_like_an_http_failure() {
    let dir = tempfile::tempdir().expect("temp dir");
    let artifact_path = dir.path().join("output.json");
    let (workflow, posts) = workflow_with(
        CannedResponse::Body("<requests><request></mismatch></requests>"),
        CannedResponse::Body(DIRECTORY_FEED),
    );

    let report = workflow.run(digest_date(), &artifact_path);

    assert_eq!(report.record_count, 0);
    assert!(report.requests_stage.is_failed());
    assert!(report.empty_due_to_upstream_failure());
    assert_eq!(posts.lock().expect("notifier mutex poisoned").len(), 1);
}

#[test]
fn identical_feeds_produce_byte_identical_artifacts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let first_path = dir.path().join("first.json");
    let second_path = dir.path().join("second.json");

    let (workflow, _posts) = workflow_with(
        CannedResponse::Body(TIME_OFF_FEED),
        CannedResponse::Body(DIRECTORY_FEED),
    );

    workflow.run(digest_date(), &first_path);
    workflow.run(digest_date(), &second_path);

    let first = fs::read(&first_path).expect("first artifact readable");
    let second = fs::read(&second_path).expect("second artifact readable");
    assert_eq!(first, second);
}
