use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::domain::{JobTitleIndex, TimeOffRequest};

#[derive(Debug, thiserror::Error)]
pub enum FeedParseError {
    #[error("malformed XML in HR response: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed attribute in HR response: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
}

/// Extracts the approved requests from the time-off feed in encounter order.
/// Requests with any other status are excluded here; the comparison is exact
/// and case-sensitive.
pub(crate) fn parse_approved_requests(xml: &str) -> Result<Vec<TimeOffRequest>, FeedParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut approved = Vec::new();
    let mut pending: Option<PendingRequest> = None;
    let mut field: Option<RequestField> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => match start.name().as_ref() {
                b"request" => {
                    pending = Some(PendingRequest::default());
                    field = None;
                }
                b"employee" if pending.is_some() => {
                    if let Some(request) = pending.as_mut() {
                        request.employee_id = attribute_value(&start, "id")?;
                    }
                    field = Some(RequestField::EmployeeName);
                }
                b"start" if pending.is_some() => field = Some(RequestField::Start),
                b"end" if pending.is_some() => field = Some(RequestField::End),
                b"type" if pending.is_some() => field = Some(RequestField::VacationType),
                b"status" if pending.is_some() => field = Some(RequestField::Status),
                _ => field = None,
            },
            Event::Empty(start) => {
                if start.name().as_ref() == b"employee" {
                    if let Some(request) = pending.as_mut() {
                        request.employee_id = attribute_value(&start, "id")?;
                    }
                }
                field = None;
            }
            Event::Text(text) => {
                if let (Some(request), Some(field)) = (pending.as_mut(), field) {
                    request.append(field, &text.unescape()?);
                }
            }
            Event::End(end) => {
                if end.name().as_ref() == b"request" {
                    if let Some(request) = pending.take().and_then(PendingRequest::into_approved) {
                        approved.push(request);
                    }
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(approved)
}

/// Builds the id -> job title index from the employee directory feed. Every
/// employee element is indexed; a missing or empty jobTitle field stores the
/// sentinel instead of dropping the entry.
pub(crate) fn parse_job_titles(xml: &str) -> Result<JobTitleIndex, FeedParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut index = JobTitleIndex::default();
    let mut employee: Option<PendingEmployee> = None;
    let mut in_job_title = false;

    loop {
        match reader.read_event()? {
            Event::Start(start) => match start.name().as_ref() {
                b"employee" => {
                    employee = Some(PendingEmployee {
                        id: attribute_value(&start, "id")?,
                        job_title: None,
                    });
                    in_job_title = false;
                }
                b"field" => {
                    in_job_title = employee.is_some()
                        && attribute_value(&start, "id")?.as_deref() == Some("jobTitle");
                }
                _ => in_job_title = false,
            },
            Event::Empty(start) => {
                if start.name().as_ref() == b"employee" {
                    if let Some(id) = attribute_value(&start, "id")? {
                        index.insert(id, None);
                    }
                }
                in_job_title = false;
            }
            Event::Text(text) => {
                if in_job_title {
                    if let Some(employee) = employee.as_mut() {
                        let value = text.unescape()?;
                        match employee.job_title.as_mut() {
                            Some(existing) => existing.push_str(&value),
                            None => employee.job_title = Some(value.into_owned()),
                        }
                    }
                }
            }
            Event::End(end) => {
                match end.name().as_ref() {
                    b"employee" => {
                        if let Some(PendingEmployee {
                            id: Some(id),
                            job_title,
                        }) = employee.take()
                        {
                            index.insert(id, job_title);
                        }
                    }
                    b"field" => in_job_title = false,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(index)
}

fn attribute_value(start: &BytesStart<'_>, name: &str) -> Result<Option<String>, FeedParseError> {
    match start.try_get_attribute(name)? {
        Some(attribute) => Ok(Some(attribute.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

#[derive(Debug, Default)]
struct PendingRequest {
    employee_id: Option<String>,
    employee_name: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    vacation_type: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum RequestField {
    EmployeeName,
    Start,
    End,
    VacationType,
    Status,
}

impl PendingRequest {
    fn append(&mut self, field: RequestField, value: &str) {
        let slot = match field {
            RequestField::EmployeeName => &mut self.employee_name,
            RequestField::Start => &mut self.start_date,
            RequestField::End => &mut self.end_date,
            RequestField::VacationType => &mut self.vacation_type,
            RequestField::Status => &mut self.status,
        };
        match slot {
            Some(existing) => existing.push_str(value),
            None => *slot = Some(value.to_string()),
        }
    }

    fn into_approved(self) -> Option<TimeOffRequest> {
        if self.status.as_deref() != Some("approved") {
            return None;
        }

        // The feed can include requests for employees the directory no
        // longer knows; only the id itself is required here.
        let employee_id = self.employee_id?;
        Some(TimeOffRequest {
            employee_id,
            employee_name: self.employee_name.unwrap_or_default(),
            start_date: self.start_date.unwrap_or_default(),
            end_date: self.end_date.unwrap_or_default(),
            vacation_type: self.vacation_type.unwrap_or_default(),
        })
    }
}

#[derive(Debug)]
struct PendingEmployee {
    id: Option<String>,
    job_title: Option<String>,
}
