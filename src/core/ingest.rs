//! CSV reference-table parsing.
//!
//! Motivational rows: `event,age_group,gender,course,level,time`.
//! Recruiting rows: `division,event,gender,course,time`.
//! Every field is validated here so a bad row is rejected at load time,
//! never at query time.

use crate::domain::event::{AgeGroup, Course, Event, Gender};
use crate::domain::model::{Division, Level, RecruitingEntry, StandardEntry};
use crate::domain::time::SwimTime;
use crate::utils::error::{Result, SwimBenchError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct MotivationalRow {
    event: String,
    age_group: String,
    gender: String,
    course: String,
    level: String,
    time: String,
}

#[derive(Debug, Deserialize)]
struct RecruitingRow {
    division: String,
    event: String,
    gender: String,
    course: String,
    time: String,
}

fn reader(data: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(data)
}

/// Re-labels a field error with the table and line it came from.
fn at_line<T>(source_name: &str, line: u64, result: Result<T>) -> Result<T> {
    result.map_err(|e| {
        let reason = match e {
            SwimBenchError::ValidationError { field, message } => format!("{}: {}", field, message),
            other => other.to_string(),
        };
        SwimBenchError::ReferenceDataError {
            source_name: source_name.to_string(),
            line,
            reason,
        }
    })
}

fn parse_event_in_course(event: &str, course: &str) -> Result<(Event, Course)> {
    let course: Course = course.parse()?;
    let event: Event = event.parse()?;
    event.ensure_swum_in(course)?;
    Ok((event, course))
}

fn motivational_entry(row: &MotivationalRow) -> Result<StandardEntry> {
    let (event, course) = parse_event_in_course(&row.event, &row.course)?;
    Ok(StandardEntry {
        event,
        course,
        age_group: row.age_group.parse::<AgeGroup>()?,
        gender: row.gender.parse::<Gender>()?,
        level: row.level.parse::<Level>()?,
        time: row.time.parse::<SwimTime>()?,
    })
}

fn recruiting_entry(row: &RecruitingRow) -> Result<RecruitingEntry> {
    let (event, course) = parse_event_in_course(&row.event, &row.course)?;
    Ok(RecruitingEntry {
        division: row.division.parse::<Division>()?,
        event,
        gender: row.gender.parse::<Gender>()?,
        course,
        time: row.time.parse::<SwimTime>()?,
    })
}

pub fn parse_motivational(source_name: &str, data: &[u8]) -> Result<Vec<StandardEntry>> {
    let mut rdr = reader(data);
    let headers = rdr.headers()?.clone();
    let mut entries = Vec::new();

    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: MotivationalRow = record.deserialize(Some(&headers))?;

        entries.push(at_line(source_name, line, motivational_entry(&row))?);
    }

    tracing::debug!("Parsed {} motivational rows from {}", entries.len(), source_name);
    Ok(entries)
}

pub fn parse_recruiting(source_name: &str, data: &[u8]) -> Result<Vec<RecruitingEntry>> {
    let mut rdr = reader(data);
    let headers = rdr.headers()?.clone();
    let mut entries = Vec::new();

    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: RecruitingRow = record.deserialize(Some(&headers))?;

        entries.push(at_line(source_name, line, recruiting_entry(&row))?);
    }

    tracing::debug!("Parsed {} recruiting rows from {}", entries.len(), source_name);
    Ok(entries)
}
