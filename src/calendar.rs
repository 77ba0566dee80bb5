//! Calendar ingestion.
//!
//! Reads the `VEVENT`s of an iCalendar (`.ics`) export, folds every event
//! onto its weekday to get the mentor's recurring busy windows, and derives
//! free windows as the complement of those within a daily span.
//!
//! Only what the matcher needs is read: `DTSTART`, `DTEND` and `SUMMARY`.
//! Date-times are taken as wall-clock times; a trailing `Z` or a `TZID`
//! parameter is ignored since windows carry no time zone.
//!
//! # Reference
//! RFC 5545, "Internet Calendaring and Scheduling Core Object Specification"

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::CalendarError;
use crate::models::{Interval, Weekday, WeeklyTimeWindow};
use crate::validation::{Diagnostic, DiagnosticKind};

/// Busy windows read from a calendar.
#[derive(Debug, Clone, Default)]
pub struct ImportedCalendar {
    /// Distinct busy windows, in order of first appearance.
    pub busy: Vec<WeeklyTimeWindow>,
    /// Events that could not be used.
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Default)]
struct RawEvent {
    summary: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

/// Parses an iCalendar document into busy windows.
///
/// Fails only on structural problems (unbalanced `BEGIN`/`END`, unreadable
/// date-times). All-day, multi-day and zero-length events are skipped and
/// reported as diagnostics.
pub fn parse_ics(text: &str) -> Result<ImportedCalendar, CalendarError> {
    let mut imported = ImportedCalendar::default();
    let mut current: Option<(usize, RawEvent)> = None;
    let mut count = 0usize;

    for (idx, line) in unfold(text).iter().enumerate() {
        let line_no = idx + 1;
        let Some((name, value)) = split_property(line) else {
            continue;
        };

        match (name.as_str(), current.as_mut()) {
            ("BEGIN", None) if value == "VEVENT" => current = Some((line_no, RawEvent::default())),
            ("BEGIN", Some(_)) if value == "VEVENT" => {
                return Err(CalendarError {
                    line: line_no,
                    message: "nested VEVENT".into(),
                })
            }
            ("END", Some(_)) if value == "VEVENT" => {
                if let Some((begin, event)) = current.take() {
                    count += 1;
                    let label = event
                        .summary
                        .clone()
                        .unwrap_or_else(|| format!("event {count}"));
                    match event_window(&event, begin)? {
                        Ok(window) => {
                            if !imported.busy.contains(&window) {
                                imported.busy.push(window);
                            }
                        }
                        Err(reason) => imported.diagnostics.push(Diagnostic::new(
                            DiagnosticKind::SkippedCalendarEvent,
                            label,
                            reason,
                        )),
                    }
                }
            }
            ("END", None) if value == "VEVENT" => {
                return Err(CalendarError {
                    line: line_no,
                    message: "END:VEVENT without BEGIN".into(),
                })
            }
            ("SUMMARY", Some((_, event))) => event.summary = Some(value.to_string()),
            ("DTSTART", Some((_, event))) => event.start = Some(value.to_string()),
            ("DTEND", Some((_, event))) => event.end = Some(value.to_string()),
            _ => {}
        }
    }

    if let Some((begin, _)) = current {
        return Err(CalendarError {
            line: begin,
            message: "unterminated VEVENT".into(),
        });
    }
    Ok(imported)
}

/// Free windows: `day_span` minus busy time, for each of `days`.
///
/// `day_span` is clamped to the day. Days with no busy windows are free for
/// the whole span.
pub fn free_from_busy(
    busy: &[WeeklyTimeWindow],
    day_span: Interval,
    days: &[Weekday],
) -> Vec<WeeklyTimeWindow> {
    let span = Interval::new(
        day_span.start_min.max(0),
        day_span.end_min.min(Interval::full_day().end_min),
    );

    days.iter()
        .flat_map(|&day| {
            let blocked: Vec<Interval> = busy
                .iter()
                .filter(|w| w.weekday() == day)
                .map(|w| w.effective_interval())
                .collect();
            span.subtract(&blocked)
                .into_iter()
                .filter_map(move |free| WeeklyTimeWindow::new(day, free.start_min, free.end_min))
        })
        .collect()
}

/// Joins folded continuation lines (leading space or tab).
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        let raw = raw.trim_end_matches('\r');
        match (raw.strip_prefix([' ', '\t']), lines.last_mut()) {
            (Some(rest), Some(last)) => last.push_str(rest),
            _ => lines.push(raw.to_string()),
        }
    }
    lines
}

/// Splits `NAME;PARAM=..:value` into an upper-cased name and the value.
fn split_property(line: &str) -> Option<(String, &str)> {
    let (head, value) = line.split_once(':')?;
    let name = head.split(';').next().unwrap_or(head);
    Some((name.trim().to_ascii_uppercase(), value.trim()))
}

/// The event's weekly window, or the reason it cannot have one.
fn event_window(event: &RawEvent, line: usize) -> Result<Result<WeeklyTimeWindow, String>, CalendarError> {
    let (Some(start), Some(end)) = (&event.start, &event.end) else {
        return Ok(Err("missing DTSTART or DTEND".into()));
    };
    let (Some(start), Some(end)) = (parse_date_time(start, line)?, parse_date_time(end, line)?) else {
        return Ok(Err("all-day event".into()));
    };

    let start_min = minute_of_day(&start);
    let end_min = if end.date() == start.date() {
        minute_of_day(&end)
    } else if end.date() == start.date().succ_opt().unwrap_or(start.date()) && minute_of_day(&end) == 0 {
        Interval::full_day().end_min
    } else {
        return Ok(Err("spans more than one day".into()));
    };

    Ok(WeeklyTimeWindow::new(start.weekday().into(), start_min, end_min)
        .ok_or_else(|| "ends before it starts".to_string()))
}

/// `None` for date-only values.
fn parse_date_time(value: &str, line: usize) -> Result<Option<NaiveDateTime>, CalendarError> {
    let value = value.trim_end_matches('Z');
    if value.len() == 8 {
        return NaiveDate::parse_from_str(value, "%Y%m%d")
            .map(|_| None)
            .map_err(|e| CalendarError {
                line,
                message: format!("bad date '{value}': {e}"),
            });
    }
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .map(Some)
        .map_err(|e| CalendarError {
            line,
            message: format!("bad date-time '{value}': {e}"),
        })
}

fn minute_of_day(t: &NaiveDateTime) -> i32 {
    (t.hour() * 60 + t.minute()) as i32
}
