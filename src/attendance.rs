use crate::model::{AttendanceStatus, DailyAttendance};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// A calendar month counted towards a term. `month` is zero-based (January
/// is 0); `year_offset` is relative to the year the academic session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermMonth {
    pub month: u32,
    pub year_offset: i32,
}

const fn tm(month: u32, year_offset: i32) -> TermMonth {
    TermMonth { month, year_offset }
}

const TERM1_MONTHS: [TermMonth; 4] = [tm(3, 0), tm(4, 0), tm(5, 0), tm(6, 0)];
const TERM2_MONTHS: [TermMonth; 3] = [tm(7, 0), tm(8, 0), tm(9, 0)];
// The session crosses the calendar year, so January..March belong to the next year.
const TERM3_MONTHS: [TermMonth; 5] = [tm(10, 0), tm(11, 0), tm(0, 1), tm(1, 1), tm(2, 1)];

pub fn months_for_term(exam_id: &str) -> &'static [TermMonth] {
    match exam_id.trim() {
        "terminal1" => &TERM1_MONTHS,
        "terminal2" => &TERM2_MONTHS,
        "terminal3" => &TERM3_MONTHS,
        _ => &[],
    }
}

fn calendar_year(academic_year_start: i32, m: &TermMonth) -> Option<i32> {
    academic_year_start.checked_add(m.year_offset)
}

/// `YYYY-MM` keys for each month of the term, for the session starting in
/// `academic_year_start`. Months whose year would overflow are left out.
pub fn term_month_keys(exam_id: &str, academic_year_start: i32) -> Vec<String> {
    months_for_term(exam_id)
        .iter()
        .filter_map(|m| {
            calendar_year(academic_year_start, m).map(|y| format!("{:04}-{:02}", y, m.month + 1))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceTotals {
    pub present: u32,
    pub absent: u32,
    pub leave: u32,
}

impl AttendanceTotals {
    pub fn days_recorded(&self) -> u32 {
        self.present + self.absent + self.leave
    }

    fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Leave => self.leave += 1,
        }
    }
}

/// Per-person totals over the days that fall inside the term's months.
/// Days outside the term are ignored; unparsable dates are skipped.
pub fn summarize_term_attendance(
    exam_id: &str,
    academic_year_start: i32,
    days: &[DailyAttendance],
) -> BTreeMap<String, AttendanceTotals> {
    let months = months_for_term(exam_id);
    let mut totals: BTreeMap<String, AttendanceTotals> = BTreeMap::new();
    if months.is_empty() {
        return totals;
    }

    for day in days {
        let Ok(date) = NaiveDate::parse_from_str(day.date.trim(), "%Y-%m-%d") else {
            warn!(date = %day.date, "skipping attendance record with invalid date");
            continue;
        };
        let in_term = months.iter().any(|m| {
            date.month0() == m.month && calendar_year(academic_year_start, m) == Some(date.year())
        });
        if !in_term {
            continue;
        }
        for (person_id, status) in &day.statuses {
            totals.entry(person_id.clone()).or_default().add(*status);
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn day(date: &str, entries: &[(&str, AttendanceStatus)]) -> DailyAttendance {
        DailyAttendance {
            date: date.to_string(),
            statuses: entries
                .iter()
                .map(|(id, s)| (id.to_string(), *s))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn term_tables() {
        let months: Vec<u32> = months_for_term("terminal1").iter().map(|m| m.month).collect();
        assert_eq!(months, vec![3, 4, 5, 6]);
        assert_eq!(months_for_term("terminal2").len(), 3);

        let third = months_for_term("terminal3");
        assert_eq!(third.len(), 5);
        assert!(third[..2].iter().all(|m| m.year_offset == 0));
        assert!(third[2..].iter().all(|m| m.year_offset == 1));

        assert!(months_for_term("final").is_empty());
    }

    #[test]
    fn month_keys_cross_the_year_boundary() {
        assert_eq!(
            term_month_keys("terminal3", 2024),
            vec!["2024-11", "2024-12", "2025-01", "2025-02", "2025-03"]
        );
        assert!(term_month_keys("unknown", 2024).is_empty());
    }

    #[test]
    fn year_overflow_drops_months_instead_of_panicking() {
        assert_eq!(
            term_month_keys("terminal3", i32::MAX),
            vec![format!("{}-11", i32::MAX), format!("{}-12", i32::MAX)]
        );
        let days = [day("2025-01-10", &[("s1", AttendanceStatus::Present)])];
        assert!(summarize_term_attendance("terminal3", i32::MAX, &days).is_empty());
    }

    #[test]
    fn summary_counts_only_term_days() {
        use AttendanceStatus::*;
        let days = vec![
            day("2024-04-02", &[("s1", Present), ("s2", Absent)]),
            day("2024-07-31", &[("s1", Leave), ("s2", Present)]),
            day("2024-08-01", &[("s1", Absent)]),
            day("2025-04-03", &[("s1", Absent)]),
            day("02/04/2024", &[("s1", Absent)]),
        ];
        let totals = summarize_term_attendance("terminal1", 2024, &days);
        assert_eq!(
            totals["s1"],
            AttendanceTotals {
                present: 1,
                absent: 0,
                leave: 1
            }
        );
        assert_eq!(totals["s2"].present, 1);
        assert_eq!(totals["s2"].days_recorded(), 2);

        let overlap = [day("2025-02-14", &[("s1", Present)])];
        let third = summarize_term_attendance("terminal3", 2024, &overlap);
        assert_eq!(third["s1"].present, 1);
        assert!(summarize_term_attendance("terminal9", 2024, &days).is_empty());
    }
}
