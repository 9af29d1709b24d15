use crate::model::Grade;
use chrono::NaiveDate;

const STORAGE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// `YYYY-MM-DD` to `DD/MM/YYYY`. `None` when the input is not a real date.
pub fn format_date_for_display(stored: &str) -> Option<String> {
    NaiveDate::parse_from_str(stored.trim(), STORAGE_FORMAT)
        .ok()
        .map(|d| d.format(DISPLAY_FORMAT).to_string())
}

/// `DD/MM/YYYY` to `YYYY-MM-DD`. `None` when the input is not a real date.
pub fn format_date_for_storage(displayed: &str) -> Option<String> {
    NaiveDate::parse_from_str(displayed.trim(), DISPLAY_FORMAT)
        .ok()
        .map(|d| d.format(STORAGE_FORMAT).to_string())
}

pub fn grade_code(grade: Grade) -> &'static str {
    match grade {
        Grade::Nursery => "NUR",
        Grade::Lkg => "LKG",
        Grade::Ukg => "UKG",
        Grade::One => "G01",
        Grade::Two => "G02",
        Grade::Three => "G03",
        Grade::Four => "G04",
        Grade::Five => "G05",
        Grade::Six => "G06",
        Grade::Seven => "G07",
        Grade::Eight => "G08",
        Grade::Nine => "G09",
        Grade::Ten => "G10",
    }
}

fn grade_from_code(code: &str) -> Option<Grade> {
    Grade::ALL.into_iter().find(|g| grade_code(*g) == code)
}

/// Student ids look like `2024-G05-012`: admission year, grade code, serial.
pub fn format_student_id(admission_year: i32, grade: Grade, serial: u32) -> String {
    format!("{:04}-{}-{:03}", admission_year, grade_code(grade), serial)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentIdParts {
    pub admission_year: i32,
    pub grade: Grade,
    pub serial: u32,
}

pub fn parse_student_id(id: &str) -> Option<StudentIdParts> {
    let mut parts = id.trim().splitn(3, '-');
    let year = parts.next()?;
    let code = parts.next()?;
    let serial = parts.next()?;
    if year.len() != 4 || serial.is_empty() {
        return None;
    }
    Some(StudentIdParts {
        admission_year: year.parse().ok()?,
        grade: grade_from_code(&code.to_ascii_uppercase())?,
        serial: serial.parse().ok()?,
    })
}

pub fn format_staff_id(serial: u32) -> String {
    format!("STF-{:04}", serial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn dates_convert_both_ways() {
        assert_eq!(format_date_for_display("2024-04-15").as_deref(), Some("15/04/2024"));
        assert_eq!(format_date_for_storage("01/12/2023").as_deref(), Some("2023-12-01"));
        assert_eq!(format_date_for_display("2023-02-29"), None);
        assert_eq!(format_date_for_display("15/04/2024"), None);
        assert_eq!(format_date_for_storage(""), None);
    }

    #[test]
    fn student_ids_roundtrip_through_parts() {
        let id = format_student_id(2024, Grade::Five, 12);
        assert_eq!(id, "2024-G05-012");
        assert_eq!(
            parse_student_id(&id),
            Some(StudentIdParts {
                admission_year: 2024,
                grade: Grade::Five,
                serial: 12
            })
        );
        assert_eq!(parse_student_id("2023-nur-7").map(|p| p.grade), Some(Grade::Nursery));
        assert_eq!(parse_student_id("2024-G11-001"), None);
        assert_eq!(parse_student_id("24-G01-001"), None);
        assert_eq!(parse_student_id("2024-G01"), None);
    }

    #[test]
    fn staff_ids_are_zero_padded() {
        assert_eq!(format_staff_id(7), "STF-0007");
        assert_eq!(format_staff_id(12345), "STF-12345");
    }

    proptest! {
        #[test]
        fn prop_storage_display_roundtrip(days in 0i64..(365 * 200)) {
            let base = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap();
            let d = (base + chrono::Duration::days(days)).format(STORAGE_FORMAT).to_string();
            let shown = format_date_for_display(&d).unwrap();
            prop_assert_eq!(format_date_for_storage(&shown), Some(d));
        }
    }
}
