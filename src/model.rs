use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Grade levels taught at the school, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub enum Grade {
    Nursery,
    Lkg,
    Ukg,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
}

impl Grade {
    pub const ALL: [Grade; 13] = [
        Grade::Nursery,
        Grade::Lkg,
        Grade::Ukg,
        Grade::One,
        Grade::Two,
        Grade::Three,
        Grade::Four,
        Grade::Five,
        Grade::Six,
        Grade::Seven,
        Grade::Eight,
        Grade::Nine,
        Grade::Ten,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Nursery => "Nursery",
            Grade::Lkg => "LKG",
            Grade::Ukg => "UKG",
            Grade::One => "1",
            Grade::Two => "2",
            Grade::Three => "3",
            Grade::Four => "4",
            Grade::Five => "5",
            Grade::Six => "6",
            Grade::Seven => "7",
            Grade::Eight => "8",
            Grade::Nine => "9",
            Grade::Ten => "10",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGrade(pub String);

impl fmt::Display for UnknownGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown grade: {}", self.0)
    }
}

impl std::error::Error for UnknownGrade {}

impl FromStr for Grade {
    type Err = UnknownGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        let t = t
            .strip_prefix("class")
            .or_else(|| t.strip_prefix("grade"))
            .unwrap_or(&t)
            .trim();
        let grade = match t {
            "nursery" | "nur" => Grade::Nursery,
            "lkg" => Grade::Lkg,
            "ukg" => Grade::Ukg,
            other => {
                let n = other
                    .parse::<usize>()
                    .map_err(|_| UnknownGrade(s.to_string()))?;
                if !(1..=10).contains(&n) {
                    return Err(UnknownGrade(s.to_string()));
                }
                Grade::ALL[n + 2]
            }
        };
        Ok(grade)
    }
}

/// Accepts `"Class 5"`-style strings and bare numbers like `5`.
impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }
        let raw = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Number(n) => n.to_string(),
        };
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl From<Grade> for String {
    fn from(g: Grade) -> Self {
        g.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradingSystem {
    Letter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDefinition {
    pub name: String,
    #[serde(default)]
    pub exam_full_marks: f64,
    #[serde(default)]
    pub activity_full_marks: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading_system: Option<GradingSystem>,
}

impl SubjectDefinition {
    pub fn full_marks(&self) -> f64 {
        self.exam_full_marks + self.activity_full_marks
    }
}

/// A recorded score. Exactly one shape exists per mark, so a single total and
/// an exam/activity split can never both be populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Single {
        marks: f64,
    },
    Letter {
        grade: String,
    },
    #[serde(rename_all = "camelCase")]
    Split {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exam_marks: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        activity_marks: Option<f64>,
    },
}

impl Score {
    /// Numeric marks obtained; letter grades count as zero.
    pub fn obtained(&self) -> f64 {
        match self {
            Score::Single { marks } => *marks,
            Score::Split {
                exam_marks,
                activity_marks,
            } => exam_marks.unwrap_or(0.0) + activity_marks.unwrap_or(0.0),
            Score::Letter { .. } => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectMark {
    pub subject: String,
    #[serde(flatten)]
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub results: Vec<SubjectMark>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeDefinition {
    #[serde(default)]
    pub subjects: Vec<SubjectDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_teacher_id: Option<String>,
}

/// The three fixed assessment periods of an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub exam_id: &'static str,
    pub name: &'static str,
}

pub const TERMS: [Term; 3] = [
    Term {
        exam_id: "terminal1",
        name: "First Terminal",
    },
    Term {
        exam_id: "terminal2",
        name: "Second Terminal",
    },
    Term {
        exam_id: "terminal3",
        name: "Third Terminal",
    },
];

pub fn term_by_id(exam_id: &str) -> Option<&'static Term> {
    TERMS.iter().find(|t| t.exam_id == exam_id.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinalResult {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
    #[serde(rename = "SIMPLE PASS")]
    SimplePass,
}

impl FinalResult {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PASS" => Some(FinalResult::Pass),
            "FAIL" => Some(FinalResult::Fail),
            "SIMPLE PASS" | "SIMPLE_PASS" => Some(FinalResult::SimplePass),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeePayments {
    #[serde(default)]
    pub admission_fee_paid: bool,
    #[serde(default)]
    pub tuition_fees_paid: HashMap<String, bool>,
    #[serde(default)]
    pub exam_fees_paid: HashMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub grade: Grade,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_payments: Option<FeePayments>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
}

/// One day's attendance for a class: person id to status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAttendance {
    pub date: String,
    #[serde(default)]
    pub statuses: HashMap<String, AttendanceStatus>,
}
