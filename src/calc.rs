use crate::model::{
    Exam, FinalResult, Grade, GradeDefinition, GradingSystem, Score, SubjectDefinition,
    SubjectMark,
};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Failed-subject marker recorded when a student has no exam data at all.
pub const NO_DATA_SUBJECT: &str = "No Data";

/// Thresholds and labels used by the evaluator and grader. Defaults carry the
/// school's published grading rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradingPolicy {
    /// Absolute marks needed to pass a subject, independent of its full marks.
    pub pass_marks: f64,
    pub letter_only_subjects: Vec<String>,
    pub letter_only_grades: Vec<Grade>,
    pub bands: GradeBands,
    /// Per-grade replacement labels for the five performance bands.
    pub band_overrides: BTreeMap<Grade, [String; 5]>,
    pub remarks: RemarkBands,
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self {
            pass_marks: 33.0,
            letter_only_subjects: vec!["Cursive".to_string(), "Drawing".to_string()],
            letter_only_grades: vec![Grade::Nursery, Grade::Lkg],
            bands: GradeBands::default(),
            band_overrides: BTreeMap::new(),
            remarks: RemarkBands::default(),
        }
    }
}

/// Performance bands, checked top-down with a strict `>` against each threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradeBands {
    pub thresholds: [f64; 4],
    pub labels: [String; 5],
}

impl Default for GradeBands {
    fn default() -> Self {
        Self {
            thresholds: [89.0, 79.0, 69.0, 59.0],
            labels: ["A+", "A", "B", "C", "D"].map(String::from),
        }
    }
}

/// Remark bands, checked top-down with `>=` against each threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemarkBands {
    pub thresholds: [f64; 5],
    pub texts: [String; 6],
    pub fail: String,
}

impl Default for RemarkBands {
    fn default() -> Self {
        Self {
            thresholds: [90.0, 80.0, 70.0, 60.0, 50.0],
            texts: [
                "Outstanding",
                "Excellent",
                "Very Good",
                "Good",
                "Satisfactory",
                "Needs Improvement",
            ]
            .map(String::from),
            fail: "Failed. Needs serious attention".to_string(),
        }
    }
}

fn same_subject(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

pub fn is_subject_numeric(
    subject: &SubjectDefinition,
    grade: Grade,
    policy: &GradingPolicy,
) -> bool {
    if subject.grading_system == Some(GradingSystem::Letter) {
        return false;
    }
    if subject.exam_full_marks == 0.0 && subject.activity_full_marks == 0.0 {
        return false;
    }
    let letter_only = policy.letter_only_grades.contains(&grade)
        && policy
            .letter_only_subjects
            .iter()
            .any(|s| same_subject(s, &subject.name));
    !letter_only
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResult {
    pub final_result: FinalResult,
    pub failed_subjects: Vec<String>,
}

fn find_mark<'a>(results: &'a [SubjectMark], subject: &str) -> Option<&'a SubjectMark> {
    results.iter().find(|m| same_subject(&m.subject, subject))
}

pub fn calculate_student_result(
    results: Option<&[SubjectMark]>,
    grade_def: Option<&GradeDefinition>,
    grade: Grade,
    policy: &GradingPolicy,
) -> StudentResult {
    let (Some(results), Some(grade_def)) = (results, grade_def) else {
        return StudentResult {
            final_result: FinalResult::Fail,
            failed_subjects: vec![NO_DATA_SUBJECT.to_string()],
        };
    };

    let mut failed_subjects = Vec::new();
    for subject in &grade_def.subjects {
        if !is_subject_numeric(subject, grade, policy) {
            continue;
        }
        let full = subject.full_marks();
        if full <= 0.0 {
            continue;
        }
        let obtained = find_mark(results, &subject.name)
            .map(|m| m.score.obtained())
            .unwrap_or(0.0);
        if obtained < policy.pass_marks {
            failed_subjects.push(subject.name.clone());
        }
    }

    let final_result = match failed_subjects.len() {
        0 => FinalResult::Pass,
        1 => FinalResult::SimplePass,
        _ => FinalResult::Fail,
    };
    StudentResult {
        final_result,
        failed_subjects,
    }
}

pub fn performance_grade(
    percentage: f64,
    result: FinalResult,
    grade: Grade,
    policy: &GradingPolicy,
) -> String {
    let labels = policy
        .band_overrides
        .get(&grade)
        .unwrap_or(&policy.bands.labels);
    if result == FinalResult::Fail {
        return labels[4].clone();
    }
    let idx = policy
        .bands
        .thresholds
        .iter()
        .position(|t| percentage > *t)
        .unwrap_or(4);
    labels[idx].clone()
}

pub fn remarks(percentage: f64, result: FinalResult, policy: &GradingPolicy) -> String {
    let bands = &policy.remarks;
    if result == FinalResult::Fail {
        return bands.fail.clone();
    }
    let idx = bands
        .thresholds
        .iter()
        .position(|t| percentage >= *t)
        .unwrap_or(5);
    bands.texts[idx].clone()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Ranked(u32),
    NotApplicable,
}

impl Serialize for Rank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rank::Ranked(n) => serializer.serialize_u32(*n),
            Rank::NotApplicable => serializer.serialize_str("NA"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankInput {
    pub student_id: String,
    pub total_marks: f64,
    pub result: FinalResult,
}

/// Dense ranks by total marks, highest first. Failed students get `NA`.
pub fn calculate_ranks(scores: &[RankInput]) -> BTreeMap<String, Rank> {
    let mut ranks = BTreeMap::new();
    let mut rankable: Vec<&RankInput> = Vec::new();
    for s in scores {
        if s.result == FinalResult::Fail {
            ranks.insert(s.student_id.clone(), Rank::NotApplicable);
        } else {
            rankable.push(s);
        }
    }
    // sort_by is stable, so equal totals keep input order.
    rankable.sort_by(|a, b| {
        b.total_marks
            .partial_cmp(&a.total_marks)
            .unwrap_or(Ordering::Equal)
    });

    let mut rank = 0_u32;
    let mut prev: Option<f64> = None;
    for s in rankable {
        if prev != Some(s.total_marks) {
            rank += 1;
            prev = Some(s.total_marks);
        }
        ranks.insert(s.student_id.clone(), Rank::Ranked(rank));
    }
    ranks
}

fn round_percent(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectLine {
    pub subject: String,
    pub numeric: bool,
    pub obtained: Option<f64>,
    pub full_marks: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_grade: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSummary {
    pub exam_id: Option<String>,
    pub exam_name: Option<String>,
    pub subjects: Vec<SubjectLine>,
    pub total_obtained: f64,
    pub total_full: f64,
    pub percentage: f64,
    pub final_result: FinalResult,
    pub failed_subjects: Vec<String>,
    pub performance_grade: String,
    pub remarks: String,
}

/// Report-card totals for one exam. A missing exam summarizes as no data.
pub fn summarize_exam(
    exam: Option<&Exam>,
    grade_def: Option<&GradeDefinition>,
    grade: Grade,
    policy: &GradingPolicy,
) -> ExamSummary {
    let results = exam.map(|e| e.results.as_slice());
    let outcome = calculate_student_result(results, grade_def, grade, policy);

    let mut subjects = Vec::new();
    let mut total_obtained = 0.0_f64;
    let mut total_full = 0.0_f64;
    for subject in grade_def.map(|d| d.subjects.as_slice()).unwrap_or(&[]) {
        let mark = results.and_then(|r| find_mark(r, &subject.name));
        let numeric = is_subject_numeric(subject, grade, policy);
        let letter_grade = match mark.map(|m| &m.score) {
            Some(Score::Letter { grade: letter }) => Some(letter.clone()),
            _ => None,
        };
        let obtained = if numeric {
            let v = mark.map(|m| m.score.obtained()).unwrap_or(0.0);
            total_obtained += v;
            total_full += subject.full_marks();
            Some(v)
        } else {
            None
        };
        subjects.push(SubjectLine {
            subject: subject.name.clone(),
            numeric,
            obtained,
            full_marks: if numeric { subject.full_marks() } else { 0.0 },
            letter_grade,
        });
    }

    let percentage = if total_full > 0.0 {
        100.0 * total_obtained / total_full
    } else {
        0.0
    };

    ExamSummary {
        exam_id: exam.map(|e| e.id.clone()),
        exam_name: exam.map(|e| e.name.clone()),
        subjects,
        total_obtained,
        total_full,
        percentage: round_percent(percentage),
        performance_grade: performance_grade(percentage, outcome.final_result, grade, policy),
        remarks: remarks(percentage, outcome.final_result, policy),
        final_result: outcome.final_result,
        failed_subjects: outcome.failed_subjects,
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStudent {
    pub student_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub exams: Vec<Exam>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassReportRow {
    pub student_id: String,
    pub name: String,
    pub summary: ExamSummary,
    pub rank: Rank,
}

/// Summaries and dense ranks for every student's `exam_id` exam, in input order.
pub fn class_report(
    grade: Grade,
    grade_def: Option<&GradeDefinition>,
    students: &[ClassStudent],
    exam_id: &str,
    policy: &GradingPolicy,
) -> Vec<ClassReportRow> {
    let summaries: Vec<ExamSummary> = students
        .iter()
        .map(|s| {
            let exam = s.exams.iter().find(|e| e.id == exam_id);
            summarize_exam(exam, grade_def, grade, policy)
        })
        .collect();

    let rank_inputs: Vec<RankInput> = students
        .iter()
        .zip(&summaries)
        .map(|(s, summary)| RankInput {
            student_id: s.student_id.clone(),
            total_marks: summary.total_obtained,
            result: summary.final_result,
        })
        .collect();
    let ranks = calculate_ranks(&rank_inputs);

    students
        .iter()
        .zip(summaries)
        .map(|(s, summary)| ClassReportRow {
            student_id: s.student_id.clone(),
            name: s.name.clone(),
            rank: ranks
                .get(&s.student_id)
                .copied()
                .unwrap_or(Rank::NotApplicable),
            summary,
        })
        .collect()
}
