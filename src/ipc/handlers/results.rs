use crate::calc::{self, ClassStudent, RankInput};
use crate::ipc::helpers::{get_required_grade, get_required_str, parse_params, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::{Exam, FinalResult, GradeDefinition, SubjectDefinition, SubjectMark};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

#[derive(Deserialize)]
struct ClassifyParams {
    subject: SubjectDefinition,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateParams {
    #[serde(default)]
    results: Option<Vec<SubjectMark>>,
    #[serde(default)]
    grade_def: Option<GradeDefinition>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummarizeParams {
    #[serde(default)]
    exam: Option<Exam>,
    #[serde(default)]
    grade_def: Option<GradeDefinition>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassReportParams {
    #[serde(default)]
    grade_def: Option<GradeDefinition>,
    #[serde(default)]
    students: Vec<ClassStudent>,
}

#[derive(Deserialize)]
struct RanksParams {
    #[serde(default)]
    scores: Vec<RankInput>,
}

fn get_percentage(params: &serde_json::Value) -> Result<f64, HandlerErr> {
    params
        .get("percentage")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| HandlerErr::bad_params("percentage must be a number"))
}

fn get_result(params: &serde_json::Value) -> Result<FinalResult, HandlerErr> {
    let raw = get_required_str(params, "result")?;
    FinalResult::parse(&raw).ok_or_else(|| HandlerErr {
        code: "bad_params",
        message: "result must be one of: PASS, FAIL, SIMPLE PASS".to_string(),
        details: Some(json!({ "result": raw })),
    })
}

fn subjects_classify(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let grade = get_required_grade(params)?;
    let p: ClassifyParams = parse_params(params)?;
    let numeric = calc::is_subject_numeric(&p.subject, grade, &state.config.grading);
    Ok(json!({ "numeric": numeric }))
}

fn results_evaluate(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let grade = get_required_grade(params)?;
    let p: EvaluateParams = parse_params(params)?;
    let outcome = calc::calculate_student_result(
        p.results.as_deref(),
        p.grade_def.as_ref(),
        grade,
        &state.config.grading,
    );
    Ok(json!(outcome))
}

fn results_summarize(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let grade = get_required_grade(params)?;
    let p: SummarizeParams = parse_params(params)?;
    let summary = calc::summarize_exam(
        p.exam.as_ref(),
        p.grade_def.as_ref(),
        grade,
        &state.config.grading,
    );
    Ok(json!(summary))
}

fn results_performance_grade(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let grade = get_required_grade(params)?;
    let percentage = get_percentage(params)?;
    let result = get_result(params)?;
    let label = calc::performance_grade(percentage, result, grade, &state.config.grading);
    Ok(json!({ "grade": label }))
}

fn results_remarks(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let percentage = get_percentage(params)?;
    let result = get_result(params)?;
    Ok(json!({ "remarks": calc::remarks(percentage, result, &state.config.grading) }))
}

fn results_class_report(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let grade = get_required_grade(params)?;
    let exam_id = get_required_str(params, "examId")?;
    let p: ClassReportParams = parse_params(params)?;
    let rows = calc::class_report(
        grade,
        p.grade_def.as_ref(),
        &p.students,
        &exam_id,
        &state.config.grading,
    );
    debug!(grade = %grade, exam_id = %exam_id, students = rows.len(), "class report");
    Ok(json!({
        "grade": grade,
        "examId": exam_id,
        "rows": rows
    }))
}

fn ranks_calculate(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let p: RanksParams = parse_params(params)?;
    Ok(json!({ "ranks": calc::calculate_ranks(&p.scores) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let outcome = match req.method.as_str() {
        "subjects.classify" => subjects_classify(state, &req.params),
        "results.evaluate" => results_evaluate(state, &req.params),
        "results.summarize" => results_summarize(state, &req.params),
        "results.performanceGrade" => results_performance_grade(state, &req.params),
        "results.remarks" => results_remarks(state, &req.params),
        "results.classReport" => results_class_report(state, &req.params),
        "ranks.calculate" => ranks_calculate(&req.params),
        _ => return None,
    };
    Some(respond(req, outcome))
}
