use crate::format;
use crate::ipc::helpers::{get_required_grade, get_required_str, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn get_u32(params: &serde_json::Value, key: &str) -> Result<u32, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| HandlerErr::bad_params(format!("{} must be a non-negative integer", key)))
}

fn invalid_date(raw: &str, expected: &str) -> HandlerErr {
    HandlerErr {
        code: "bad_params",
        message: format!("date must be a valid {}", expected),
        details: Some(json!({ "date": raw })),
    }
}

fn date_for_display(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let raw = get_required_str(params, "date")?;
    let shown = format::format_date_for_display(&raw)
        .ok_or_else(|| invalid_date(&raw, "YYYY-MM-DD"))?;
    Ok(json!({ "date": shown }))
}

fn date_for_storage(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let raw = get_required_str(params, "date")?;
    let stored = format::format_date_for_storage(&raw)
        .ok_or_else(|| invalid_date(&raw, "DD/MM/YYYY"))?;
    Ok(json!({ "date": stored }))
}

fn grade_code(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let grade = get_required_grade(params)?;
    Ok(json!({ "grade": grade, "code": format::grade_code(grade) }))
}

fn student_id(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let grade = get_required_grade(params)?;
    let year = params
        .get("admissionYear")
        .and_then(|v| v.as_i64())
        .and_then(|n| i32::try_from(n).ok())
        .filter(|y| (1000..=9999).contains(y))
        .ok_or_else(|| HandlerErr::bad_params("admissionYear must be a four-digit year"))?;
    let serial = get_u32(params, "serial")?;
    Ok(json!({ "id": format::format_student_id(year, grade, serial) }))
}

fn parse_student_id(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let raw = get_required_str(params, "id")?;
    let Some(parts) = format::parse_student_id(&raw) else {
        return Err(HandlerErr {
            code: "bad_params",
            message: "id must look like YYYY-CODE-NNN".to_string(),
            details: Some(json!({ "id": raw })),
        });
    };
    Ok(json!({
        "admissionYear": parts.admission_year,
        "grade": parts.grade,
        "serial": parts.serial,
    }))
}

fn staff_id(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let serial = get_u32(params, "serial")?;
    Ok(json!({ "id": format::format_staff_id(serial) }))
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let outcome = match req.method.as_str() {
        "format.dateForDisplay" => date_for_display(&req.params),
        "format.dateForStorage" => date_for_storage(&req.params),
        "format.gradeCode" => grade_code(&req.params),
        "format.studentId" => student_id(&req.params),
        "format.parseStudentId" => parse_student_id(&req.params),
        "format.staffId" => staff_id(&req.params),
        _ => return None,
    };
    Some(respond(req, outcome))
}
