use crate::attendance;
use crate::ipc::helpers::{get_required_str, parse_params, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::{term_by_id, DailyAttendance};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct TermSummaryParams {
    #[serde(default)]
    days: Vec<DailyAttendance>,
}

fn get_year(params: &serde_json::Value, key: &str) -> Result<Option<i32>, HandlerErr> {
    match params.get(key) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => v
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .filter(|y| (1000..=9999).contains(y))
            .map(Some)
            .ok_or_else(|| HandlerErr {
                code: "bad_params",
                message: format!("{} must be a four-digit year", key),
                details: Some(json!({ key: v })),
            }),
    }
}

fn attendance_term_months(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let exam_id = get_required_str(params, "examId")?;
    let start = get_year(params, "academicYearStart")?;
    let months = attendance::months_for_term(&exam_id);
    Ok(json!({
        "examId": exam_id,
        "termName": term_by_id(&exam_id).map(|t| t.name),
        "months": months,
        "monthKeys": start.map(|y| attendance::term_month_keys(&exam_id, y)),
    }))
}

fn attendance_term_summary(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let exam_id = get_required_str(params, "examId")?;
    let Some(start) = get_year(params, "academicYearStart")? else {
        return Err(HandlerErr::bad_params("missing academicYearStart"));
    };
    let p: TermSummaryParams = parse_params(params)?;
    let totals = attendance::summarize_term_attendance(&exam_id, start, &p.days);
    let people: serde_json::Map<String, serde_json::Value> = totals
        .into_iter()
        .map(|(person_id, t)| {
            (
                person_id,
                json!({
                    "present": t.present,
                    "absent": t.absent,
                    "leave": t.leave,
                    "daysRecorded": t.days_recorded(),
                }),
            )
        })
        .collect();
    Ok(json!({
        "examId": exam_id,
        "monthKeys": attendance::term_month_keys(&exam_id, start),
        "totals": people,
    }))
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let outcome = match req.method.as_str() {
        "attendance.termMonths" => attendance_term_months(&req.params),
        "attendance.termSummary" => attendance_term_summary(&req.params),
        _ => return None,
    };
    Some(respond(req, outcome))
}
