use crate::fees::{self, FeeStructure};
use crate::ipc::helpers::{get_required_grade, parse_params, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::Student;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DuesParams {
    student: Student,
    #[serde(default)]
    fee_structure: Option<FeeStructure>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailsParams {
    #[serde(default)]
    fee_structure: Option<FeeStructure>,
}

fn fees_details(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let grade = get_required_grade(params)?;
    let p: DetailsParams = parse_params(params)?;
    let structure = p.fee_structure.as_ref().unwrap_or(&state.config.fees);
    Ok(json!({
        "grade": grade,
        "tier": fees::fee_tier(grade),
        "currency": structure.currency,
        "fees": fees::fee_details(grade, structure),
    }))
}

fn fees_dues(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let p: DuesParams = parse_params(params)?;
    let structure = p.fee_structure.as_ref().unwrap_or(&state.config.fees);
    let dues = fees::calculate_dues(&p.student, structure);
    Ok(json!({
        "studentId": p.student.id,
        "dues": dues,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let outcome = match req.method.as_str() {
        "fees.details" => fees_details(state, &req.params),
        "fees.dues" => fees_dues(state, &req.params),
        _ => return None,
    };
    Some(respond(req, outcome))
}
