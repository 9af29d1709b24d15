use crate::calc::GradingPolicy;
use crate::fees::FeeStructure;
use crate::ipc::error::ok;
use crate::ipc::helpers::parse_params;
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use tracing::info;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "configSource": state.config_source
        }),
    )
}

fn handle_config_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!(state.config))
}

fn handle_config_set_grading_policy(state: &mut AppState, req: &Request) -> serde_json::Value {
    match parse_params::<GradingPolicy>(&req.params) {
        Ok(policy) => {
            info!(pass_marks = policy.pass_marks, "grading policy replaced");
            state.config.grading = policy;
            ok(&req.id, json!({ "grading": state.config.grading }))
        }
        Err(error) => error.response(&req.id),
    }
}

fn handle_config_set_fee_structure(state: &mut AppState, req: &Request) -> serde_json::Value {
    match parse_params::<FeeStructure>(&req.params) {
        Ok(structure) => {
            info!(currency = %structure.currency, "fee structure replaced");
            state.config.fees = structure;
            ok(&req.id, json!({ "fees": state.config.fees }))
        }
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "config.get" => Some(handle_config_get(state, req)),
        "config.setGradingPolicy" => Some(handle_config_set_grading_policy(state, req)),
        "config.setFeeStructure" => Some(handle_config_set_fee_structure(state, req)),
        _ => None,
    }
}
