use crate::ipc::error::{err, ok};
use crate::ipc::types::Request;
use crate::model::Grade;
use serde::de::DeserializeOwned;

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        Self {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

/// Deserialize the whole `params` object into a typed request body.
pub fn parse_params<T: DeserializeOwned>(params: &serde_json::Value) -> Result<T, HandlerErr> {
    let value = if params.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        params.clone()
    };
    serde_json::from_value(value).map_err(|e| HandlerErr::bad_params(e.to_string()))
}

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn get_required_grade(params: &serde_json::Value) -> Result<Grade, HandlerErr> {
    let raw = match params.get("grade") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return Err(HandlerErr::bad_params("missing grade")),
    };
    raw.parse::<Grade>().map_err(|e| HandlerErr {
        code: "bad_params",
        message: e.to_string(),
        details: Some(serde_json::json!({ "grade": raw })),
    })
}

pub fn respond(req: &Request, outcome: Result<serde_json::Value, HandlerErr>) -> serde_json::Value {
    match outcome {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}
