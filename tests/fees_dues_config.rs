use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar(config: Option<&Path>) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_schoold");
    let mut cmd = Command::new(exe);
    cmd.env_remove("SCHOOLD_CONFIG");
    if let Some(path) = config {
        cmd.env("SCHOOLD_CONFIG", path);
    }
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn schoold");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn student_without_payments_owes_every_fee() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar(None);

    let res = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "fees.dues",
        json!({ "student": { "id": "2024-NUR-001", "name": "Asha", "grade": "Nursery" } }),
    );
    assert_eq!(res["studentId"], json!("2024-NUR-001"));
    let dues: Vec<String> = serde_json::from_value(res["dues"].clone()).expect("dues");
    assert_eq!(dues.len(), 3);
    assert_eq!(dues[0], "Admission fee due: Rs. 5000");
    assert!(dues[1].contains("12 month(s)"));
    assert!(dues[1].ends_with("Rs. 18000"));
    assert_eq!(
        dues[2],
        "Exam fee due for First Terminal, Second Terminal, Third Terminal: Rs. 1500"
    );

    let inline = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "fees.dues",
        json!({
            "student": {
                "id": "2024-G08-004",
                "grade": 8,
                "feePayments": {
                    "admissionFeePaid": true,
                    "tuitionFeesPaid": { "April": true, "May": true },
                    "examFeesPaid": { "terminal1": true, "terminal2": true, "terminal3": true }
                }
            },
            "feeStructure": {
                "currency": "NPR",
                "secondary": { "admissionFee": 1, "monthlyFee": 100, "examFee": 10 }
            }
        }),
    );
    assert_eq!(
        inline["dues"],
        json!([concat!(
            "Tuition fee due for 10 month(s) (June, July, August, September, October, ",
            "November, December, January, February, March): NPR 1000"
        )])
    );

    let huge = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "fees.dues",
        json!({
            "student": { "id": "2024-G02-009", "grade": 2 },
            "feeStructure": {
                "primary": {
                    "admissionFee": 1,
                    "monthlyFee": 9223372036854775807u64,
                    "examFee": 18446744073709551615u64
                }
            }
        }),
    );
    let dues: Vec<String> = serde_json::from_value(huge["dues"].clone()).expect("dues");
    assert!(dues[1].ends_with("Rs. 18446744073709551615"));
    assert!(dues[2].ends_with("Rs. 18446744073709551615"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn config_file_sets_fee_amounts_and_policy() {
    let mut file = tempfile::NamedTempFile::new().expect("temp config");
    writeln!(
        file,
        r#"
[grading]
passMarks = 35.0

[fees]
currency = "NPR"

[fees.primary]
admissionFee = 9000
monthlyFee = 2200
examFee = 800
"#
    )
    .expect("write config");

    let (mut child, mut stdin, mut reader) = spawn_sidecar(Some(file.path()));

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(
        health["configSource"],
        json!(file.path().to_string_lossy().to_string())
    );

    let details = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "fees.details",
        json!({ "grade": "Class 4" }),
    );
    assert_eq!(details["tier"], json!("primary"));
    assert_eq!(details["currency"], json!("NPR"));
    assert_eq!(
        details["fees"],
        json!({ "admissionFee": 9000, "monthlyFee": 2200, "examFee": 800 })
    );

    let cfg = request_ok(&mut stdin, &mut reader, "3", "config.get", json!({}));
    assert_eq!(cfg["grading"]["passMarks"], json!(35.0));
    assert_eq!(cfg["fees"]["secondary"]["monthlyFee"], json!(2500));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "config.setFeeStructure",
        json!({ "currency": "Rs." }),
    );
    let details = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "fees.details",
        json!({ "grade": "4" }),
    );
    assert_eq!(details["fees"]["admissionFee"], json!(7000));

    drop(stdin);
    let _ = child.wait();
}
