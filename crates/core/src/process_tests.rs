// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    starting = { ProcessStatus::Starting, true },
    running  = { ProcessStatus::Running,  true },
    exited   = { ProcessStatus::Exited,   false },
    failed   = { ProcessStatus::Failed,   false },
    unknown  = { ProcessStatus::Unknown,  false },
)]
fn liveness(status: ProcessStatus, live: bool) {
    assert_eq!(status.is_live(), live);
}

#[yare::parameterized(
    lower = { "running", ProcessStatus::Running },
    upper = { "EXITED",  ProcessStatus::Exited },
    padded = { " starting\n", ProcessStatus::Starting },
)]
fn parse_status(input: &str, expected: ProcessStatus) {
    assert_eq!(input.parse::<ProcessStatus>().unwrap(), expected);
}

#[test]
fn parse_status_rejects_unknown_words() {
    let err = "zombie".parse::<ProcessStatus>().unwrap_err();
    assert_eq!(err.to_string(), "unknown process status: zombie");
}

#[test]
fn status_serializes_lowercase() {
    let json = serde_json::to_string(&ProcessStatus::Running).unwrap();
    assert_eq!(json, "\"running\"");
}

#[test]
fn managed_process_json_shape() {
    let p = ManagedProcess::new("123", "sh -c start-gateway.sh", ProcessStatus::Starting);
    let value = serde_json::to_value(&p).unwrap();
    assert_eq!(value["id"], "123");
    assert_eq!(value["status"], "starting");
    assert_eq!(value["command"], "sh -c start-gateway.sh");
}

#[test]
fn process_id_from_pid_round_trips() {
    let id = ProcessId::from_pid(4242);
    assert_eq!(id, "4242");
    assert_eq!(id.pid(), Some(4242));
    assert_eq!(id.to_string(), "4242");
}

#[test]
fn non_numeric_process_id_has_no_pid() {
    assert_eq!(ProcessId::new("fake-3").pid(), None);
}

#[test]
fn process_id_is_a_plain_json_string() {
    let id: ProcessId = "17".into();
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"17\"");
    let back: ProcessId = serde_json::from_str("\"17\"").unwrap();
    assert_eq!(back, id);
}

#[test]
fn process_id_looks_up_by_str() {
    let mut seen = std::collections::HashMap::new();
    seen.insert(ProcessId::new("99"), "gateway");
    assert_eq!(seen.get("99"), Some(&"gateway"));
}
