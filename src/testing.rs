//! Test doubles and log capture shared by the unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Once;

use log::{LevelFilter, Log, Metadata, Record};
use serde_json::json;

use crate::error::Result;
use crate::public_ip::PublicIp;
use crate::update_dns::api::{ApiResponse, ApiResult, Command, DnsCommandApi};

thread_local! {
    static CAPTURED: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

/// Keeps each test thread's log lines apart, since tests run in parallel.
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.with(|lines| lines.borrow_mut().push(record.args().to_string()));
    }

    fn flush(&self) {}
}

static CAPTURE_LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Runs `f` and returns its result with every line it logged on this thread.
pub(crate) fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    INSTALL.call_once(|| {
        log::set_logger(&CAPTURE_LOGGER).expect("a logger was already installed");
        log::set_max_level(LevelFilter::Trace);
    });
    CAPTURED.with(|lines| lines.borrow_mut().clear());
    let result = f();
    let lines = CAPTURED.with(|lines| lines.borrow_mut().split_off(0));
    (result, lines)
}

pub(crate) struct FixedIp(pub &'static str);

impl PublicIp for FixedIp {
    fn describe(&self) -> String {
        "FixedIp".to_string()
    }

    fn current_ip(&self) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Replays canned responses in order and records every call.
pub(crate) struct ScriptedDns {
    responses: RefCell<VecDeque<Result<ApiResponse>>>,
    calls: RefCell<Vec<(Command, Vec<(String, String)>)>>,
}

impl ScriptedDns {
    pub(crate) fn new(responses: Vec<Result<ApiResponse>>) -> Self {
        ScriptedDns {
            responses: RefCell::new(responses.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn commands(&self) -> Vec<Command> {
        self.calls.borrow().iter().map(|(cmd, _)| *cmd).collect()
    }

    pub(crate) fn params(&self, index: usize) -> Vec<(String, String)> {
        self.calls.borrow()[index].1.clone()
    }
}

impl DnsCommandApi for ScriptedDns {
    fn describe(&self) -> String {
        "ScriptedDns".to_string()
    }

    fn execute(&self, command: Command, params: &[(&str, &str)]) -> Result<ApiResponse> {
        self.calls.borrow_mut().push((
            command,
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        self.responses
            .borrow_mut()
            .pop_front()
            .expect("unexpected extra request")
    }
}

pub(crate) fn a_record(name: &str, value: &str) -> serde_json::Value {
    json!({"zone": "example.com", "record": name, "type": "A", "value": value, "editable": "1"})
}

pub(crate) fn listing(records: Vec<serde_json::Value>) -> Result<ApiResponse> {
    Ok(ApiResponse {
        result: ApiResult::Success,
        data: serde_json::Value::Array(records),
    })
}

pub(crate) fn success() -> Result<ApiResponse> {
    Ok(ApiResponse {
        result: ApiResult::Success,
        data: json!("record_added"),
    })
}

pub(crate) fn failure(message: &str) -> Result<ApiResponse> {
    Ok(ApiResponse {
        result: ApiResult::Error,
        data: json!(message),
    })
}
