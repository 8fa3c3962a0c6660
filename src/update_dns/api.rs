use serde::Deserialize;

use crate::error::{Error, Result};

pub(crate) const RECORD_TYPE_A: &str = "A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    ListRecords,
    RemoveRecord,
    AddRecord,
}

impl Command {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Command::ListRecords => "dns-list_records",
            Command::RemoveRecord => "dns-remove_record",
            Command::AddRecord => "dns-add_record",
        }
    }
}

/// A provider API taking a `cmd` plus extra query parameters.
pub(crate) trait DnsCommandApi {
    fn describe(&self) -> String;

    fn execute(&self, command: Command, params: &[(&str, &str)]) -> Result<ApiResponse>;

    fn list_records(&self) -> Result<Vec<DnsRecord>> {
        let command = Command::ListRecords;
        let response = self.execute(command, &[])?;
        if response.is_error() {
            return Err(Error::Provider {
                command: command.as_str(),
                message: response.message(),
            });
        }
        serde_json::from_value(response.data).map_err(|e| Error::Provider {
            command: command.as_str(),
            message: format!("Unexpected record list: {}", e),
        })
    }

    fn remove_record(&self, name: &str, value: &str) -> Result<ApiResponse> {
        self.execute(
            Command::RemoveRecord,
            &[("record", name), ("type", RECORD_TYPE_A), ("value", value)],
        )
    }

    fn add_record(&self, name: &str, value: &str) -> Result<ApiResponse> {
        self.execute(
            Command::AddRecord,
            &[("record", name), ("type", RECORD_TYPE_A), ("value", value)],
        )
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ApiResult {
    Success,
    Error,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct ApiResponse {
    pub result: ApiResult,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ApiResponse {
    pub(crate) fn is_error(&self) -> bool {
        self.result == ApiResult::Error
    }

    /// The `data` payload as text; error responses carry a bare string.
    pub(crate) fn message(&self) -> String {
        match &self.data {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct DnsRecord {
    pub record: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
    #[serde(default)]
    pub zone: Option<String>,
}
