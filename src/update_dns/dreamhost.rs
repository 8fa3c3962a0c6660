use log::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::update_dns::api::{ApiResponse, Command, DnsCommandApi};

pub struct Dreamhost {
    base_url: String,
    api_key: String,
}

impl Dreamhost {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Dreamhost {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Requests go to `<base_url>/` with everything in the query string.
    fn endpoint(&self) -> String {
        format!("{base}/", base = self.base_url)
    }

    fn query<'a>(
        &'a self,
        command: Command,
        unique_id: String,
        params: &[(&'a str, &'a str)],
    ) -> Vec<(&'a str, String)> {
        let mut query = vec![
            ("key", self.api_key.clone()),
            ("cmd", command.as_str().to_string()),
            ("unique_id", unique_id),
            ("format", "json".to_string()),
        ];
        query.extend(params.iter().map(|(name, value)| (*name, value.to_string())));
        query
    }
}

impl DnsCommandApi for Dreamhost {
    fn describe(&self) -> String {
        format!("Dreamhost[url={url}]", url = &self.base_url)
    }

    fn execute(&self, command: Command, params: &[(&str, &str)]) -> Result<ApiResponse> {
        let url = self.endpoint();
        // Fresh per request; the API refuses a repeated unique_id.
        let unique_id = Uuid::new_v4().to_string();
        debug!("[dreamhost] {} unique_id={}", command.as_str(), unique_id);

        let response = self
            .query(command, unique_id, params)
            .iter()
            .fold(attohttpc::get(&url), |request, (name, value)| {
                request.param(name, value)
            })
            .send()
            .map_err(|source| Error::Transport {
                url: url.clone(),
                source,
            })?;
        if !response.is_success() {
            return Err(Error::Status {
                url,
                status: response.status(),
            });
        }

        response
            .json()
            .map_err(|source| Error::Decode { url, source })
    }
}
