use serde::Deserialize;

use crate::error::{Error, Result};

pub(crate) trait PublicIp {
    fn describe(&self) -> String;

    fn current_ip(&self) -> Result<String>;
}

/// A service answering a GET with `{"ip": "..."}`.
pub(crate) struct IpEchoService {
    url: String,
}

impl IpEchoService {
    pub(crate) fn new(url: impl Into<String>) -> Self {
        IpEchoService { url: url.into() }
    }
}

impl PublicIp for IpEchoService {
    fn describe(&self) -> String {
        format!("IpEcho[url={url}]", url = self.url)
    }

    fn current_ip(&self) -> Result<String> {
        let response = attohttpc::get(&self.url)
            .send()
            .map_err(|source| Error::Transport {
                url: self.url.clone(),
                source,
            })?;
        if !response.is_success() {
            return Err(Error::Status {
                url: self.url.clone(),
                status: response.status(),
            });
        }

        let echo: IpEcho = response.json().map_err(|source| Error::Decode {
            url: self.url.clone(),
            source,
        })?;
        Ok(echo.ip)
    }
}

#[derive(Deserialize, Debug)]
struct IpEcho {
    ip: String,
}
