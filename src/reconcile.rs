use log::{debug, error, info};

use crate::error::Result;
use crate::public_ip::PublicIp;
use crate::update_dns::api::{DnsCommandApi, DnsRecord, RECORD_TYPE_A};

/// How a run ended, once it got as far as comparing addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    Unchanged { ip: String },
    /// `old` is `None` when no A record existed yet.
    Updated { old: Option<String>, new: String },
    AddFailed { new: String, message: String },
}

pub(crate) struct Reconciler<'a> {
    public_ip: &'a dyn PublicIp,
    dns: &'a dyn DnsCommandApi,
    domain: &'a str,
}

impl<'a> Reconciler<'a> {
    pub(crate) fn new(
        public_ip: &'a dyn PublicIp,
        dns: &'a dyn DnsCommandApi,
        domain: &'a str,
    ) -> Self {
        Reconciler {
            public_ip,
            dns,
            domain,
        }
    }

    pub(crate) fn run(&self) -> Result<Outcome> {
        let ip = self.public_ip.current_ip()?;
        info!("Public IP from {} is {}", self.public_ip.describe(), ip);

        let old_ip = self.published_ip()?;
        if old_ip.as_deref() == Some(ip.as_str()) {
            info!("IP address has not changed.");
            return Ok(Outcome::Unchanged { ip });
        }

        self.replace(old_ip, ip)
    }

    /// Value of the last A record named `domain`, in the order the API lists them.
    fn published_ip(&self) -> Result<Option<String>> {
        let records = self.dns.list_records()?;
        match matching_record(&records, self.domain) {
            Some(record) => {
                debug!(
                    "{} record {} is in zone {}",
                    record.record_type,
                    record.record,
                    record.zone.as_deref().unwrap_or("(none)")
                );
                info!("Found record with IP {}", record.value);
                Ok(Some(record.value.clone()))
            }
            None => {
                info!("No A record for {} on {}", self.domain, self.dns.describe());
                Ok(None)
            }
        }
    }

    fn replace(&self, old_ip: Option<String>, ip: String) -> Result<Outcome> {
        if let Some(old) = &old_ip {
            let removed = self.dns.remove_record(self.domain, old)?;
            if removed.is_error() {
                error!("Failed to remove old record. Error: {}", removed.message());
            }
        }

        let added = self.dns.add_record(self.domain, &ip)?;
        if added.is_error() {
            let message = added.message();
            error!("Failed to add record for {} with IP {}", self.domain, ip);
            println!("Error:{}", message);
            return Ok(Outcome::AddFailed { new: ip, message });
        }

        info!(
            "Changed IP for {} from {} to {}",
            self.domain,
            old_ip.as_deref().unwrap_or(""),
            ip
        );
        Ok(Outcome::Updated { old: old_ip, new: ip })
    }
}

fn matching_record<'r>(records: &'r [DnsRecord], domain: &str) -> Option<&'r DnsRecord> {
    records
        .iter()
        .rev()
        .find(|record| record.record == domain && record.record_type == RECORD_TYPE_A)
}
