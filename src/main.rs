use std::path::{Path, PathBuf};

use chrono::Local;
use log::{debug, error, info};
use structopt::StructOpt;

use crate::config::Config;
use crate::error::Error;
use crate::public_ip::{IpEchoService, PublicIp};
use crate::reconcile::{Outcome, Reconciler};
use crate::update_dns::api::DnsCommandApi;
use crate::update_dns::dreamhost::Dreamhost;

mod config;
mod error;
mod logging;
mod public_ip;
mod reconcile;
#[cfg(test)]
mod testing;
mod update_dns;

const RUST_BACKTRACE: &str = "RUST_BACKTRACE";
const EXIT_NO_CONFIG: i32 = 2;

#[derive(StructOpt, Debug)]
pub(crate) struct DynDream {
    /// Verbosity of output, 1 occurrence for debug, 2 occurrences for trace
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: usize,

    /// Config file to use instead of searching $HOME and the program's directory
    #[structopt(parse(from_os_str))]
    pub config: Option<PathBuf>,
}

fn main() {
    if std::env::var_os(RUST_BACKTRACE).is_none() {
        std::env::set_var(RUST_BACKTRACE, "1");
    }

    let args: DynDream = DynDream::from_args();

    if let Err(e) = color_eyre::install() {
        eprintln!("Failed to install error reporting: {}", e);
    }

    let config_file = match config::locate(
        args.config.clone(),
        std::env::var_os("HOME").as_deref().map(Path::new),
        program_dir().as_deref(),
    ) {
        Ok(path) => path,
        Err(not_found) => {
            println!(
                "Configuration file {} not found in {} or in {}",
                config::DEFAULT_CONFIG_FILE,
                describe_candidate(not_found.home.as_deref()),
                describe_candidate(not_found.program_dir.as_deref()),
            );
            std::process::exit(EXIT_NO_CONFIG);
        }
    };

    if let Err(err) = run(&args, &config_file) {
        let code = err.exit_code();
        error!("{}", err);
        eprintln!("Error: {:?}", color_eyre::Report::new(err));
        std::process::exit(code);
    }
}

fn run(args: &DynDream, config_file: &Path) -> Result<(), Error> {
    let config = Config::load(config_file)?;
    logging::init(config.log_file.as_deref(), args.verbose)?;

    let public_ip = IpEchoService::new(config.ip_url.as_str());
    let dns = Dreamhost::new(config.dreamhost_url.as_str(), config.api_key.as_str());
    reconcile_logged(&program_name(), config_file, &config, &public_ip, &dns)?;
    Ok(())
}

/// One reconcile pass between the start and end marker lines.
fn reconcile_logged(
    program: &str,
    config_file: &Path,
    config: &Config,
    public_ip: &dyn PublicIp,
    dns: &dyn DnsCommandApi,
) -> Result<Outcome, Error> {
    info!("Starting {} on {}", program, asctime());
    info!("Using config file {}", config_file.display());
    debug!("Reconciling {} with {}", config.dynamic_url, dns.describe());

    let outcome = Reconciler::new(public_ip, dns, &config.dynamic_url).run()?;
    match &outcome {
        Outcome::Unchanged { ip } => debug!("{} already at {}", config.dynamic_url, ip),
        Outcome::Updated { old, new } => debug!(
            "{} moved from {} to {}",
            config.dynamic_url,
            old.as_deref().unwrap_or("(no record)"),
            new
        ),
        Outcome::AddFailed { new, message } => debug!(
            "{} not moved to {}: {}",
            config.dynamic_url, new, message
        ),
    }

    info!("Ending {} on {}", program, asctime());
    Ok(outcome)
}

/// Directory holding the running executable, with symlinks resolved.
fn program_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent().map(Path::to_path_buf)
}

fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

fn describe_candidate(path: Option<&Path>) -> String {
    path.map_or_else(|| "(unknown)".to_string(), |p| p.display().to_string())
}

/// Local time in the classic `asctime` layout, e.g. `Sun Oct 18 09:05:01 2026`.
fn asctime() -> String {
    Local::now().format("%a %b %e %H:%M:%S %Y").to_string()
}
