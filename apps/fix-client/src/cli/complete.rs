//! Completion helpers
//!
//! `fix complete <domain>` lists the tokens a domain accepts, so shells and
//! users can discover values such as `fix complete md-entry-type`.

use std::io::Write;

use clap::Args;

use crate::domain::dict::{Domain, pretty_values};

/// Arguments for `complete`
#[derive(Args, Debug, Clone)]
pub struct CompleteArgs {
    /// Domain name, e.g. order-side or md-entry-type
    #[arg(value_parser = parse_domain)]
    pub domain: Domain,
}

fn parse_domain(name: &str) -> Result<Domain, String> {
    Domain::from_name(name).ok_or_else(|| {
        let valid: Vec<_> = Domain::ALL.iter().map(Domain::name).collect();
        format!("unknown domain `{name}` (valid: {})", valid.join(", "))
    })
}

/// Lines printed for a domain.
#[must_use]
pub fn candidates(domain: Domain) -> Vec<String> {
    pretty_values(domain)
}

/// Print the domain's tokens, one per line.
pub fn execute(args: &CompleteArgs) {
    let mut out = std::io::stdout().lock();
    for value in candidates(args.domain) {
        if let Err(e) = writeln!(out, "{value}") {
            tracing::warn!(error = %e, "Failed to write completion to stdout");
            return;
        }
    }
}
