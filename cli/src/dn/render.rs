use std::io::{self, Write};

use clap::Args;
use dn::parse_dn;

use crate::config::Settings;
use crate::error::Result;
use crate::utils::read_line_arg;

#[derive(Args)]
pub(crate) struct Config {
    /// DN string. If not specified, reads from stdin
    dn: Option<String>,
}

pub(crate) fn execute(config: Config, settings: &Settings) -> Result<()> {
    let input = read_line_arg(config.dn)?;
    let dn = parse_dn(&input)?;

    let mut out = io::stdout().lock();
    settings.renderer()?.render_dn(&dn, &mut out)?;
    out.write_all(b"\n")?;
    Ok(())
}
