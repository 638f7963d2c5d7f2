use clap::Args;
use dn::DistinguishedName;
use keyview::encoder::Encoder;

use crate::error::Result;
use crate::utils::read_line_arg;

#[derive(Args)]
pub(crate) struct Config {
    /// DN string. If not specified, reads from stdin
    dn: Option<String>,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let input = read_line_arg(config.dn)?;
    let dn: DistinguishedName = input.parse()?;
    let encoded: String = dn.encode()?;
    println!("{encoded}");
    Ok(())
}
