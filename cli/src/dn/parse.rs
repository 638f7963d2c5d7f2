use std::io::{self, Write};

use clap::Args;
use dn::DistinguishedName;
use keyview::decoder::Decoder;

use crate::error::Result;
use crate::output::OutputFormat;
use crate::utils::read_line_arg;

#[derive(Args)]
pub(crate) struct Config {
    /// DN string, e.g. "CN=Alice,O=Acme". If not specified, reads from stdin
    dn: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let input = read_line_arg(config.dn)?;
    let dn: DistinguishedName = input.decode()?;

    match config.output {
        OutputFormat::Text => {
            let mut out = io::stdout().lock();
            for attribute in &dn {
                out.write_all(attribute.key().as_bytes())?;
                out.write_all(b"=")?;
                out.write_all(attribute.value())?;
                out.write_all(b"\n")?;
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&dn)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&dn)?);
        }
    }

    Ok(())
}
