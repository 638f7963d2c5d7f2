use std::io::{self, Write};

use clap::Args;

use crate::config::Settings;
use crate::error::Result;
use crate::utils::read_line_arg;

#[derive(Args)]
pub(crate) struct Config {
    /// User ID as listed for a key. If not specified, reads from stdin
    user_id: Option<String>,
}

pub(crate) fn execute(config: Config, settings: &Settings) -> Result<()> {
    let user_id = read_line_arg(config.user_id)?;

    let mut out = io::stdout().lock();
    settings.renderer()?.render_user_id(&user_id, &mut out)?;
    out.write_all(b"\n")?;
    Ok(())
}
