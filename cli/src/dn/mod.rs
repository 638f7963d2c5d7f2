pub(crate) mod encode;
pub(crate) mod parse;
pub(crate) mod render;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum DnCommands {
    /// Parse a DN and list its attributes
    Parse {
        #[command(flatten)]
        config: parse::Config,
    },
    /// Show a DN in display order
    Render {
        #[command(flatten)]
        config: render::Config,
    },
    /// Re-encode a DN as an RFC 2253 string
    Encode {
        #[command(flatten)]
        config: encode::Config,
    },
}
