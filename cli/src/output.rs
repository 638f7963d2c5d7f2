#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// One `type=value` line per attribute
    #[default]
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}
