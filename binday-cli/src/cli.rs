//! Command line surface.

use std::path::PathBuf;

use chrono::Weekday;
use clap::{ArgGroup, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "binday",
    version,
    about = "Next-day waste collection notifier for the ReCollect API",
    after_help = "For more information about finding your place_id and service_id, use --config-help."
)]
#[command(group(ArgGroup::new("action").args(["force", "extract_ids", "config_help"])))]
pub(crate) struct Arguments {
    /// Run regardless of the day (normally only runs on the trigger day)
    #[arg(long)]
    pub(crate) force: bool,
    /// Extract place_id and service_id from a pasted cURL command
    #[arg(long)]
    pub(crate) extract_ids: bool,
    /// Show how to find your place_id and service_id
    #[arg(long)]
    pub(crate) config_help: bool,
    /// Path to the configuration file
    ///
    /// Defaults to `config.json` next to the executable.
    #[arg(short, long, env = "BINDAY_CONFIG")]
    pub(crate) config: Option<PathBuf>,
    /// Day of the week on which unforced runs proceed
    #[arg(long, default_value = "sun", value_parser = parse_weekday)]
    pub(crate) trigger_day: Weekday,
}

fn parse_weekday(value: &str) -> Result<Weekday, String> {
    value
        .parse::<Weekday>()
        .map_err(|err| format!("{value:?} is not a weekday ({err})"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Arguments::command().debug_assert();
    }

    #[test]
    fn defaults_to_sunday_without_force() {
        let args = Arguments::try_parse_from(["binday"]).expect("parse");

        assert!(!args.force);
        assert!(!args.extract_ids);
        assert_eq!(args.trigger_day, Weekday::Sun);
    }

    #[test]
    fn accepts_weekday_names() {
        let args = Arguments::try_parse_from(["binday", "--force", "--trigger-day", "Thursday"])
            .expect("parse");

        assert!(args.force);
        assert_eq!(args.trigger_day, Weekday::Thu);
        assert!(Arguments::try_parse_from(["binday", "--trigger-day", "someday"]).is_err());
    }

    #[test]
    fn actions_are_mutually_exclusive() {
        let err = Arguments::try_parse_from(["binday", "--force", "--extract-ids"])
            .expect_err("conflict");

        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }
}
