//! Command-line surface (spec.md §6).

use clap::Parser;

/// A small declarative-plus-imperative build orchestrator.
///
/// Recipes that don't call `compiler(...)` build with `gcc`.
#[derive(Debug, Parser)]
#[command(name = "cook", version, about)]
pub struct Options
{
    /// Recipe file to read.
    #[arg(short = 'f', long = "file", default_value = "Cookfile")]
    pub file: String,

    /// Set verbosity (0..3). Bare `--verbose` means `--verbose=1`.
    #[arg(
        long,
        value_name = "N",
        num_args = 0..=1,
        default_value_t = 0,
        default_missing_value = "1",
    )]
    pub verbose: u8,

    /// Compute and print would-be command lines; do not execute.
    #[arg(long)]
    pub dry_run: bool,

    /// Force every build command and target to dirty, overriding freshness.
    #[arg(long)]
    pub build_all: bool,
}

impl Options
{
    /// Map `--verbose`'s count onto a [`log::LevelFilter`].
    pub fn log_level(&self) -> log::LevelFilter
    {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn bare_verbose_flag_means_level_one()
    {
        let options = Options::try_parse_from(["cook", "--verbose"]).unwrap();
        assert_eq!(options.verbose, 1);
    }

    #[test]
    fn explicit_verbose_level_is_honored()
    {
        let options = Options::try_parse_from(["cook", "--verbose=3"]).unwrap();
        assert_eq!(options.verbose, 3);
        assert_eq!(options.log_level(), log::LevelFilter::Trace);
    }

    #[test]
    fn defaults_match_the_documented_cookfile_and_quiet_mode()
    {
        let options = Options::try_parse_from(["cook"]).unwrap();
        assert_eq!(options.file, "Cookfile");
        assert_eq!(options.verbose, 0);
        assert!(!options.dry_run);
        assert!(!options.build_all);
    }
}
