//! Command-line argument parsing for the playground
//!
//! Supports:
//! - Choosing a pattern, date or regex mask
//! - Overriding lazy mode and the placeholder character
//! - Reading a script from a file or stdin
//! - JSON lines output

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::config::PlaygroundConfig;
use crate::mask::{MaskOptions, MaskSource};

/// Replay an interaction script against a masked text input
#[derive(Parser, Debug, Default)]
#[command(name = "maskedit", version, about = "Replay edits against a masked text input")]
#[command(group(ArgGroup::new("mask_kind").args(["mask", "date", "regex"])))]
pub struct CliArgs {
    /// Script file to replay (reads stdin when omitted or "-")
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Pattern mask, e.g. "00/00" or "+1 (000) 000-0000"
    #[arg(short, long, value_name = "PATTERN")]
    pub mask: Option<String>,

    /// Use the dd.mm.yyyy date mask
    #[arg(long)]
    pub date: bool,

    /// Regex mask; each typed character must keep the whole value matching
    #[arg(short, long, value_name = "REGEX")]
    pub regex: Option<String>,

    /// Show only what was typed (true) or the whole pattern (false)
    #[arg(long, value_name = "BOOL")]
    pub lazy: Option<bool>,

    /// Placeholder for empty slots when not lazy
    #[arg(short, long, value_name = "CHAR")]
    pub placeholder: Option<char>,

    /// Config file to use instead of ~/.config/maskedit/config.yaml
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print state as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Don't write the rolling log file
    #[arg(long)]
    pub no_log_file: bool,
}

impl CliArgs {
    /// Mask selected on the command line, if any
    pub fn mask_source(&self) -> Option<MaskSource> {
        if self.date {
            Some(MaskSource::Date)
        } else if let Some(regex) = &self.regex {
            Some(MaskSource::regex(regex.as_str()))
        } else {
            self.mask.as_deref().map(MaskSource::pattern)
        }
    }

    /// Options from the command line layered over the configured defaults.
    ///
    /// Naming a mask replaces the configured mask; lazy and placeholder
    /// override individually.
    pub fn options(&self, config: &PlaygroundConfig) -> MaskOptions {
        let overrides = MaskOptions {
            mask: self.mask_source(),
            lazy: self.lazy,
            placeholder_char: self.placeholder,
        };
        config.options.merged(&overrides)
    }

    /// Script path, `None` meaning stdin
    pub fn script_path(&self) -> Option<&PathBuf> {
        self.script
            .as_ref()
            .filter(|path| path.as_os_str() != "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_uses_config() {
        let args = CliArgs::default();
        let config = PlaygroundConfig::default();
        assert_eq!(args.options(&config), config.options);
    }

    #[test]
    fn test_date_flag() {
        let args = CliArgs::try_parse_from(["maskedit", "--date"]).unwrap();
        assert_eq!(args.mask_source(), Some(MaskSource::Date));
    }

    #[test]
    fn test_mask_and_date_conflict() {
        assert!(CliArgs::try_parse_from(["maskedit", "--date", "--mask", "00"]).is_err());
    }

    #[test]
    fn test_overrides_layer_over_config() {
        let args =
            CliArgs::try_parse_from(["maskedit", "--regex", "[a-z]*", "--lazy", "false"]).unwrap();
        let options = args.options(&PlaygroundConfig::default());
        assert_eq!(options.mask, Some(MaskSource::regex("[a-z]*")));
        assert_eq!(options.lazy, Some(false));
    }

    #[test]
    fn test_dash_means_stdin() {
        let args = CliArgs::try_parse_from(["maskedit", "-"]).unwrap();
        assert!(args.script_path().is_none());

        let args = CliArgs::try_parse_from(["maskedit", "steps.txt"]).unwrap();
        assert_eq!(args.script_path(), Some(&PathBuf::from("steps.txt")));
    }
}
