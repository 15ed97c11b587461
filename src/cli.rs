use clap::{Args, Parser, Subcommand, ValueEnum};
use std::{path::PathBuf, str::FromStr};

use crate::models::{ImageSource, Severity};

/// Guided pencil damage inspection
#[derive(Parser, Debug)]
#[command(name = "pencil-inspect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the report database and settings
    #[arg(
        long,
        global = true,
        env = "PENCIL_INSPECT_DATA_DIR",
        default_value = ".pencil-inspect"
    )]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the regions that can be flagged as damaged
    Regions,

    /// Run a complete inspection and store the resulting report
    Inspect(InspectArgs),

    /// Show the stored report and its assessment
    Report {
        /// Print the report and summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the stored report to pencil-damage-report-<date>.json
    Export {
        /// Output directory (defaults to the configured export directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Load an exported report document as the current report
    Import {
        /// Path to a pencil-damage-report-*.json document
        file: PathBuf,
    },

    /// Delete the stored report to start a new inspection
    Clear,

    /// Show the current settings, applying any changes given
    Settings(SettingsArgs),
}

#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Default directory for `export`
    #[arg(long, value_name = "DIR", conflicts_with = "clear_export_dir")]
    pub export_dir: Option<PathBuf>,

    /// Forget the default export directory
    #[arg(long)]
    pub clear_export_dir: bool,

    /// Print a notice when a simulated image replaces a failed capture
    #[arg(long, value_name = "BOOL")]
    pub announce_fallbacks: Option<bool>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Image URI for the next capture step, in step order; "-" simulates a failed capture
    #[arg(long = "image", value_name = "URI")]
    pub images: Vec<String>,

    /// Capture step to skip (1-based, repeatable)
    #[arg(long = "skip", value_name = "STEP")]
    pub skip: Vec<usize>,

    /// Where images are acquired from
    #[arg(long, value_enum, default_value_t = SourceArg::Camera)]
    pub source: SourceArg,

    /// Damaged region id (repeatable)
    #[arg(long = "region", value_name = "ID")]
    pub regions: Vec<String>,

    /// Severity for marks that do not name one
    #[arg(long, default_value = "moderate")]
    pub severity: Severity,

    /// Damage mark as REGION:X:Y[:SEVERITY] with X and Y fractions in [0, 1]
    #[arg(long = "mark", value_name = "REGION:X:Y[:SEVERITY]")]
    pub marks: Vec<MarkSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Camera,
    Gallery,
}

impl From<SourceArg> for ImageSource {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Camera => ImageSource::Camera,
            SourceArg::Gallery => ImageSource::Gallery,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkSpec {
    pub region: String,
    pub x: f64,
    pub y: f64,
    pub severity: Option<Severity>,
}

fn parse_fraction(raw: &str, axis: char) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{axis} must be a number, got '{raw}'"))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("{axis} must be within [0, 1], got {value}"));
    }
    Ok(value)
}

impl FromStr for MarkSpec {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.split(':').collect();
        if !(3..=4).contains(&parts.len()) || parts[0].is_empty() {
            return Err(format!("expected REGION:X:Y[:SEVERITY], got '{raw}'"));
        }

        let severity = parts
            .get(3)
            .map(|value| value.parse::<Severity>().map_err(|e| e.to_string()))
            .transpose()?;

        Ok(Self {
            region: parts[0].to_string(),
            x: parse_fraction(parts[1], 'x')?,
            y: parse_fraction(parts[2], 'y')?,
            severity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_spec_parses_optional_severity() {
        let mark: MarkSpec = "upper-shaft:0.25:0.5".parse().unwrap();
        assert_eq!(
            mark,
            MarkSpec {
                region: "upper-shaft".into(),
                x: 0.25,
                y: 0.5,
                severity: None
            }
        );
        let mark: MarkSpec = "tip:1:0:severe".parse().unwrap();
        assert_eq!(mark.severity, Some(Severity::Severe));
    }

    #[test]
    fn mark_spec_rejects_bad_input() {
        assert!("tip:0.5".parse::<MarkSpec>().is_err());
        assert!(":0.5:0.5".parse::<MarkSpec>().is_err());
        assert!("tip:1.5:0.5".parse::<MarkSpec>().is_err());
        assert!("tip:a:0.5".parse::<MarkSpec>().is_err());
        assert!("tip:0.5:0.5:critical".parse::<MarkSpec>().is_err());
        assert!("tip:0.5:0.5:light:extra".parse::<MarkSpec>().is_err());
    }

    #[test]
    fn inspect_arguments_parse() {
        let cli = Cli::try_parse_from([
            "pencil-inspect",
            "--data-dir",
            "/tmp/pi",
            "inspect",
            "--image",
            "file:///front.jpg",
            "--image",
            "-",
            "--skip",
            "4",
            "--region",
            "tip",
            "--severity",
            "light",
            "--mark",
            "tip:0.5:0.5",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, PathBuf::from("/tmp/pi"));
        match cli.command {
            Command::Inspect(args) => {
                assert_eq!(args.images, ["file:///front.jpg", "-"]);
                assert_eq!(args.skip, [4]);
                assert_eq!(args.severity, Severity::Light);
                assert_eq!(args.source, SourceArg::Camera);
                assert_eq!(args.marks.len(), 1);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn settings_arguments_parse() {
        let cli = Cli::try_parse_from([
            "pencil-inspect",
            "settings",
            "--export-dir",
            "/tmp/out",
            "--announce-fallbacks",
            "false",
        ])
        .unwrap();
        match cli.command {
            Command::Settings(args) => {
                assert_eq!(args.export_dir, Some(PathBuf::from("/tmp/out")));
                assert_eq!(args.announce_fallbacks, Some(false));
                assert!(!args.clear_export_dir);
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(Cli::try_parse_from([
            "pencil-inspect",
            "settings",
            "--export-dir",
            "/tmp/out",
            "--clear-export-dir",
        ])
        .is_err());
    }
}
