use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::settings::{
    DEF_CHECK_FREQUENCY, DEF_DATABASE_PATH, DEF_DELIMITER, DEF_FONTS_DIR, DEF_OUTPUT_PATH,
    DEF_RULES_PATH,
};
use crate::config::{PairingLayout, RatingBasis};

#[derive(Parser, Debug)]
#[command(author, version, about = "handicap chess pairing generator")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Watch the exported file and regenerate the report on every change
    Watch(RunArgs),
    /// Process the exported file once and exit
    Once(RunArgs),
    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RunArgs {
    /// File exported from SwissManager
    pub export_file: PathBuf,

    /// Output report; the extension picks the format (pdf, xlsx, json)
    #[arg(short, long, default_value = DEF_OUTPUT_PATH)]
    pub output_path: PathBuf,

    /// Handicap rule table
    #[arg(short, long, default_value = DEF_RULES_PATH)]
    pub rules_path: PathBuf,

    /// Field delimiter in the exported file and the rule table
    #[arg(short, long, default_value = DEF_DELIMITER)]
    pub delimiter: String,

    /// Check frequency in seconds
    #[arg(short, long, default_value_t = DEF_CHECK_FREQUENCY)]
    pub frequency: u64,

    /// SQLite snapshot file
    #[arg(long, default_value = DEF_DATABASE_PATH)]
    pub database: PathBuf,

    /// Directory with DejaVuSerif.ttf and DejaVuSerif-Bold.ttf for PDF output
    #[arg(long, default_value = DEF_FONTS_DIR)]
    pub fonts: PathBuf,

    /// Rating used to look up handicaps
    #[arg(long, value_enum, default_value_t = RatingBasis::National)]
    pub rating: RatingBasis,

    /// Pairing report layout
    #[arg(long, value_enum, default_value_t = PairingLayout::Classic)]
    pub layout: PairingLayout,

    /// Append a timestamp to the output file name
    #[arg(short, long)]
    pub timestamp: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["handicap", "watch", "export.txt"]).unwrap();
        let Command::Watch(args) = cli.command else {
            panic!("expected watch");
        };

        assert_eq!(args.delimiter, ";");
        assert_eq!(args.frequency, 5);
        assert_eq!(args.rating, RatingBasis::National);
        assert_eq!(args.layout, PairingLayout::Classic);
        assert_eq!(args.output_path, PathBuf::from("output/handicap.pdf"));
        assert_eq!(args.fonts, PathBuf::from("fonts"));
        assert!(!args.timestamp);
    }

    #[test]
    fn test_options() {
        let cli = Cli::try_parse_from([
            "handicap", "once", "export.txt", "-o", "out.xlsx", "-d", ",", "--rating", "fide",
            "--layout", "individual", "-t",
        ])
        .unwrap();
        let Command::Once(args) = cli.command else {
            panic!("expected once");
        };

        assert_eq!(args.output_path, PathBuf::from("out.xlsx"));
        assert_eq!(args.delimiter, ",");
        assert_eq!(args.rating, RatingBasis::Fide);
        assert_eq!(args.layout, PairingLayout::Individual);
        assert!(args.timestamp);
    }

    #[test]
    fn test_export_file_is_required() {
        assert!(Cli::try_parse_from(["handicap", "watch"]).is_err());
    }
}
