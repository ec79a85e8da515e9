use clap::Parser;
use std::path::PathBuf;

/// Bundle a static HTML page and its images into one self-contained HTML file
#[derive(Parser, Debug)]
#[command(name = "html-standalone", version, about)]
pub struct Cli {
    /// Project root containing the HTML page and its asset directory.
    /// Defaults to $STANDALONE_PROJECT_ROOT, then the current directory.
    pub project_root: Option<PathBuf>,

    /// Directory scanned for images. Defaults to `<PROJECT_ROOT>/assets`.
    #[arg(short, long)]
    pub assets_dir: Option<PathBuf>,

    /// HTML page to inline. Defaults to `<PROJECT_ROOT>/index.html`.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where the standalone page is written.
    /// Defaults to `<PROJECT_ROOT>/portfolio_standalone.html`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Extra file extension to treat as an inlinable asset (repeatable)
    #[arg(short, long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Log more detail (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
