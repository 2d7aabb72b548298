use clap::Parser;
use draincleaner_core::sync::SyncOptions;
use std::path::PathBuf;

/// Mirror a source tree while draining comments
///
/// Copies SOURCEPATH into TARGETPATH, stripping marked comments from code and
/// document files. Only files that changed since the last run are processed.
#[derive(Parser, Debug)]
#[command(name = "draincleaner")]
#[command(
    about = "Mirror a source tree while draining comments",
    long_about = None,
    version
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Source directory; must contain the ignore file
    pub sourcepath: PathBuf,

    /// Target directory; created if missing
    pub targetpath: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Colorize output
    #[arg(short, long)]
    pub colored: bool,

    /// Preview changes without writing anything (dry-run)
    #[arg(short, long)]
    pub dry_run: bool,

    /// Strip all comments instead of only marked ones
    #[arg(short, long)]
    pub remove_all: bool,

    /// Process every file, changed or not
    #[arg(short = 'a', long)]
    pub replace_all: bool,

    /// List print calls in source files
    #[arg(short = 'p', long)]
    pub show_prints: bool,

    /// List string literals in source files
    #[arg(short, long)]
    pub show_strings: bool,

    /// Follow symbolic links while walking the source
    #[arg(short, long)]
    pub follow_symlinks: bool,

    /// Use specific config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Engine switches for these flags
    pub const fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            dry_run: self.dry_run,
            remove_all: self.remove_all,
            replace_all: self.replace_all,
            follow_symlinks: self.follow_symlinks,
            show_prints: self.show_prints,
            show_strings: self.show_strings,
        }
    }
}
