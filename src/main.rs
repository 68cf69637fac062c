use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use patzm_scripts::config::{self, Config};
use patzm_scripts::dictionary::{self, BatchOptions, SyncOptions};
use patzm_scripts::gist::GistClient;
use patzm_scripts::rename::{self, RenameOptions};
use patzm_scripts::{Result, ToolError, firefox, logging, tree};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init_logging(cli.verbose)?;
    match cli.command {
        Command::Sync(args) => execute_sync(args),
        Command::SyncAll(args) => execute_sync_all(args),
        Command::DateRename(args) => execute_date_rename(args),
        Command::TreeFileCount(args) => execute_tree_file_count(args),
    }
}

fn gist_client(auth_token: Option<String>) -> Result<GistClient> {
    let config = Config::load_default()?;
    let credentials = config::credentials(auth_token, &config);
    GistClient::with_api_url(credentials.as_ref(), &config.api_url())
}

fn execute_sync(args: SyncArgs) -> Result<()> {
    if !args.file_path.exists() {
        return Err(ToolError::MissingInput(args.file_path));
    }

    tracing::info!(path = %args.file_path.display(), "syncing");
    let client = gist_client(args.auth_token)?;
    let options = SyncOptions {
        gist_id: args.gist_id,
        sort: args.sort || !args.no_sort,
        public: args.public,
    };
    dictionary::sync_file(&client, &args.file_path, &options)?;
    Ok(())
}

fn execute_sync_all(args: SyncAllArgs) -> Result<()> {
    if args.check_firefox {
        firefox::ensure_not_running()?;
    }

    let root = match args.profiles_dir {
        Some(dir) => dir,
        None => firefox::profiles_dir()?,
    };
    if !root.is_dir() {
        return Err(ToolError::MissingInput(root));
    }

    let client = gist_client(args.auth_token)?;
    let options = BatchOptions {
        sort: !args.no_sort,
        fail_fast: args.fail_fast,
    };
    dictionary::sync_all(&client, &root, &options)?.into_result()?;
    Ok(())
}

fn execute_date_rename(args: DateRenameArgs) -> Result<()> {
    let options = RenameOptions {
        format_in: args.format_in,
        format_out: args.format_out,
        dry_run: args.dry_run,
    };
    let renames = rename::rename_files(&args.files, &options)?;
    tracing::info!(count = renames.len(), dry_run = options.dry_run, "rename finished");
    Ok(())
}

fn execute_tree_file_count(args: TreeFileCountArgs) -> Result<()> {
    let path = tree::expand_tilde(&args.path);
    if !path.is_dir() {
        return Err(ToolError::MissingInput(path));
    }

    let mut counted = tree::count_files(&path)?;
    tree::sort_tree(&mut counted, args.sort.into());
    print!("{}", tree::render(&counted));
    Ok(())
}

#[derive(Parser)]
#[command(author, version, about = "A loose collection of personal scripts.")]
struct Cli {
    /// Log debug output unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Synchronise a local dictionary file with a gist.
    Sync(SyncArgs),
    /// Synchronise the dictionary of every Firefox profile.
    SyncAll(SyncAllArgs),
    /// Rename files whose names are timestamps into another pattern.
    DateRename(DateRenameArgs),
    /// Print a directory tree annotated with recursive file counts.
    TreeFileCount(TreeFileCountArgs),
}

#[derive(clap::Args)]
struct SyncArgs {
    /// Path to the file that shall be synced.
    file_path: PathBuf,

    /// GitHub token that can read and write gists. Defaults to the token in
    /// the configuration file.
    #[arg(long, env = "GIST_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// ID of the gist to sync with.
    #[arg(long)]
    gist_id: Option<String>,

    /// Sort the merged entries (default).
    #[arg(long, overrides_with = "no_sort")]
    sort: bool,

    /// Keep the merged entries in file order.
    #[arg(long, overrides_with = "sort")]
    no_sort: bool,

    /// Create public gists.
    #[arg(long)]
    public: bool,
}

#[derive(clap::Args)]
struct SyncAllArgs {
    /// Refuse to sync while Firefox is running.
    #[arg(long)]
    check_firefox: bool,

    /// GitHub token that can read and write gists.
    #[arg(long, env = "GIST_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// Directory holding the Firefox profiles. Defaults to the platform location.
    #[arg(long)]
    profiles_dir: Option<PathBuf>,

    /// Stop at the first profile that fails to sync.
    #[arg(long)]
    fail_fast: bool,

    /// Keep the merged entries in file order.
    #[arg(long)]
    no_sort: bool,
}

#[derive(clap::Args)]
struct DateRenameArgs {
    /// Files to rename.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// strftime pattern of the input file names.
    #[arg(long, default_value = rename::DEFAULT_FORMAT)]
    format_in: String,

    /// strftime pattern of the output file names.
    #[arg(long, default_value = rename::DEFAULT_FORMAT)]
    format_out: String,

    /// Only log the renames.
    #[arg(long)]
    dry_run: bool,
}

#[derive(clap::Args)]
struct TreeFileCountArgs {
    /// Root directory.
    path: PathBuf,

    /// Order of sibling folders.
    #[arg(short, long, value_enum, default_value_t = SortKind::Descending)]
    sort: SortKind,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SortKind {
    Descending,
    Ascending,
}

impl From<SortKind> for tree::SortOrder {
    fn from(kind: SortKind) -> Self {
        match kind {
            SortKind::Descending => tree::SortOrder::Descending,
            SortKind::Ascending => tree::SortOrder::Ascending,
        }
    }
}
