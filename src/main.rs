use clap::{Parser, Subcommand};
use flickr_embed::api::{CachedApi, RestClient};
use flickr_embed::cache::{API_MEMO_FILENAME, DiskMemo, FRAGMENT_MEMO_FILENAME, Memo, MemoryMemo};
use flickr_embed::config::{self, EmbedConfig};
use flickr_embed::expand::{self, ExpandOptions};
use flickr_embed::tags::{IMAGE_TAG, SET_TAG, Tag, TagContext};
use flickr_embed::{output, sizes};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flickr-embed")]
#[command(about = "Expand Flickr photo and photo-set tags into static HTML")]
#[command(long_about = "\
Expand Flickr photo and photo-set tags into static HTML

Pages may contain two tags, each on a single line:

  {% flickr_image <photo-id> [size] [class] [description] %}
  {% flickr_set <set-id> [size] [nodesc] %}

Arguments are separated by spaces; quote them ('a b' or \"a b\") or escape
spaces with a backslash to keep them together. Sizes are Flickr size codes
(default m); run 'flickr-embed sizes' to list them.

Credentials come from FLICKR_API_KEY and FLICKR_API_SECRET (a .env file in
the working directory is read too), falling back to [flickr] in the config
file. Run 'flickr-embed gen-config' to generate a documented flickr.toml.

API responses and rendered tags are memoized under the cache directory, so
rebuilding an unchanged site makes no network requests.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "flickr.toml", global = true)]
    config: PathBuf,

    /// Don't read or write the on-disk cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// More logging (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Expand every page of a site directory into an output directory
    Expand {
        /// Site source directory
        #[arg(long, default_value = "site")]
        source: PathBuf,

        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,

        /// Convert Markdown pages to HTML after expansion
        #[arg(long)]
        markdown: bool,
    },
    /// Render one flickr_image tag to stdout
    Photo {
        /// Tag arguments, e.g. "12345 z right"
        markup: String,
    },
    /// Render one flickr_set tag to stdout
    Set {
        /// Tag arguments, e.g. "72157600000000000 q nodesc"
        markup: String,
    },
    /// List the size codes in fallback order
    Sizes,
    /// Print a stock flickr.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Sizes => {
            output::print_sizes(sizes::catalog());
            return Ok(());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        _ => {}
    }

    dotenvy::dotenv().ok();
    let config = config::load_config(&cli.config)?;
    let credentials = config::resolve_credentials(&config.flickr)
        .inspect_err(|e| warn!("{e}"))
        .ok();

    let use_disk = config.cache.enabled && !cli.no_cache;
    let api_memo = open_memo(&config, use_disk, API_MEMO_FILENAME);
    let fragment_memo = open_memo(&config, use_disk, FRAGMENT_MEMO_FILENAME);

    let api = CachedApi::new(RestClient::new(&config.flickr, credentials)?, api_memo);
    let ctx = TagContext {
        api: &api,
        memo: fragment_memo.as_ref(),
        player: &config.player,
    };

    match cli.command {
        Command::Expand {
            source,
            output: output_dir,
            markdown,
        } => {
            info!(source = %source.display(), output = %output_dir.display(), "expanding site");
            let summary = expand::expand_site(&source, &output_dir, &ctx, ExpandOptions { markdown })?;
            output::print_expand_summary(&summary, &api.memo().stats(), &fragment_memo.stats());
        }
        Command::Photo { markup } => render_one(IMAGE_TAG, &markup, &ctx)?,
        Command::Set { markup } => render_one(SET_TAG, &markup, &ctx)?,
        Command::Sizes | Command::GenConfig => {}
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over the `-v` count.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_memo(config: &EmbedConfig, use_disk: bool, file_name: &str) -> Box<dyn Memo> {
    if use_disk {
        Box::new(DiskMemo::in_dir(Path::new(&config.cache.dir), file_name))
    } else {
        Box::new(MemoryMemo::new())
    }
}

fn render_one(
    name: &str,
    markup: &str,
    ctx: &TagContext,
) -> Result<(), Box<dyn std::error::Error>> {
    let tag = Tag::parse(name, markup)?;
    println!("{}", tag.render(ctx)?);
    Ok(())
}
