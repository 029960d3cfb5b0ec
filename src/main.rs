use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use statements::config::{self, StatementsConfig};
use statements::output::json::{ListOutput, OptionsOutput};
use statements::output::{json as json_out, table};
use statements::statement::feed::feed_for;
use statements::url_sync::{AddressBar, DEFAULT_BASE};
use statements::{Category, FilterCatalog, I18n, MemoryAddressBar, OrderBy, Session};

#[derive(Parser)]
#[command(name = "statements", version, about = "Filter, search and sort a feed of dated public statements")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Statement feed: path or http(s) URL of statements.json
    #[arg(long, global = true, env = "STATEMENTS_FEED")]
    feed: Option<String>,

    /// Label file (JSON, YAML or TOML)
    #[arg(long, global = true)]
    i18n: Option<PathBuf>,

    /// Config file (default: ~/.statements/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List statements matching a selection
    List {
        /// Page address to restore the selection from (e.g. "?t=starvation&o=new")
        #[arg(long)]
        url: Option<String>,

        /// Toggle a theme by slug
        #[arg(long)]
        theme: Vec<String>,

        /// Toggle a sector by slug
        #[arg(long)]
        sector: Vec<String>,

        /// Toggle a speaker by slug
        #[arg(long)]
        speaker: Vec<String>,

        /// Search statement text (case-sensitive)
        #[arg(long)]
        search: Option<String>,

        /// Newest first
        #[arg(long)]
        newest: bool,

        /// Maximum statements to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List speakers with statement counts
    Speakers {
        /// Only speakers whose name contains this text
        #[arg(long)]
        filter: Option<String>,
    },

    /// List theme filters
    Themes,

    /// List sector filters
    Sectors,

    /// Print the normalized feed as JSON
    Normalize,

    /// Show or create the config file
    Config {
        /// Write a commented default config if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let json_output = cli.json;
    let cfg = StatementsConfig::load(cli.config.as_deref())?;

    if let Commands::Config { init } = cli.command {
        if init {
            if config::init_config()? {
                println!("Created {}", config::config_path()?.display());
            } else {
                println!("Config already exists: {}", config::config_path()?.display());
            }
        } else {
            println!("{}", cfg.display());
        }
        return Ok(());
    }

    let i18n = match cli.i18n.as_ref().or(cfg.i18n.as_ref()) {
        Some(path) => I18n::load(path)
            .with_context(|| format!("Failed to load labels: {}", path.display()))?,
        None => I18n::default(),
    };

    match cli.command {
        Commands::Themes | Commands::Sectors => {
            let catalog = FilterCatalog::new(&i18n);
            let (category, options) = if matches!(cli.command, Commands::Themes) {
                (Category::Theme, catalog.themes())
            } else {
                (Category::Sector, catalog.sectors())
            };
            if json_output {
                json_out::print_json(&OptionsOutput {
                    category: category.as_str(),
                    options,
                })?;
            } else {
                table::print_options(&format!("{}s", category.as_str()), options);
            }
            return Ok(());
        }
        Commands::Config { .. } => return Ok(()),
        _ => {}
    }

    let feed_location = config::resolve_feed(cli.feed.as_deref(), &cfg)?;
    let feed = feed_for(&feed_location);

    match cli.command {
        Commands::List {
            url,
            theme,
            sector,
            speaker,
            search,
            newest,
            limit,
        } => {
            let address = url
                .or_else(|| cfg.base_address.clone())
                .unwrap_or_else(|| DEFAULT_BASE.to_string());
            let bar = MemoryAddressBar::parse(&address)
                .with_context(|| format!("Invalid address: {address}"))?;
            let mut session = Session::with_debounce(i18n, bar, cfg.debounce());
            session.load(feed.as_ref());

            for (category, slugs) in [
                (Category::Theme, &theme),
                (Category::Sector, &sector),
                (Category::Speaker, &speaker),
            ] {
                for slug in slugs {
                    if !session.toggle_slug(category, slug) {
                        eprintln!("Unknown {} \"{slug}\" (ignored)", category.as_str());
                    }
                }
            }
            if let Some(text) = search {
                session.set_search_phrase(&text);
                session.flush_search();
            }
            if newest {
                session.set_order_by(OrderBy::Newest);
            }

            let visible = session.visible();
            let shown = &visible[..limit.unwrap_or(visible.len()).min(visible.len())];
            let address = session.address_bar().current().to_string();
            if json_output {
                json_out::print_json(&ListOutput {
                    address,
                    query: session.query_string(),
                    total: visible.len(),
                    shown: shown.len(),
                    statements: shown.to_vec(),
                })?;
            } else {
                table::print_statement_list(shown, session.statements().len(), &address);
            }
        }

        Commands::Speakers { filter } => {
            let mut session = Session::new(i18n, MemoryAddressBar::parse(DEFAULT_BASE)?);
            session.load(feed.as_ref());
            if let Some(text) = filter {
                session.set_person_search_phrase(&text);
            }
            let options = session.visible_persons();
            if json_output {
                json_out::print_json(&OptionsOutput {
                    category: Category::Speaker.as_str(),
                    options: &options,
                })?;
            } else {
                table::print_options("speakers", &options);
            }
        }

        Commands::Normalize => {
            let mut session = Session::new(i18n, MemoryAddressBar::parse(DEFAULT_BASE)?);
            session.load(feed.as_ref());
            json_out::print_json(&session.statements())?;
        }

        Commands::Themes | Commands::Sectors | Commands::Config { .. } => {}
    }

    Ok(())
}
