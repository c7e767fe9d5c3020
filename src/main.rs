use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use locator_extractor::{
    collect_locators, Config, DocumentQuery, Framework, HtmlDocument, Language, Locator,
    OutputMode, PageSnapshot, ScanRequest, StrategyKey, NO_LOCATORS_FOUND,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "locator-extractor",
    version,
    about = "Generate test-automation locators for the interactive elements of a page"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a saved HTML file ("-" reads stdin)
    File {
        path: PathBuf,
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Scan a page snapshot captured earlier
    Snapshot {
        path: PathBuf,
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Open a page in Chrome and scan it
    #[cfg(feature = "chrome")]
    Url {
        url: String,
        /// Show the browser window
        #[arg(long)]
        headed: bool,
        #[command(flatten)]
        scan: ScanArgs,
    },
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// js, python, java, csharp or cpp
    #[arg(short, long)]
    language: Option<Language>,

    /// cypress, selenium or playwright
    #[arg(short, long)]
    framework: Option<Framework>,

    /// Strategy keys, highest priority first (e.g. id,data-testid,name)
    #[arg(long, value_delimiter = ',')]
    priority: Vec<StrategyKey>,

    /// statement or string
    #[arg(short, long)]
    output: Option<OutputMode>,

    /// Never fall back to nth-of-type or absolute XPath selectors
    #[arg(long)]
    safe_only: bool,

    /// Print locators as JSON
    #[arg(long)]
    json: bool,
}

impl ScanArgs {
    // Command line wins over the config file.
    fn request(&self, mut request: ScanRequest) -> ScanRequest {
        if let Some(language) = self.language {
            request.language = language;
        }
        if let Some(framework) = self.framework {
            request.framework = framework;
        }
        if !self.priority.is_empty() {
            request.priority_order = self.priority.clone();
        }
        if let Some(mode) = self.output {
            request.output_mode = mode;
        }
        request.safe_only |= self.safe_only;
        request
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_html(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .context("Failed to read HTML from stdin")?;
        return Ok(html);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_locators(locators: &[Locator], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(locators)?);
    } else if locators.is_empty() {
        println!("{}", NO_LOCATORS_FOUND);
    } else {
        for locator in locators {
            println!("{}", locator.code);
        }
    }
    Ok(())
}

fn scan_document<D: DocumentQuery>(document: &D, args: &ScanArgs, config: &Config) -> Result<()> {
    let request = args.request(config.scan.clone());
    info!(
        "Scanning for {} / {} ({} output)",
        request.language, request.framework, request.output_mode
    );
    print_locators(&collect_locators(document, &request), args.json)
}

#[cfg(feature = "chrome")]
async fn scan_url(url: &str, headed: bool, args: &ScanArgs, config: &Config) -> Result<()> {
    use locator_extractor::LocatorSession;

    let mut browser_config = config.browser.clone();
    if headed {
        browser_config.headless = false;
    }

    let mut session = LocatorSession::with_config(browser_config)
        .await
        .context("Failed to start Chrome")?;
    session
        .open(url)
        .await
        .with_context(|| format!("Failed to open {}", url))?;
    let landed = session.current_url().await?;
    if landed != url {
        info!("{} redirected to {}", url, landed);
    }

    let request = args.request(config.scan.clone());
    let locators = session.collect(&request).await?;
    session.close().await?;

    print_locators(&locators, args.json)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Commands::File { path, scan } => {
            let html = read_html(&path)?;
            scan_document(&HtmlDocument::parse(&html), &scan, &config)
        }
        Commands::Snapshot { path, scan } => {
            let snapshot = PageSnapshot::from_file(&path)
                .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
            scan_document(&HtmlDocument::from_snapshot(&snapshot), &scan, &config)
        }
        #[cfg(feature = "chrome")]
        Commands::Url { url, headed, scan } => scan_url(&url, headed, &scan, &config).await,
    }
}
