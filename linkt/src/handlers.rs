use crate::commands::{SCREENSHOT, SITEMAP, TEST};
use crate::progress::Progress;
use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use linkt_core::report::{prepare_report_dir, write_report};
use linkt_core::util::{parse_absolute_url, prepare_root_input};
use linkt_core::{Sitemap, print_banner};
use linkt_scanner::{
    Capture, CrawlOptions, LinkTestHandler, LinkTestScope, ProgressCallback, ScreenshotHandler,
    SitemapHandler, Spider,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, error};
use url::Url;

const SITEMAP_ANIMATION: &str = "collecting links";
#[cfg(feature = "browser")]
const SCREENSHOT_ANIMATION: &str = "taking screenshots";

/// Installs the log subscriber. Debug runs log every fetch and link; normal
/// runs only log errors.
pub fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::ERROR };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Normalizes and validates the root URL given on the command line.
/// Returns the cleaned input alongside the parsed URL.
pub fn parse_root(input: &str) -> Option<(String, Url)> {
    let prepared = prepare_root_input(input);
    let url = parse_absolute_url(&prepared)?;
    Some((prepared, url))
}

/// Expands `~` in a user supplied directory.
pub fn expand_dir(dir: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(dir).as_ref())
}

/// Options shared by every crawling command.
pub fn crawl_options(args: &ArgMatches) -> CrawlOptions {
    let delay = args.get_one::<u64>("delay").copied().unwrap_or(0);
    CrawlOptions::default().with_delay(Duration::from_millis(delay))
}

/// How a command ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Arguments were incomplete; usage text was printed.
    Usage,
    InvalidRoot,
    NotImplemented,
}

fn url_from_args(args: &ArgMatches) -> Option<&str> {
    args.get_one::<String>("URL").map(String::as_str)
}

fn checked_root(input: &str) -> Option<(String, Url)> {
    let root = parse_root(input);
    if root.is_none() {
        error!(url = input, "invalid URL");
        eprintln!("{} invalid URL: {}", "✗".red().bold(), input);
    }
    root
}

fn dir_from_args(args: &ArgMatches) -> Option<PathBuf> {
    args.get_one::<String>("dir").map(|d| expand_dir(d))
}

// --- sitemap ---------------------------------------------------------------

/// Crawls `root` into a sitemap.
pub async fn crawl_sitemap(
    root: &Url,
    options: CrawlOptions,
    progress: Option<ProgressCallback>,
) -> Result<Sitemap> {
    let mut spider = Spider::with_options(SitemapHandler, options)?;
    if let Some(callback) = progress {
        spider = spider.with_progress_callback(callback);
    }
    let sitemap = spider
        .crawl(root)
        .await
        .with_context(|| format!("failed to crawl {}", root))?;
    Ok(sitemap)
}

pub async fn handle_sitemap(args: &ArgMatches) -> Result<Outcome> {
    let print = args.get_flag("print");
    let xml = args.get_flag("xml");
    let debug = args.get_flag("debug");
    let dir = dir_from_args(args);

    if !print && !xml {
        print_help(Some(SITEMAP));
        return Ok(Outcome::Usage);
    }
    if xml && dir.is_none() {
        print!("{}", XML_USAGE);
        return Ok(Outcome::Usage);
    }
    let Some(input) = url_from_args(args) else {
        print_help(Some(SITEMAP));
        return Ok(Outcome::Usage);
    };
    let Some((_, root)) = checked_root(input) else {
        return Ok(Outcome::InvalidRoot);
    };

    let progress = (!debug).then(|| Progress::start(SITEMAP_ANIMATION));
    let callback = progress.as_ref().map(|p| p.callback(SITEMAP_ANIMATION));
    let result = crawl_sitemap(&root, crawl_options(args), callback).await;
    if let Some(progress) = progress {
        progress.finish().await;
    }
    let sitemap = result?;

    println!("\n{} sitemap was created!", "[SUCCESS]".green());
    if print {
        sitemap.print();
    }
    if xml && let Some(dir) = dir {
        let path = sitemap.write_xml(&dir)?;
        println!("\nsitemap was saved to {}\n", path.display().to_string().green());
    }
    Ok(Outcome::Completed)
}

// --- test ------------------------------------------------------------------

/// How a link test should run and where its results go.
#[derive(Debug, Clone, Default)]
pub struct LinkTestConfig {
    pub scope: LinkTestScope,
    pub json_dir: Option<PathBuf>,
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTestSummary {
    pub tested: usize,
    pub broken: usize,
    pub report: Option<PathBuf>,
}

/// Tests every link reachable from `root`. `root_input` is the URL as the
/// user typed it; it names the JSON report.
pub async fn run_link_test(
    root_input: &str,
    root: &Url,
    options: CrawlOptions,
    config: LinkTestConfig,
) -> Result<LinkTestSummary> {
    // fail on an unusable directory before spending time on the crawl
    if let Some(ref dir) = config.json_dir {
        prepare_report_dir(dir)?;
    }

    let mut handler = LinkTestHandler::new()
        .with_scope(config.scope)
        .with_quiet(config.quiet);
    if config.json_dir.is_some() {
        handler = handler.with_json_export();
    }

    let mut spider = Spider::with_options(handler, options)?;
    spider
        .crawl(root)
        .await
        .with_context(|| format!("failed to test {}", root))?;

    let handler = spider.into_handler();
    let (tested, broken) = (handler.tested(), handler.broken());
    let report = match config.json_dir {
        Some(dir) => Some(write_report(&dir, root_input, handler.into_records())?),
        None => None,
    };

    Ok(LinkTestSummary {
        tested,
        broken,
        report,
    })
}

pub async fn handle_test(args: &ArgMatches) -> Result<Outcome> {
    if args.get_flag("images") {
        println!("{} testing for missing images is not implemented yet", "[!]".yellow());
        return Ok(Outcome::NotImplemented);
    }
    let json = args.get_flag("json");
    let dir = dir_from_args(args);
    if json && dir.is_none() {
        print!("{}", JSON_USAGE);
        return Ok(Outcome::Usage);
    }
    let Some(input) = url_from_args(args) else {
        print_help(Some(TEST));
        return Ok(Outcome::Usage);
    };
    let Some((input, root)) = checked_root(input) else {
        return Ok(Outcome::InvalidRoot);
    };

    let scope = if args.get_flag("internal-only") {
        LinkTestScope::InternalOnly
    } else {
        LinkTestScope::All
    };
    let config = LinkTestConfig {
        scope,
        json_dir: if json { dir } else { None },
        quiet: false,
    };

    let summary = run_link_test(&input, &root, crawl_options(args), config).await?;

    let broken = if summary.broken == 0 {
        summary.broken.to_string().green()
    } else {
        summary.broken.to_string().red()
    };
    println!("\n{} links tested, {} broken", summary.tested.to_string().cyan(), broken);
    if let Some(path) = summary.report {
        println!("results were saved to {}\n", path.display().to_string().green());
    }
    Ok(Outcome::Completed)
}

// --- screenshot ------------------------------------------------------------

/// Crawls `root` and captures every internal page into `dir`. Hands the
/// capture service back so the caller can shut it down.
pub async fn run_screenshots<C: Capture>(
    root: &Url,
    options: CrawlOptions,
    capture: C,
    dir: PathBuf,
    progress: Option<ProgressCallback>,
) -> Result<(Vec<PathBuf>, C)> {
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("could not create directory {}", dir.display()))?;

    let mut spider = Spider::with_options(ScreenshotHandler::new(capture, dir), options)?;
    if let Some(callback) = progress {
        spider = spider.with_progress_callback(callback);
    }
    spider
        .crawl(root)
        .await
        .with_context(|| format!("failed to screenshot {}", root))?;

    let handler = spider.into_handler();
    let saved = handler.saved().to_vec();
    Ok((saved, handler.into_capture()))
}

pub async fn handle_screenshot(args: &ArgMatches) -> Result<Outcome> {
    let (Some(dir), Some(input)) = (dir_from_args(args), url_from_args(args)) else {
        print!("{}", SCREENSHOT_USAGE);
        return Ok(Outcome::Usage);
    };
    let Some((_, root)) = checked_root(input) else {
        return Ok(Outcome::InvalidRoot);
    };
    capture_site(&root, crawl_options(args), dir, args.get_flag("debug")).await?;
    Ok(Outcome::Completed)
}

#[cfg(feature = "browser")]
async fn capture_site(root: &Url, options: CrawlOptions, dir: PathBuf, debug: bool) -> Result<()> {
    let capture = linkt_scanner::ChromeCapture::launch().await?;

    let progress = (!debug).then(|| Progress::start(SCREENSHOT_ANIMATION));
    let callback = progress.as_ref().map(|p| p.callback(SCREENSHOT_ANIMATION));
    let result = run_screenshots(root, options, capture, dir.clone(), callback).await;
    if let Some(progress) = progress {
        progress.finish().await;
    }
    let (saved, capture) = result?;
    capture.shutdown().await;

    println!("\n{} screenshots were taken!", "[SUCCESS]".green());
    println!(
        "\n{} screenshots were saved to {}\n",
        saved.len(),
        dir.display().to_string().green()
    );
    Ok(())
}

#[cfg(not(feature = "browser"))]
async fn capture_site(_root: &Url, _options: CrawlOptions, _dir: PathBuf, _debug: bool) -> Result<()> {
    anyhow::bail!("screenshots need a headless browser; rebuild linkt with `--features browser`")
}

// --- help / version --------------------------------------------------------

const XML_USAGE: &str = "\nUsage: linkt sitemap --xml --dir <path> [options] <url>\n\n\
Options:\n\
\t--delay <milliseconds>\t\tThe amount of time to delay each HTTP request.\n\
\t--debug\t\t\t\tShow debug logs.\n\n";

const JSON_USAGE: &str = "\nUsage: linkt test --json --dir <path> [options] <url>\n\n\
Options:\n\
\t--delay <milliseconds>\t\tThe amount of time to delay each HTTP request.\n\
\t--debug\t\t\t\tShow debug logs.\n\n";

const SCREENSHOT_USAGE: &str = "\nUsage: linkt screenshot --dir <path> [options] <url>\n\n\
Options:\n\
\t--delay <milliseconds>\t\tThe amount of time to delay each HTTP request.\n\
\t--debug\t\t\t\tShow debug logs.\n\n";

const SITEMAP_HELP: &str = "\nUsage: linkt sitemap [options] <url>\n\n\
Options:\n\
\t--print\t\t\t\tPrint the sitemap to standard output.\n\
\t--xml\t\t\t\tSave the sitemap to an XML file.\n\
\t--dir <path>\t\t\tThe directory to store the XML file.\n\
\t--delay <milliseconds>\t\tThe amount of time to delay each HTTP request.\n\
\t--debug\t\t\t\tShow debug logs.\n\n";

const TEST_HELP: &str = "\nUsage: linkt test [options] <url>\n\n\
Options:\n\
\t-l, --links\t\t\tTest for broken links (default).\n\
\t-i, --images\t\t\tTest for missing images.\n\
\t--json\t\t\t\tSave the test results to a JSON file.\n\
\t--dir <path>\t\t\tThe directory to store the JSON file.\n\
\t--internal-only\t\t\tOnly test links on the same site.\n\
\t--delay <milliseconds>\t\tThe amount of time to delay each HTTP request.\n\
\t--debug\t\t\t\tShow debug logs.\n\n";

const GENERAL_HELP: &str = "\nUsage: linkt [options] <command> [<args>]\n\n\
Commands:\n\
\tsitemap\t\t\tBuild a sitemap with URL as the root.\n\
\ttest\t\t\tTest for broken links in anchor, image, link, and script tags.\n\
\tscreenshot\t\tTake screenshots of all the pages on a site.\n\
\thelp <command>\t\tDisplay help for a command.\n\n\
Options:\n\
\t-v, --version\t\t\tShow the version number.\n\
\t--delay <milliseconds>\t\tThe amount of time to delay each HTTP request.\n\
\t--debug\t\t\t\tShow debug logs.\n\n";

/// Usage text for `topic`, or the general overview.
pub fn help_text(topic: Option<&str>) -> &'static str {
    match topic.map(|t| t.trim().to_lowercase()).as_deref() {
        Some(SITEMAP) => SITEMAP_HELP,
        Some(TEST) => TEST_HELP,
        Some(SCREENSHOT) => SCREENSHOT_USAGE,
        _ => GENERAL_HELP,
    }
}

pub fn print_help(topic: Option<&str>) {
    print!("{}", help_text(topic));
}

pub fn print_version() {
    print_banner();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::command_argument_builder;

    /// Turns the `Usage:` line of a help text into a concrete argv.
    fn usage_argv(text: &str) -> Vec<String> {
        let line = text
            .lines()
            .find_map(|l| l.strip_prefix("Usage: "))
            .unwrap();
        line.replace("[options]", "--delay 10 --debug")
            .replace("<path>", "out")
            .replace("<url>", "https://example.com")
            .replace("<command> [<args>]", "sitemap --print https://example.com")
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_every_usage_line_parses() {
        for text in [XML_USAGE, JSON_USAGE, SCREENSHOT_USAGE, SITEMAP_HELP, TEST_HELP, GENERAL_HELP] {
            let argv = usage_argv(text);
            let result = command_argument_builder().try_get_matches_from(&argv);
            assert!(result.is_ok(), "usage line does not parse: {:?}", argv);
        }
    }

    #[test]
    fn test_help_topics() {
        assert_eq!(help_text(Some("Sitemap ")), SITEMAP_HELP);
        assert_eq!(help_text(Some("test")), TEST_HELP);
        assert_eq!(help_text(Some("screenshot")), SCREENSHOT_USAGE);
        assert_eq!(help_text(Some("help")), GENERAL_HELP);
        assert_eq!(help_text(None), GENERAL_HELP);
    }
}
