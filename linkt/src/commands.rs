use clap::{arg, command};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub const SITEMAP: &str = "sitemap";
pub const TEST: &str = "test";
pub const SCREENSHOT: &str = "screenshot";
pub const HELP: &str = "help";

// Optional so a bare `linkt sitemap` gets linkt's own usage text
fn url_arg() -> clap::Arg {
    arg!([URL]).help("The root URL to start crawling from")
}

fn dir_arg(help: &'static str) -> clap::Arg {
    arg!(--"dir" <PATH>).required(false).help(help)
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkt")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkt")
        .styles(CLAP_STYLING)
        .disable_version_flag(true)
        .disable_help_subcommand(true)
        .arg(
            arg!(-v --"version" "Show the version number")
                .required(false)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--"debug" "Show debug logs (disables the progress animation)")
                .required(false)
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--"delay" <MILLISECONDS>)
                .required(false)
                .global(true)
                .help("The amount of time to delay each HTTP request")
                .value_parser(clap::value_parser!(u64))
                .default_value("0"),
        )
        .subcommand_required(false)
        .subcommand(
            command!(SITEMAP)
                .about("Build a sitemap with URL as the root")
                .arg(url_arg())
                .arg(
                    arg!(--"print" "Print the sitemap to standard output")
                        .required(false)
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"xml" "Save the sitemap to an XML file")
                        .required(false)
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(dir_arg("The directory to store the XML file")),
        )
        .subcommand(
            command!(TEST)
                .about("Test for broken links in anchor, image, link, and script tags")
                .arg(url_arg())
                .arg(
                    arg!(-l --"links" "Test for broken links (default)")
                        .required(false)
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("images"),
                )
                .arg(
                    arg!(-i --"images" "Test for missing images")
                        .required(false)
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"json" "Save the test results to a JSON file")
                        .required(false)
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"internal-only" "Only test links on the same site as URL")
                        .required(false)
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(dir_arg("The directory to store the JSON file")),
        )
        .subcommand(
            command!(SCREENSHOT)
                .about("Take screenshots of all the pages on a site")
                .arg(url_arg())
                .arg(dir_arg("The directory to store the screenshots")),
        )
        .subcommand(
            command!(HELP)
                .about("Display help for a command")
                .arg(arg!([COMMAND]).required(false).help("The command to explain")),
        )
}
