use clap::ArgMatches;
use colored::Colorize;
use linkt::commands::{HELP, SCREENSHOT, SITEMAP, TEST, command_argument_builder};
use linkt::handlers::{
    Outcome, handle_screenshot, handle_sitemap, handle_test, init_logging, print_help,
    print_version,
};

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();

    init_logging(debug_requested(&chosen_command));

    let result = match chosen_command.subcommand() {
        Some((SITEMAP, primary_command)) => handle_sitemap(primary_command).await,
        Some((TEST, primary_command)) => handle_test(primary_command).await,
        Some((SCREENSHOT, primary_command)) => handle_screenshot(primary_command).await,
        Some((HELP, primary_command)) => {
            print_help(primary_command.get_one::<String>("COMMAND").map(String::as_str));
            Ok(Outcome::Usage)
        }
        Some(_) => unreachable!("clap should ensure we don't get here"),
        None => {
            if chosen_command.get_flag("version") {
                print_version();
                Ok(Outcome::Completed)
            } else {
                print_help(None);
                Ok(Outcome::Usage)
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
        std::process::exit(1);
    }
}

fn debug_requested(matches: &ArgMatches) -> bool {
    match matches.subcommand() {
        Some((_, sub)) => sub.get_flag("debug"),
        None => matches.get_flag("debug"),
    }
}
