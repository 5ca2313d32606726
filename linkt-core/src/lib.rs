pub mod link_set;
pub mod page;
pub mod report;
pub mod sitemap;
pub mod tree;
pub mod util;

pub use link_set::{LinkKind, LinkSet};
pub use page::{Page, PageResponse};
pub use sitemap::{Sitemap, SitemapError};
pub use tree::{Node, NodeId, Tree, TreeError};

use colored::Colorize;

const BANNER: &str = r#"
 ___       ___  ________   ___  __    _________
|\  \     |\  \|\   ___  \|\  \|\  \ |\___   ___\
\ \  \    \ \  \ \  \\ \  \ \  \/  /|\|___ \  \_|
 \ \  \    \ \  \ \  \\ \  \ \   ___  \   \ \  \
  \ \  \____\ \  \ \  \\ \  \ \  \\ \  \   \ \  \
   \ \_______\ \__\ \__\\ \__\ \__\\ \__\   \ \__\
    \|_______|\|__|\|__| \|__|\|__| \|__|    \|__|"#;

pub fn print_banner() {
    println!(
        "{}    {}\n",
        BANNER.truecolor(255, 175, 95),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_white()
    );
}
