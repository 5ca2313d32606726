pub mod commands;
pub mod handlers;
pub mod progress;

pub use handlers::{
    LinkTestConfig, LinkTestSummary, crawl_sitemap, parse_root, run_link_test, run_screenshots,
};
