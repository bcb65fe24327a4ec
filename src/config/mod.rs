//! Configuration module for Trawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: every setting has a default.
//!
//! # Example
//!
//! ```no_run
//! use trawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("trawler.toml")).unwrap();
//! println!("Politeness delay: {}ms", config.crawler.politeness_delay);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_ACCEPT, DEFAULT_USER_AGENT,
};

pub use parser::{load_config, parse_config};
pub use validation::validate;
