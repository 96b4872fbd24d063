//! Core domain types, configuration, slugs, headshot storage and JSON output
//! for election candidate extraction.

pub mod config;
pub mod error;
pub mod headshot;
pub mod output;
pub mod slug;
pub mod types;

pub use config::{ColumnLayout, TitleOverrides};
pub use error::{Error, Result};
pub use headshot::{headshot_file_name, DirectorySink, HeadshotSink};
pub use output::{to_json, write_json};
pub use slug::slugify;
pub use types::{Ballot, Candidate, Position};
