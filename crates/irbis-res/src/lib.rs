//! Auxiliary server resources: INI profiles, menus, hierarchical
//! reference files, file specifications, server/database/user info
//! structures and the parameter records of search, term and correction
//! requests.
//!
//! Everything here is plain owned data parsed from (or encoded into)
//! protocol lines; the session crate shuttles the lines.

#![forbid(unsafe_code)]

pub mod database;
pub mod gbl;
pub mod ini;
pub mod menu;
pub mod params;
pub mod server;
pub mod spec_file;
pub mod tree;
pub mod user;

pub use database::DatabaseInfo;
pub use gbl::{GblSettings, GblStatement};
pub use ini::{IniFile, IniLine, IniSection};
pub use menu::{MenuEntry, MenuFile};
pub use params::{
    FoundLine, PostingParameters, SearchParameters, TableDefinition, TermInfo, TermParameters,
    TermPosting,
};
pub use server::{ClientInfo, ProcessInfo, ServerStat, VersionInfo};
pub use spec_file::FileSpecification;
pub use tree::{TreeFile, TreeNode};
pub use user::UserInfo;

/// Failures while parsing a resource file.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// An entry is indented more than one level past its parent.
    #[error("broken indentation at line {0} of a tree file")]
    BrokenTree(usize),
}
