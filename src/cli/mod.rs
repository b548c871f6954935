//! CLI command implementations.
//!
//! This module provides the command-line interface for roster. Each submodule
//! implements a specific CLI command.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `triage` | Interactive session: browse, rate, and update (default) |
//! | `import` | Merge another snapshot file into the current one |
//! | `status` | Show disposition counts and snapshot locations |
//!
//! # Example Usage
//!
//! ```bash
//! # Rate people, opening each profile in a browser
//! roster
//!
//! # Try the flow offline against fixture data
//! roster --debug
//!
//! # Merge a snapshot exported elsewhere
//! roster import ~/Downloads/recursers.json
//! ```

mod import;
mod status;
mod triage;

pub use import::cmd_import;
pub use status::{StatusReport, cmd_status, write_status};
pub use triage::{cmd_triage, env_or_prompt_token, outcome_summary};
