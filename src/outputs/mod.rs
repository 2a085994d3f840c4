//! Output generation for a finished batch.
//!
//! # Submodules
//!
//! - [`text`]: Renders articles for the terminal
//! - [`json`]: Writes a JSON snapshot of the batch
//!
//! # Snapshot Layout
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── feeds_081500.json
//!     └── feeds_201502.json
//! ```

pub mod json;
pub mod text;
