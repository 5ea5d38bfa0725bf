//! Incremental synchronisation of time-indexed geophysical data archives.
//!
//! Archives publish one file per reference date on a daily, weekly, monthly,
//! dekadal or N-day grid. [`dateindex::generate`] produces that grid for a date
//! range, [`plan::plan`] reduces it to the files still missing locally, and
//! [`sync::sync_source`] fetches them through a [`transport::Transport`].

pub mod archive;
pub mod config;
pub mod dateindex;
pub mod dekad;
pub mod error;
pub mod interval;
pub mod plan;
pub mod source;
pub mod sync;
pub mod template;
pub mod transport;

pub use dateindex::generate;
pub use error::{IndexError, TemplateError};
pub use interval::IntervalKind;
pub use plan::{plan, FetchTask, LocalState, SubStream};
