//! A personal budget tracker that records income and expenses in a Google Sheet.
//!
//! Income and expenses are stored in the `income` and `expenses` worksheets, one column per
//! category. A [`Session`] holds the connection to the sheet and an in-memory mirror of the
//! expenses, see [`ledger`]. Totals are computed by [`summary`].

mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod ledger;
pub mod model;
pub mod prompt;
mod session;
pub mod summary;
mod utils;


pub use api::{Mode, RowCol, Sheet};
pub use config::{Config, Worksheets};
pub use error::{Error, ErrorType, Result};
pub use session::Session;
