//! # featurelines
//!
//! Parses the `URI[:LINE]*` identifiers used to pick scenarios and example rows
//! out of a feature file, e.g. `features/login.feature:12:30`.
//!
//! The locator half is handed to a [`resolve::LocatorResolver`]; the default
//! [`resolve::FeatureUriResolver`] turns paths and URIs into a [`uri::FeatureUri`].
#![deny(clippy::all)]
pub mod error;
pub mod feature;
pub mod lines;
pub mod parse;
pub mod resolve;
pub mod uri;

pub use error::{Cause, Error, LineError, LocatorError};
pub use feature::FeatureWithLines;
pub use lines::LineSet;
pub use resolve::{FeatureUriResolver, LocatorResolver};
pub use uri::FeatureUri;
