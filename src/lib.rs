// Generate TypeScript id -> name lookup maps from the weirdgloop data files.

pub mod extract;
pub mod fetch;
pub mod logging;
pub mod output;
pub mod render;
pub mod run;
pub mod source;

pub use fetch::{Fetch, HttpFetcher};
pub use run::{run, SyncReport};
pub use source::{OnMissingField, Shape, SourceDescriptor};
