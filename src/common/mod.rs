pub mod diff;
pub mod error;
pub mod fixtures;
pub mod interpolator;
pub mod manifest;
pub mod output;
pub mod report;
pub mod settings;

pub use diff::*;
pub use error::*;
pub use fixtures::*;
pub use interpolator::*;
pub use manifest::*;
pub use output::*;
pub use report::*;
pub use settings::*;
