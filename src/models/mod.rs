//! Domain models for fishbone analysis.
//!
//! # Core Concepts
//!
//! - [`Category`]: One of the six fixed "6M" branches of the diagram.
//! - [`ProblemStatement`]: The effect under analysis. Never empty.
//! - [`Cause`]: A candidate cause within one category, carrying its "why" chain.
//! - [`RootCauseStep`]: One answer in a 5 Whys chain, indexed by depth starting at 1.
//! - [`AnalysisResult`]: The assembled tree for one run, plus metadata.

mod analysis;
mod category;

pub use analysis::*;
pub use category::*;
