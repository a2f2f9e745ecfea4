//! Brinson-style attribution of active return.
//!
//! Active return (portfolio return minus benchmark return) is split into:
//!
//! - **Allocation**: the effect of weighting an instrument or sector differently
//! - **Selection**: the effect of earning a different return within it
//! - **Interaction**: the cross term of the two
//!
//! [`attribute`] works per instrument from records and prices read through an
//! [`AttributionSource`]. [`attribute_segments`] is the same arithmetic over
//! weights and returns the caller already has. [`sector_attribution`] groups
//! holdings by sector and measures allocation against the total benchmark
//! return (Brinson-Fachler).
//!
//! # Example
//!
//! ```rust,ignore
//! use perfcalc_analytics::attribution::*;
//!
//! let source = InMemorySource::from(document);
//! let result = attribute(&source, "GROWTH", "MSCI-W", start, end)?;
//! assert_eq!(result.total_effect, result.active_return);
//! ```

mod brinson;
pub mod sector;
pub mod source;

pub use brinson::{
    attribute, attribute_segments, AttributionAnalysisResult, AttributionResult, SegmentInput,
};
pub use sector::{sector_attribution, SectorAttribution, SectorAttributionResult, SectorHolding};
pub use source::{
    AttributionSource, BenchmarkConstituent, BenchmarkPriceRecord, BenchmarkRecord, FallbackSource,
    InMemorySource, PortfolioPosition, PortfolioRecord, PriceRecord, SourceDocument,
};
