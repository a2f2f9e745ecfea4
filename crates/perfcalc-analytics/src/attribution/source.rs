//! Data access for attribution: portfolio and benchmark records plus prices.

use std::collections::HashMap;

use perfcalc_core::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A position held by a portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioPosition {
    /// Instrument identifier used for price lookups.
    pub instrument_id: String,
    /// Units held over the period.
    pub units: Decimal,
}

/// A portfolio's holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioRecord {
    /// Portfolio identifier.
    pub id: String,
    /// Positions held.
    pub positions: Vec<PortfolioPosition>,
}

/// A benchmark constituent and its stored weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkConstituent {
    /// Instrument identifier.
    pub instrument_id: String,
    /// Weight in the benchmark.
    pub weight: Decimal,
}

/// A benchmark's composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Benchmark identifier.
    pub id: String,
    /// Constituents with weights.
    pub constituents: Vec<BenchmarkConstituent>,
}

/// Read access to the records attribution needs.
///
/// Implementations wrap whatever store holds portfolios, benchmarks and
/// prices. The calculator never mutates through this trait.
pub trait AttributionSource {
    /// Looks up a portfolio.
    fn portfolio(&self, id: &str) -> Option<PortfolioRecord>;

    /// Looks up a benchmark.
    fn benchmark(&self, id: &str) -> Option<BenchmarkRecord>;

    /// Instrument price on a date.
    fn price(&self, instrument_id: &str, date: Date) -> Option<Decimal>;

    /// Price of a constituent as recorded by a benchmark.
    ///
    /// Defaults to [`AttributionSource::price`].
    fn benchmark_price(
        &self,
        benchmark_id: &str,
        instrument_id: &str,
        date: Date,
    ) -> Option<Decimal> {
        let _ = benchmark_id;
        self.price(instrument_id, date)
    }
}

/// Tries a list of sources in order, returning the first hit.
///
/// # Example
///
/// ```rust,ignore
/// let source = FallbackSource::new()
///     .with_source(primary)
///     .with_source(backup);
/// let result = attribute(&source, "P1", "BM1", start, end)?;
/// ```
#[derive(Default)]
pub struct FallbackSource {
    sources: Vec<Box<dyn AttributionSource + Send + Sync>>,
}

impl FallbackSource {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source at the lowest priority.
    #[must_use]
    pub fn with_source(mut self, source: impl AttributionSource + Send + Sync + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Number of sources in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True if the chain has no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for FallbackSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackSource")
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl AttributionSource for FallbackSource {
    fn portfolio(&self, id: &str) -> Option<PortfolioRecord> {
        self.sources.iter().find_map(|s| s.portfolio(id))
    }

    fn benchmark(&self, id: &str) -> Option<BenchmarkRecord> {
        self.sources.iter().find_map(|s| s.benchmark(id))
    }

    fn price(&self, instrument_id: &str, date: Date) -> Option<Decimal> {
        self.sources.iter().find_map(|s| s.price(instrument_id, date))
    }

    fn benchmark_price(
        &self,
        benchmark_id: &str,
        instrument_id: &str,
        date: Date,
    ) -> Option<Decimal> {
        self.sources
            .iter()
            .find_map(|s| s.benchmark_price(benchmark_id, instrument_id, date))
    }
}

/// A dated instrument price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Instrument identifier.
    pub instrument_id: String,
    /// Price date.
    pub date: Date,
    /// Price.
    pub price: Decimal,
}

/// A dated constituent price recorded by a benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkPriceRecord {
    /// Benchmark identifier.
    pub benchmark_id: String,
    /// Instrument identifier.
    pub instrument_id: String,
    /// Price date.
    pub date: Date,
    /// Price.
    pub price: Decimal,
}

/// Flat, serialisable form of an [`InMemorySource`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceDocument {
    /// Portfolios.
    pub portfolios: Vec<PortfolioRecord>,
    /// Benchmarks.
    pub benchmarks: Vec<BenchmarkRecord>,
    /// Instrument prices.
    pub prices: Vec<PriceRecord>,
    /// Benchmark-specific constituent prices.
    pub benchmark_prices: Vec<BenchmarkPriceRecord>,
}

/// Attribution data held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    portfolios: HashMap<String, PortfolioRecord>,
    benchmarks: HashMap<String, BenchmarkRecord>,
    prices: HashMap<(String, Date), Decimal>,
    benchmark_prices: HashMap<(String, String, Date), Decimal>,
}

impl InMemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a portfolio.
    #[must_use]
    pub fn with_portfolio(mut self, portfolio: PortfolioRecord) -> Self {
        self.portfolios.insert(portfolio.id.clone(), portfolio);
        self
    }

    /// Adds or replaces a benchmark.
    #[must_use]
    pub fn with_benchmark(mut self, benchmark: BenchmarkRecord) -> Self {
        self.benchmarks.insert(benchmark.id.clone(), benchmark);
        self
    }

    /// Records an instrument price.
    #[must_use]
    pub fn with_price(
        mut self,
        instrument_id: impl Into<String>,
        date: Date,
        price: Decimal,
    ) -> Self {
        self.prices.insert((instrument_id.into(), date), price);
        self
    }

    /// Records a benchmark-specific constituent price.
    #[must_use]
    pub fn with_benchmark_price(
        mut self,
        benchmark_id: impl Into<String>,
        instrument_id: impl Into<String>,
        date: Date,
        price: Decimal,
    ) -> Self {
        self.benchmark_prices
            .insert((benchmark_id.into(), instrument_id.into(), date), price);
        self
    }
}

impl From<SourceDocument> for InMemorySource {
    fn from(doc: SourceDocument) -> Self {
        let mut source = InMemorySource::new();
        for p in doc.portfolios {
            source = source.with_portfolio(p);
        }
        for b in doc.benchmarks {
            source = source.with_benchmark(b);
        }
        for p in doc.prices {
            source = source.with_price(p.instrument_id, p.date, p.price);
        }
        for p in doc.benchmark_prices {
            source = source.with_benchmark_price(p.benchmark_id, p.instrument_id, p.date, p.price);
        }
        source
    }
}

impl AttributionSource for InMemorySource {
    fn portfolio(&self, id: &str) -> Option<PortfolioRecord> {
        self.portfolios.get(id).cloned()
    }

    fn benchmark(&self, id: &str) -> Option<BenchmarkRecord> {
        self.benchmarks.get(id).cloned()
    }

    fn price(&self, instrument_id: &str, date: Date) -> Option<Decimal> {
        self.prices.get(&(instrument_id.to_string(), date)).copied()
    }

    fn benchmark_price(
        &self,
        benchmark_id: &str,
        instrument_id: &str,
        date: Date,
    ) -> Option<Decimal> {
        self.benchmark_prices
            .get(&(benchmark_id.to_string(), instrument_id.to_string(), date))
            .copied()
            .or_else(|| self.price(instrument_id, date))
    }
}
