//! Stock screening: admission of listed symbols by price, listing age and sector.
//!
//! The symbol limit bounds how many candidates are *examined*, not how many
//! are admitted. Every per-symbol lookup failure turns into a [`SkipReason`];
//! only the exchange listing itself can fail the whole pass.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Duration, NaiveDate};
use tracing::{info, warn};

use crate::domain::error::HhhlError;
use crate::domain::profile::CompanyProfile;
use crate::ports::market_data_port::{CompanyDetailsPort, MarketDataPort};

pub const DEFAULT_EXCHANGE: &str = "US";
pub const DEFAULT_SYMBOLS_LIMIT: usize = 50;
pub const DEFAULT_MAX_PRICE: f64 = 100.0;
pub const DEFAULT_LISTING_WINDOW_YEARS: u32 = 30;
pub const UNKNOWN_EXCHANGE: &str = "UNKNOWN";
pub const IPO_DATE_FORMAT: &str = "%Y-%m-%d";
/// Listing years are counted as fixed 365-day years.
pub const DAYS_PER_LISTING_YEAR: i64 = 365;

#[derive(Debug, Clone)]
pub struct ScreenCriteria {
    pub exchange: String,
    pub limit: usize,
    pub max_price: f64,
    pub listing_window_years: u32,
    /// Sectors to reject, compared case-insensitively. Empty means no exclusion.
    pub excluded_sectors: BTreeSet<String>,
    pub as_of: NaiveDate,
}

impl ScreenCriteria {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            exchange: DEFAULT_EXCHANGE.to_string(),
            limit: DEFAULT_SYMBOLS_LIMIT,
            max_price: DEFAULT_MAX_PRICE,
            listing_window_years: DEFAULT_LISTING_WINDOW_YEARS,
            excluded_sectors: BTreeSet::new(),
            as_of,
        }
    }

    /// Listings on or before this date are too old to admit.
    pub fn listing_cutoff(&self) -> NaiveDate {
        let days = DAYS_PER_LISTING_YEAR * i64::from(self.listing_window_years);
        Duration::try_days(days)
            .and_then(|window| self.as_of.checked_sub_signed(window))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn excludes_sector(&self, sector: &str) -> bool {
        let sector = sector.trim().to_lowercase();
        self.excluded_sectors
            .iter()
            .any(|s| s.trim().to_lowercase() == sector)
    }
}

/// A symbol that passed every admission check.
#[derive(Debug, Clone)]
pub struct AcceptedStock {
    pub symbol: String,
    pub exchange: String,
    pub profile: CompanyProfile,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    ProfileUnavailable(String),
    EmptyProfile,
    ExcludedSector(String),
    MissingIpoDate,
    QuoteUnavailable(String),
    /// A zero quote is how the provider reports "no price"; it is never a real price here.
    ZeroPrice,
    PriceAboveMax { price: f64, max_price: f64 },
    InvalidIpoDate(String),
    ListedBeforeCutoff { ipo: NaiveDate, cutoff: NaiveDate },
    DetailsUnavailable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ProfileUnavailable(e) => write!(f, "profile lookup failed ({e})"),
            SkipReason::EmptyProfile => write!(f, "profile is empty"),
            SkipReason::ExcludedSector(s) => write!(f, "sector {s} is excluded"),
            SkipReason::MissingIpoDate => write!(f, "IPO date is missing"),
            SkipReason::QuoteUnavailable(e) => write!(f, "quote lookup failed ({e})"),
            SkipReason::ZeroPrice => write!(f, "current price is 0"),
            SkipReason::PriceAboveMax { price, max_price } => {
                write!(f, "current price {price} exceeds max price {max_price}")
            }
            SkipReason::InvalidIpoDate(raw) => write!(f, "invalid IPO date format: {raw:?}"),
            SkipReason::ListedBeforeCutoff { ipo, cutoff } => {
                write!(f, "IPO date {ipo} is not after minimum listing date {cutoff}")
            }
            SkipReason::DetailsUnavailable(e) => write!(f, "company details lookup failed ({e})"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct ScreenOutcome {
    pub accepted: Vec<AcceptedStock>,
    pub skipped: Vec<SkippedSymbol>,
    pub examined: usize,
}

/// Screens the first `criteria.limit` listed symbols of `criteria.exchange`.
pub fn screen(
    market: &dyn MarketDataPort,
    details: &dyn CompanyDetailsPort,
    criteria: &ScreenCriteria,
) -> Result<ScreenOutcome, HhhlError> {
    let candidates = market.list_symbols(&criteria.exchange)?;
    info!(
        exchange = %criteria.exchange,
        listed = candidates.len(),
        limit = criteria.limit,
        "fetched symbol listing"
    );

    let mut outcome = ScreenOutcome::default();

    for candidate in candidates.iter().take(criteria.limit) {
        outcome.examined += 1;
        match admit(market, details, criteria, &candidate.symbol) {
            Ok(stock) => {
                info!(symbol = %stock.symbol, exchange = %stock.exchange, price = stock.price, "included");
                outcome.accepted.push(stock);
            }
            Err(reason) => {
                warn!(symbol = %candidate.symbol, "excluded: {reason}");
                outcome.skipped.push(SkippedSymbol {
                    symbol: candidate.symbol.clone(),
                    reason,
                });
            }
        }
    }

    Ok(outcome)
}

fn admit(
    market: &dyn MarketDataPort,
    details: &dyn CompanyDetailsPort,
    criteria: &ScreenCriteria,
    symbol: &str,
) -> Result<AcceptedStock, SkipReason> {
    let profile = market
        .company_profile(symbol)
        .map_err(|e| SkipReason::ProfileUnavailable(e.to_string()))?;
    if profile.is_empty() {
        return Err(SkipReason::EmptyProfile);
    }

    if let Some(sector) = profile.sector().filter(|s| criteria.excludes_sector(s)) {
        return Err(SkipReason::ExcludedSector(sector.to_string()));
    }

    let ipo_raw = profile
        .get("ipo")
        .ok_or(SkipReason::MissingIpoDate)?
        .to_string();
    let exchange = profile.exchange().unwrap_or(UNKNOWN_EXCHANGE).to_string();

    let price = market
        .current_price(symbol)
        .map_err(|e| SkipReason::QuoteUnavailable(e.to_string()))?;
    if price == 0.0 {
        return Err(SkipReason::ZeroPrice);
    }
    if price > criteria.max_price {
        return Err(SkipReason::PriceAboveMax {
            price,
            max_price: criteria.max_price,
        });
    }

    let ipo = NaiveDate::parse_from_str(&ipo_raw, IPO_DATE_FORMAT)
        .map_err(|_| SkipReason::InvalidIpoDate(ipo_raw.clone()))?;
    let cutoff = criteria.listing_cutoff();
    if ipo <= cutoff {
        return Err(SkipReason::ListedBeforeCutoff { ipo, cutoff });
    }

    let extra = details
        .company_details(symbol)
        .map_err(|e| SkipReason::DetailsUnavailable(e.to_string()))?;
    let profile = match extra {
        Some(extra) => CompanyProfile::merge(&profile, &extra),
        None => profile,
    };

    Ok(AcceptedStock {
        symbol: symbol.to_string(),
        exchange,
        profile,
        price,
    })
}
