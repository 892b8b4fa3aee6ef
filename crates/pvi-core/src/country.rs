//! Supported target markets and their request-scoped profiles.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Markets the pipeline knows how to analyze.
///
/// The enumeration is fixed: adding a market means adding a variant and
/// its [`CountryProfile`], plus a baseline tax rate in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Country {
    India,
    UnitedKingdom,
}

/// Static facts about a target market, constructed once per request.
///
/// `geo_code` is the search-service geolocation parameter. Collectors
/// that need a different regional code (the shopping API expects `gb`
/// where search expects `uk`; the marketplace actor expects `GB`/`IN`)
/// apply their own mapping tables on top of this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryProfile {
    pub full_name: &'static str,
    pub currency_symbol: &'static str,
    pub geo_code: &'static str,
    pub tld: &'static str,
}

impl Country {
    /// All supported markets, in display order.
    #[must_use]
    pub const fn all() -> &'static [Country] {
        &[Country::India, Country::UnitedKingdom]
    }

    #[must_use]
    pub const fn profile(self) -> CountryProfile {
        match self {
            Country::India => CountryProfile {
                full_name: "India",
                currency_symbol: "₹",
                geo_code: "in",
                tld: "in",
            },
            Country::UnitedKingdom => CountryProfile {
                full_name: "United Kingdom",
                currency_symbol: "£",
                geo_code: "uk",
                tld: "co.uk",
            },
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().full_name)
    }
}

impl FromStr for Country {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "india" | "in" => Ok(Country::India),
            "uk" | "gb" | "united kingdom" => Ok(Country::UnitedKingdom),
            other => Err(CoreError::UnsupportedCountry(other.to_string())),
        }
    }
}
