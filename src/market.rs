use chrono_tz::Tz;
use indexmap::IndexMap;

/// Markets the tracker knows about out of the box.
const KNOWN_MARKETS: &[(&str, Tz)] = &[
    ("raleigh", Tz::America__New_York),
    ("los-angeles", Tz::America__Los_Angeles),
];

/// Maps a market slug to the IANA zone its showtimes are displayed in.
#[derive(Debug, Clone)]
pub struct MarketRegistry {
    markets: IndexMap<String, Tz>,
    default_zone: Tz,
}

impl MarketRegistry {
    pub fn new(default_zone: Tz) -> Self {
        Self {
            markets: KNOWN_MARKETS
                .iter()
                .map(|(slug, tz)| ((*slug).to_owned(), *tz))
                .collect(),
            default_zone,
        }
    }

    pub fn with_market(mut self, slug: impl Into<String>, tz: Tz) -> Self {
        self.markets.insert(slug.into(), tz);
        self
    }

    /// Unknown markets get the default zone.
    pub fn time_zone(&self, market: &str) -> Tz {
        self.markets
            .get(market)
            .copied()
            .unwrap_or(self.default_zone)
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.markets.keys().map(String::as_str)
    }
}

impl Default for MarketRegistry {
    fn default() -> Self {
        Self::new(Tz::America__New_York)
    }
}
