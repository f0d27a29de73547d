//! Source table
//!
//! The known sources are a closed set. Lookup is by exact name; anything
//! else resolves to the default source.

use std::time::Duration;

/// A known telemetry source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Oscillation with noise and rare chaos injection
    Synthetic,
    /// Slow drift placeholder
    Weather,
    /// Random walk with occasional spikes
    Stocks,
}

/// Name, nominal interval in seconds
static SOURCE_TABLE: [(SourceKind, &str, f64); 3] = [
    (SourceKind::Synthetic, "synthetic", 0.1),
    (SourceKind::Weather, "weather", 0.5),
    (SourceKind::Stocks, "stocks", 0.2),
];

impl SourceKind {
    /// All known sources, in advertised order
    pub const ALL: [SourceKind; 3] = [SourceKind::Synthetic, SourceKind::Weather, SourceKind::Stocks];

    /// Source selected when nothing (or something unknown) is requested
    pub const DEFAULT: SourceKind = SourceKind::Synthetic;

    /// Look up a source by exact name
    pub fn from_name(name: &str) -> Option<Self> {
        SOURCE_TABLE
            .iter()
            .find(|(_, n, _)| *n == name)
            .map(|(kind, _, _)| *kind)
    }

    /// Look up a source by name, falling back to `default` for unknown names
    pub fn resolve(name: &str, default: SourceKind) -> Self {
        Self::from_name(name).unwrap_or(default)
    }

    /// Wire name of this source
    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// Nominal sampling interval in seconds
    pub fn dt(self) -> f64 {
        self.entry().2
    }

    /// Nominal sampling interval
    pub fn interval(self) -> Duration {
        Duration::from_secs_f64(self.dt())
    }

    /// Names of all known sources
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|k| k.name().to_string()).collect()
    }

    fn entry(self) -> &'static (SourceKind, &'static str, f64) {
        match self {
            SourceKind::Synthetic => &SOURCE_TABLE[0],
            SourceKind::Weather => &SOURCE_TABLE[1],
            SourceKind::Stocks => &SOURCE_TABLE[2],
        }
    }
}

impl Default for SourceKind {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_consistent() {
        for kind in SourceKind::ALL {
            assert_eq!(SourceKind::from_name(kind.name()), Some(kind));
            assert!(kind.dt() > 0.0);
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(SourceKind::from_name("weather"), Some(SourceKind::Weather));
        assert_eq!(SourceKind::from_name("Weather"), None);
        assert_eq!(SourceKind::from_name(" weather"), None);
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        assert_eq!(
            SourceKind::resolve("tides", SourceKind::DEFAULT),
            SourceKind::Synthetic
        );
        assert_eq!(
            SourceKind::resolve("tides", SourceKind::Stocks),
            SourceKind::Stocks
        );
        assert_eq!(
            SourceKind::resolve("stocks", SourceKind::Weather),
            SourceKind::Stocks
        );
    }

    #[test]
    fn test_names_and_intervals() {
        assert_eq!(SourceKind::names(), vec!["synthetic", "weather", "stocks"]);
        assert_eq!(SourceKind::Synthetic.interval(), Duration::from_millis(100));
        assert_eq!(SourceKind::Weather.interval(), Duration::from_millis(500));
        assert_eq!(SourceKind::Stocks.to_string(), "stocks");
    }
}
