//! Endpoint Parameter Types
//!
//! Enumerations for the path parameters the API accepts, so callers cannot
//! request a range or list the server would reject.

// =============================================================================
// Chart Range
// =============================================================================

/// Time span accepted by the chart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartRange {
    /// Five years of daily data.
    FiveYears,
    /// Two years of daily data.
    TwoYears,
    /// One year of daily data.
    OneYear,
    /// Year to date.
    YearToDate,
    /// Six months.
    SixMonths,
    /// Three months.
    ThreeMonths,
    /// One month.
    OneMonth,
    /// One day of intraday data.
    OneDay,
    /// Server picks intraday or daily based on market hours.
    Dynamic,
}

impl ChartRange {
    /// Path segment for this range.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FiveYears => "5y",
            Self::TwoYears => "2y",
            Self::OneYear => "1y",
            Self::YearToDate => "ytd",
            Self::SixMonths => "6m",
            Self::ThreeMonths => "3m",
            Self::OneMonth => "1m",
            Self::OneDay => "1d",
            Self::Dynamic => "dynamic",
        }
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// Time span accepted by the dividends and splits endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateRange {
    /// Five years.
    FiveYears,
    /// Two years.
    TwoYears,
    /// One year.
    OneYear,
    /// Year to date.
    YearToDate,
    /// Six months.
    SixMonths,
    /// Three months.
    ThreeMonths,
    /// One month.
    OneMonth,
}

impl DateRange {
    /// Path segment for this range.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FiveYears => "5y",
            Self::TwoYears => "2y",
            Self::OneYear => "1y",
            Self::YearToDate => "ytd",
            Self::SixMonths => "6m",
            Self::ThreeMonths => "3m",
            Self::OneMonth => "1m",
        }
    }
}

// =============================================================================
// Market List
// =============================================================================

/// Market list groupings for the top-ten endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketList {
    /// Most active by volume.
    MostActive,
    /// Largest percentage gainers.
    Gainers,
    /// Largest percentage losers.
    Losers,
    /// Highest exchange volume.
    IexVolume,
    /// Highest exchange volume share.
    IexPercent,
}

impl MarketList {
    /// Path segment for this list.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MostActive => "mostactive",
            Self::Gainers => "gainers",
            Self::Losers => "losers",
            Self::IexVolume => "iexvolume",
            Self::IexPercent => "iexpercent",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_range_path_segments() {
        assert_eq!(ChartRange::FiveYears.as_str(), "5y");
        assert_eq!(ChartRange::YearToDate.as_str(), "ytd");
        assert_eq!(ChartRange::OneDay.as_str(), "1d");
        assert_eq!(ChartRange::Dynamic.as_str(), "dynamic");
    }

    #[test]
    fn date_range_path_segments() {
        assert_eq!(DateRange::TwoYears.as_str(), "2y");
        assert_eq!(DateRange::OneMonth.as_str(), "1m");
    }

    #[test]
    fn market_list_path_segments() {
        assert_eq!(MarketList::MostActive.as_str(), "mostactive");
        assert_eq!(MarketList::IexPercent.as_str(), "iexpercent");
    }
}
