//! Static registry of the cities and counties the bot can answer for.
//!
//! The set is closed: 22 locations, each in exactly one of 5 regions, fixed at
//! compile time. Everything here is pure and safely shared between requests.

/// One of the five geographic regions the supported locations fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    North,
    Central,
    South,
    East,
    Islands,
}

impl Region {
    pub fn label(&self) -> &'static str {
        match self {
            Region::North => "北部",
            Region::Central => "中部",
            Region::South => "南部",
            Region::East => "東部",
            Region::Islands => "離島",
        }
    }

    /// All regions in display order.
    pub const fn all() -> &'static [Region] {
        &[Region::North, Region::Central, Region::South, Region::East, Region::Islands]
    }

    /// Member locations in declaration order.
    pub fn members(&self) -> &'static [&'static str] {
        match self {
            Region::North => &["臺北市", "新北市", "基隆市", "桃園市", "新竹市", "新竹縣"],
            Region::Central => &["臺中市", "苗栗縣", "彰化縣", "南投縣", "雲林縣"],
            Region::South => &["臺南市", "高雄市", "嘉義市", "嘉義縣", "屏東縣"],
            Region::East => &["宜蘭縣", "花蓮縣", "臺東縣"],
            Region::Islands => &["澎湖縣", "金門縣", "連江縣"],
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Number of supported locations across all regions.
pub const SUPPORTED_COUNT: usize = 22;

/// Normalize user input into the catalog's canonical naming.
///
/// Replaces every 台 with 臺, then, when the name lacks a 市/縣 suffix, tries
/// appending 市 first and 縣 second, keeping whichever completion is a
/// supported location. Inputs that match nothing come back substituted but
/// otherwise unchanged, so callers still need [`is_supported`].
pub fn normalize(input: &str) -> String {
    let normalized = input.replace('台', "臺");

    if !(normalized.ends_with('市') || normalized.ends_with('縣')) {
        let with_city = format!("{normalized}市");
        if is_supported(&with_city) {
            return with_city;
        }
        let with_county = format!("{normalized}縣");
        if is_supported(&with_county) {
            return with_county;
        }
    }

    normalized
}

/// Membership check against the fixed location set.
pub fn is_supported(name: &str) -> bool {
    Region::all().iter().any(|r| r.members().contains(&name))
}

/// Region a supported location belongs to, `None` for anything else.
pub fn region_of(name: &str) -> Option<Region> {
    Region::all().iter().copied().find(|r| r.members().contains(&name))
}

/// Render the full supported-city listing used by help and error replies.
///
/// One line per region, members joined with 、, regions in north-to-islands
/// order. The output is deterministic.
pub fn format_supported_list() -> String {
    let mut lines = vec![format!("📍 支援的縣市（共{SUPPORTED_COUNT}個）："), String::new()];

    for region in Region::all() {
        lines.push(format!("{}：{}", region.label(), region.members().join("、")));
    }

    lines.join("\n")
}
