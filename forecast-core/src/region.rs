//! Maps reverse-geocoded addresses to a display label and mid-range region id.

use serde::Serialize;

use crate::model::Address;

/// A named mid-range forecast region.
///
/// The numeric feed is keyed per city (`id`), the text outlook per province
/// (`land_id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub name: String,
    pub id: String,
    pub land_id: String,
}

impl Region {
    pub fn new(name: &str, id: &str, land_id: &str) -> Self {
        Self { name: name.to_string(), id: id.to_string(), land_id: land_id.to_string() }
    }
}

/// Used when no address component names a known region.
pub const DEFAULT_REGION_NAME: &str = "서울특별시";

/// Seoul, Incheon and Gyeonggi-do share one land outlook.
const CAPITAL_AREA_LAND_ID: &str = "11B00000";

const BUILTIN_REGIONS: [(&str, &str); 5] = [
    (DEFAULT_REGION_NAME, "11B10101"),
    ("수원시", "11B20601"),
    ("오산시", "11B20604"),
    ("군포시", "11B20606"),
    ("화성시", "11B20610"),
];

/// Ordered region table with a named default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTable {
    entries: Vec<Region>,
    default: Region,
}

impl Default for RegionTable {
    fn default() -> Self {
        let entries: Vec<Region> = BUILTIN_REGIONS
            .iter()
            .map(|(name, id)| Region::new(name, id, CAPITAL_AREA_LAND_ID))
            .collect();
        let default = Region::new(DEFAULT_REGION_NAME, BUILTIN_REGIONS[0].1, CAPITAL_AREA_LAND_ID);
        Self { entries, default }
    }
}

impl RegionTable {
    /// Built-in table extended with `extra` entries. Names already present keep
    /// their built-in id.
    pub fn with_extra(extra: impl IntoIterator<Item = Region>) -> Self {
        let mut table = Self::default();
        for region in extra {
            if table.get(&region.name).is_none() {
                table.entries.push(region);
            }
        }
        table
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.entries.iter().find(|r| r.name == name)
    }

    pub fn default_region(&self) -> &Region {
        &self.default
    }

    pub fn entries(&self) -> &[Region] {
        &self.entries
    }

    /// Check city, town, village, county in that order; the first component
    /// naming a known region wins, otherwise the default.
    pub fn resolve(&self, address: Option<&Address>) -> &Region {
        let Some(address) = address else {
            return &self.default;
        };

        [&address.city, &address.town, &address.village, &address.county]
            .into_iter()
            .flatten()
            .find_map(|component| self.get(component))
            .unwrap_or(&self.default)
    }
}
