//! Location parsing and country → continent/timezone resolution.
//!
//! Resolution is a strategy chosen once at startup (`select_resolver`):
//! the catalog-backed resolver looks countries up in the ISO 3166 registry and
//! falls back to the literal tables for anything it cannot name; the table-backed
//! resolver only knows the literal tables. Both answer `Other` for unknown input.

use std::fmt;
use std::str::FromStr;

use tracing::{info, warn};

use crate::features::taxonomy::Taxonomy;
use crate::models::features::LocationFeatures;
use crate::models::submission::Field;

pub const OTHER: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub continent: String,
    pub timezone_group: String,
}

impl Region {
    pub fn other() -> Self {
        Self {
            continent: OTHER.to_string(),
            timezone_group: OTHER.to_string(),
        }
    }
}

pub trait LocationResolver: Send + Sync {
    /// Never fails: unknown countries resolve to `Region::other()`.
    fn resolve(&self, country: &str) -> Region;

    /// Backend label for logs.
    fn backend(&self) -> &'static str;
}

/// Resolver backed by the two literal fallback tables of the taxonomy.
#[derive(Debug, Clone)]
pub struct TableResolver {
    continents: Vec<(String, String)>,
    timezones: Vec<(String, String)>,
}

impl TableResolver {
    pub fn new(taxonomy: &Taxonomy) -> Self {
        Self {
            continents: taxonomy.continent_fallback.clone(),
            timezones: taxonomy.timezone_fallback.clone(),
        }
    }

    fn lookup(table: &[(String, String)], country: &str) -> String {
        table
            .iter()
            .find(|(name, _)| name == country)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| OTHER.to_string())
    }
}

impl LocationResolver for TableResolver {
    fn resolve(&self, country: &str) -> Region {
        Region {
            continent: Self::lookup(&self.continents, country),
            timezone_group: Self::lookup(&self.timezones, country),
        }
    }

    fn backend(&self) -> &'static str {
        "table"
    }
}

#[cfg(feature = "geo-catalog")]
pub use catalog::CatalogResolver;

#[cfg(feature = "geo-catalog")]
mod catalog {
    use keshvar::{Continent, Country, CountryIterator};

    use super::{LocationResolver, Region, TableResolver, OTHER};

    /// Matches the ISO short name or any of the registry's unofficial names.
    fn find_country(name: &str) -> Option<Country> {
        CountryIterator::new().find(|c| {
            c.iso_short_name().eq_ignore_ascii_case(name)
                || c.unofficial_name_list()
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(name))
        })
    }

    fn continent_name(continent: Continent) -> &'static str {
        match continent {
            Continent::NorthAmerica => "North America",
            Continent::SouthAmerica => "South America",
            Continent::Asia => "Asia",
            Continent::Australia => "Oceania",
            Continent::Europe => "Europe",
            Continent::Africa => "Africa",
            #[allow(unreachable_patterns)]
            _ => OTHER,
        }
    }

    fn timezone_group(continent: &str) -> &'static str {
        match continent {
            "North America" | "South America" => "Americas",
            "Europe" | "Africa" => "Europe/Africa",
            "Asia" => "Asia",
            "Oceania" => "Asia-Pacific",
            _ => OTHER,
        }
    }

    /// Country name → ISO 3166 registry entry → continent → timezone group.
    /// Names the registry does not know go to the literal tables.
    pub struct CatalogResolver {
        fallback: TableResolver,
    }

    impl CatalogResolver {
        pub fn new(fallback: TableResolver) -> Self {
            Self { fallback }
        }
    }

    impl LocationResolver for CatalogResolver {
        fn resolve(&self, country: &str) -> Region {
            match find_country(country) {
                Some(entry) => {
                    let continent = continent_name(entry.continent());
                    Region {
                        continent: continent.to_string(),
                        timezone_group: timezone_group(continent).to_string(),
                    }
                }
                None => self.fallback.resolve(country),
            }
        }

        fn backend(&self) -> &'static str {
            "catalog"
        }
    }
}

/// Which resolver to build at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolverChoice {
    /// Catalog when compiled in, otherwise tables.
    #[default]
    Auto,
    Catalog,
    Table,
}

impl FromStr for ResolverChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ResolverChoice::Auto),
            "catalog" => Ok(ResolverChoice::Catalog),
            "table" => Ok(ResolverChoice::Table),
            other => Err(format!(
                "unknown resolver '{other}' (expected auto, catalog or table)"
            )),
        }
    }
}

impl fmt::Display for ResolverChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResolverChoice::Auto => "auto",
            ResolverChoice::Catalog => "catalog",
            ResolverChoice::Table => "table",
        };
        f.write_str(label)
    }
}

pub fn catalog_available() -> bool {
    cfg!(feature = "geo-catalog")
}

/// Builds the resolver once. Asking for the catalog when it was not compiled in
/// degrades to the tables.
pub fn select_resolver(choice: ResolverChoice, taxonomy: &Taxonomy) -> Box<dyn LocationResolver> {
    if choice == ResolverChoice::Catalog && !catalog_available() {
        warn!("Catalog resolver requested but not compiled in; using tables");
    }
    let tables = TableResolver::new(taxonomy);
    let resolver: Box<dyn LocationResolver> = match choice {
        ResolverChoice::Table => Box::new(tables),
        ResolverChoice::Auto | ResolverChoice::Catalog => build_catalog(tables),
    };
    info!(
        "Location resolver: {} (requested {choice})",
        resolver.backend()
    );
    resolver
}

#[cfg(feature = "geo-catalog")]
fn build_catalog(tables: TableResolver) -> Box<dyn LocationResolver> {
    Box::new(CatalogResolver::new(tables))
}

#[cfg(not(feature = "geo-catalog"))]
fn build_catalog(tables: TableResolver) -> Box<dyn LocationResolver> {
    Box::new(tables)
}

/// Splits `"City, Country"`: the last segment is the country, the first the city.
/// A single segment is used for both.
pub fn split_location(location: &str) -> (String, String) {
    let parts: Vec<&str> = location.split(',').collect();
    let country = parts
        .last()
        .map(|p| p.trim())
        .unwrap_or(location)
        .to_string();
    let city = if parts.len() > 1 {
        parts[0].trim().to_string()
    } else {
        location.to_string()
    };
    (country, city)
}

pub fn is_tech_hub(location: &str, taxonomy: &Taxonomy) -> bool {
    let location = location.to_lowercase();
    taxonomy
        .tech_hubs
        .iter()
        .any(|hub| location.contains(&hub.to_lowercase()))
}

pub fn extract_location(
    location: &Field<String>,
    taxonomy: &Taxonomy,
    resolver: &dyn LocationResolver,
) -> LocationFeatures {
    let location = match location {
        Field::Present(l) => l,
        Field::Malformed | Field::Absent => return LocationFeatures::unknown(),
    };

    let (country, city) = split_location(location);
    let region = resolver.resolve(&country);

    LocationFeatures {
        country,
        city,
        continent: region.continent,
        timezone_group: region.timezone_group,
        is_major_tech_hub: is_tech_hub(location, taxonomy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present(s: &str) -> Field<String> {
        Field::Present(s.to_string())
    }

    #[test]
    fn test_split_city_and_country() {
        assert_eq!(
            split_location("Berlin, Germany"),
            ("Germany".to_string(), "Berlin".to_string())
        );
        assert_eq!(
            split_location("Austin, Texas, United States"),
            ("United States".to_string(), "Austin".to_string())
        );
        assert_eq!(
            split_location("Brazil"),
            ("Brazil".to_string(), "Brazil".to_string())
        );
    }

    #[test]
    fn test_table_resolver_known_and_unknown() {
        let t = Taxonomy::default();
        let resolver = TableResolver::new(&t);
        let region = resolver.resolve("Australia");
        assert_eq!(region.continent, "Oceania");
        assert_eq!(region.timezone_group, "Asia-Pacific");
        // Listed for continent but not for timezone.
        let region = resolver.resolve("Mexico");
        assert_eq!(region.continent, "North America");
        assert_eq!(region.timezone_group, "Other");
        assert_eq!(resolver.resolve("Atlantis"), Region::other());
    }

    #[cfg(feature = "geo-catalog")]
    #[test]
    fn test_catalog_resolver_uses_continent_groups() {
        let t = Taxonomy::default();
        let resolver = CatalogResolver::new(TableResolver::new(&t));
        let region = resolver.resolve("Germany");
        assert_eq!(region.continent, "Europe");
        assert_eq!(region.timezone_group, "Europe/Africa");
        let region = resolver.resolve("nigeria");
        assert_eq!(region.continent, "Africa");
        let region = resolver.resolve("New Zealand");
        assert_eq!(region.continent, "Oceania");
        assert_eq!(region.timezone_group, "Asia-Pacific");
        // Not in the literal tables; only the registry knows it.
        assert_eq!(resolver.resolve("Kenya").continent, "Africa");
        assert_eq!(resolver.resolve("Atlantis"), Region::other());
    }

    #[test]
    fn test_table_choice_is_honoured() {
        let t = Taxonomy::default();
        let resolver = select_resolver(ResolverChoice::Table, &t);
        assert_eq!(resolver.backend(), "table");
    }

    #[test]
    fn test_resolver_choice_parsing() {
        assert_eq!("Catalog".parse::<ResolverChoice>(), Ok(ResolverChoice::Catalog));
        assert!("pycountry".parse::<ResolverChoice>().is_err());
    }

    #[test]
    fn test_extract_location_with_tech_hub() {
        let t = Taxonomy::default();
        let resolver = TableResolver::new(&t);
        let features = extract_location(&present("san francisco, United States"), &t, &resolver);
        assert_eq!(features.country, "United States");
        assert_eq!(features.city, "san francisco");
        assert_eq!(features.continent, "North America");
        assert_eq!(features.timezone_group, "Americas");
        assert!(features.is_major_tech_hub);
    }

    #[test]
    fn test_extract_location_absent_is_unknown() {
        let t = Taxonomy::default();
        let resolver = TableResolver::new(&t);
        let features = extract_location(&Field::Absent, &t, &resolver);
        assert_eq!(features, LocationFeatures::unknown());
    }
}
