//! Fixed pools for fabricated names and places.

use crate::random::FabricRng;

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Priya", "Arjun", "Ananya", "Rahul", "Mei", "Wei", "Lukas", "Hannah", "Sofia", "Mateo",
    "Yuki", "Kenji", "Olivia", "Noah", "Amara", "Kwame", "Fatima", "Omar",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Wilson", "Anderson", "Taylor", "Thomas", "Moore", "Jackson", "Sharma", "Patel",
    "Iyer", "Chen", "Wang", "Muller", "Schmidt", "Rossi", "Tanaka", "Sato", "Okafor", "Mensah",
    "Haddad", "Novak",
];

const COMPANY_STEMS: &[&str] = &[
    "Apex", "Summit", "Vertex", "Northwind", "Bluewater", "Ironwood", "Silverline", "Redstone",
    "Evergreen", "Brightpath", "Keystone", "Pinnacle", "Harbor", "Cobalt", "Meridian", "Granite",
    "Horizon", "Sterling", "Atlas", "Crescent",
];

const COMPANY_KINDS: &[&str] = &[
    "Industries", "Trading", "Supplies", "Systems", "Logistics", "Holdings", "Partners",
    "Manufacturing", "Retail", "Solutions",
];

const COMPANY_SUFFIXES: &[&str] = &["Inc", "LLC", "Ltd", "GmbH", "Corp", "plc"];

const PRODUCT_WORDS: &[&str] = &[
    "Bracket", "Valve", "Sensor", "Panel", "Housing", "Gear", "Cable", "Module", "Filter",
    "Bearing", "Switch", "Frame", "Pump", "Motor", "Lens", "Board", "Seal", "Shaft", "Coupling",
    "Nozzle",
];

const PRODUCT_QUALIFIERS: &[&str] = &[
    "Compact", "Heavy", "Precision", "Standard", "Modular", "Smart", "Industrial", "Micro",
    "Thermal", "Rapid",
];

/// City with its country and sales region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Place {
    /// City.
    pub city: &'static str,
    /// ISO country code.
    pub country: &'static str,
    /// Sales region.
    pub region: &'static str,
}

const fn place(city: &'static str, country: &'static str, region: &'static str) -> Place {
    Place {
        city,
        country,
        region,
    }
}

/// Known places.
pub const PLACES: &[Place] = &[
    place("New York", "US", "North America"),
    place("Chicago", "US", "North America"),
    place("Houston", "US", "North America"),
    place("Toronto", "CA", "North America"),
    place("Mexico City", "MX", "Latin America"),
    place("Sao Paulo", "BR", "Latin America"),
    place("London", "GB", "Europe"),
    place("Manchester", "GB", "Europe"),
    place("Berlin", "DE", "Europe"),
    place("Munich", "DE", "Europe"),
    place("Paris", "FR", "Europe"),
    place("Madrid", "ES", "Europe"),
    place("Pune", "IN", "South Asia"),
    place("Chennai", "IN", "South Asia"),
    place("Bengaluru", "IN", "South Asia"),
    place("Shanghai", "CN", "East Asia"),
    place("Shenzhen", "CN", "East Asia"),
    place("Tokyo", "JP", "East Asia"),
    place("Osaka", "JP", "East Asia"),
    place("Sydney", "AU", "Oceania"),
];

fn from_pool(rng: &mut FabricRng, pool: &[&'static str]) -> &'static str {
    rng.choose(pool).unwrap_or_default()
}

/// Person name, "First Last".
pub fn person_name(rng: &mut FabricRng) -> String {
    format!(
        "{} {}",
        from_pool(rng, FIRST_NAMES),
        from_pool(rng, LAST_NAMES)
    )
}

/// Company name, "Stem Kind Suffix".
pub fn company_name(rng: &mut FabricRng) -> String {
    format!(
        "{} {} {}",
        from_pool(rng, COMPANY_STEMS),
        from_pool(rng, COMPANY_KINDS),
        from_pool(rng, COMPANY_SUFFIXES)
    )
}

/// Product description, "Qualifier Word".
pub fn product_name(rng: &mut FabricRng) -> String {
    format!(
        "{} {}",
        from_pool(rng, PRODUCT_QUALIFIERS),
        from_pool(rng, PRODUCT_WORDS)
    )
}

/// Random place.
pub fn place_of(rng: &mut FabricRng) -> Place {
    rng.choose(PLACES).unwrap_or(PLACES[0])
}

/// Upper-case letters of length `len`.
pub fn letters(rng: &mut FabricRng, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'A' + rng.range(0u8..=25)))
        .collect()
}
