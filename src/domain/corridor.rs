//! Trade corridor classification and per-corridor risk intelligence.
//!
//! Ports are assigned to regions by the country portion of their name, then an
//! ordered rule list picks the corridor. The first matching rule wins.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::entities::{country_of, Port};
use super::geodesic::{display_km, distance_km};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    EastAsia,
    SoutheastAsia,
    SouthAsia,
    MiddleEast,
    NorthAmerica,
    Europe,
    SouthAmerica,
}

const EAST_ASIA: &[&str] = &["China", "Japan", "Korea", "Taiwan", "Hong Kong"];
const SOUTHEAST_ASIA: &[&str] = &[
    "Singapore",
    "Malaysia",
    "Vietnam",
    "Thailand",
    "Indonesia",
    "Philippines",
    "Cambodia",
    "Myanmar",
];
const SOUTH_ASIA: &[&str] = &["India", "Sri Lanka", "Pakistan", "Bangladesh"];
const MIDDLE_EAST: &[&str] = &[
    "UAE",
    "Saudi Arabia",
    "Oman",
    "Qatar",
    "Kuwait",
    "Bahrain",
    "Iran",
    "Iraq",
    "Israel",
    "Jordan",
];
const NORTH_AMERICA: &[&str] = &["USA", "Canada", "Mexico"];
const EUROPE: &[&str] = &[
    "Netherlands",
    "Germany",
    "Belgium",
    "UK",
    "United Kingdom",
    "France",
    "Spain",
    "Italy",
    "Greece",
    "Portugal",
    "Poland",
    "Denmark",
    "Sweden",
    "Norway",
    "Finland",
    "Ireland",
    "Malta",
];
const SOUTH_AMERICA: &[&str] = &["Chile", "Peru", "Colombia", "Ecuador", "Argentina", "Uruguay"];

impl Region {
    pub fn members(&self) -> &'static [&'static str] {
        match self {
            Self::EastAsia => EAST_ASIA,
            Self::SoutheastAsia => SOUTHEAST_ASIA,
            Self::SouthAsia => SOUTH_ASIA,
            Self::MiddleEast => MIDDLE_EAST,
            Self::NorthAmerica => NORTH_AMERICA,
            Self::Europe => EUROPE,
            Self::SouthAmerica => SOUTH_AMERICA,
        }
    }

    /// Case-sensitive substring match against the country portion of a port name.
    pub fn contains(&self, port_name: &str) -> bool {
        let country = country_of(port_name);
        self.members().iter().any(|member| country.contains(member))
    }
}

/// Union used by the Asia-to-X rules only.
const ASIA: [Region; 3] = [Region::EastAsia, Region::SoutheastAsia, Region::SouthAsia];

fn in_asia(port_name: &str) -> bool {
    ASIA.iter().any(|region| region.contains(port_name))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corridor {
    #[serde(rename = "Far-East")]
    FarEast,
    #[serde(rename = "Intra-EastAsia")]
    IntraEastAsia,
    #[serde(rename = "EastAsia-SEAsia")]
    EastAsiaSeAsia,
    #[serde(rename = "Asia-ME")]
    AsiaMiddleEast,
    #[serde(rename = "Asia-NA")]
    AsiaNorthAmerica,
    #[serde(rename = "Asia-EU")]
    AsiaEurope,
    #[serde(rename = "Asia-SA")]
    AsiaSouthAmerica,
    #[serde(rename = "EU-NA")]
    EuropeNorthAmerica,
    #[serde(rename = "EU-ME")]
    EuropeMiddleEast,
    #[serde(rename = "NA-SA")]
    NorthSouthAmerica,
    #[serde(rename = "Trans-American")]
    TransAmerican,
    Custom,
}

impl Corridor {
    pub fn code(&self) -> &'static str {
        match self {
            Self::FarEast => "Far-East",
            Self::IntraEastAsia => "Intra-EastAsia",
            Self::EastAsiaSeAsia => "EastAsia-SEAsia",
            Self::AsiaMiddleEast => "Asia-ME",
            Self::AsiaNorthAmerica => "Asia-NA",
            Self::AsiaEurope => "Asia-EU",
            Self::AsiaSouthAmerica => "Asia-SA",
            Self::EuropeNorthAmerica => "EU-NA",
            Self::EuropeMiddleEast => "EU-ME",
            Self::NorthSouthAmerica => "NA-SA",
            Self::TransAmerican => "Trans-American",
            Self::Custom => "Custom",
        }
    }

    pub fn intel(&self) -> &'static CorridorIntel {
        match self {
            Self::FarEast => &FAR_EAST_INTEL,
            Self::IntraEastAsia => &INTRA_EAST_ASIA_INTEL,
            Self::EastAsiaSeAsia => &EAST_ASIA_SE_ASIA_INTEL,
            Self::AsiaMiddleEast => &ASIA_ME_INTEL,
            Self::AsiaNorthAmerica => &ASIA_NA_INTEL,
            Self::AsiaEurope => &ASIA_EU_INTEL,
            Self::AsiaSouthAmerica => &ASIA_SA_INTEL,
            Self::EuropeNorthAmerica => &EU_NA_INTEL,
            Self::EuropeMiddleEast => &EU_ME_INTEL,
            Self::NorthSouthAmerica => &NA_SA_INTEL,
            Self::TransAmerican => &TRANS_AMERICAN_INTEL,
            Self::Custom => &CUSTOM_INTEL,
        }
    }
}

impl fmt::Display for Corridor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

type Rule = (fn(&str, &str) -> bool, Corridor);

fn either_way(origin: &str, destination: &str, a: fn(&str) -> bool, b: fn(&str) -> bool) -> bool {
    (a(origin) && b(destination)) || (b(origin) && a(destination))
}

fn east_asia(name: &str) -> bool {
    Region::EastAsia.contains(name)
}

fn southeast_asia(name: &str) -> bool {
    Region::SoutheastAsia.contains(name)
}

fn middle_east(name: &str) -> bool {
    Region::MiddleEast.contains(name)
}

fn north_america(name: &str) -> bool {
    Region::NorthAmerica.contains(name)
}

fn europe(name: &str) -> bool {
    Region::Europe.contains(name)
}

fn south_america(name: &str) -> bool {
    Region::SouthAmerica.contains(name)
}

fn intra_east_asia(o: &str, d: &str) -> bool {
    east_asia(o) && east_asia(d) && o != d
}

fn east_asia_se_asia(o: &str, d: &str) -> bool {
    either_way(o, d, east_asia, southeast_asia)
}

fn trans_american(o: &str, d: &str) -> bool {
    north_america(o) && north_america(d) && o != d
}

fn asia_middle_east(o: &str, d: &str) -> bool {
    either_way(o, d, in_asia, middle_east)
}

fn asia_north_america(o: &str, d: &str) -> bool {
    either_way(o, d, in_asia, north_america)
}

fn asia_europe(o: &str, d: &str) -> bool {
    either_way(o, d, in_asia, europe)
}

fn asia_south_america(o: &str, d: &str) -> bool {
    either_way(o, d, in_asia, south_america)
}

fn europe_north_america(o: &str, d: &str) -> bool {
    either_way(o, d, europe, north_america)
}

fn europe_middle_east(o: &str, d: &str) -> bool {
    either_way(o, d, europe, middle_east)
}

fn north_south_america(o: &str, d: &str) -> bool {
    either_way(o, d, north_america, south_america)
}

/// Evaluated top to bottom; order is part of the contract.
const RULES: [Rule; 10] = [
    (intra_east_asia, Corridor::IntraEastAsia),
    (east_asia_se_asia, Corridor::EastAsiaSeAsia),
    (trans_american, Corridor::TransAmerican),
    (asia_middle_east, Corridor::AsiaMiddleEast),
    (asia_north_america, Corridor::AsiaNorthAmerica),
    (asia_europe, Corridor::AsiaEurope),
    (asia_south_america, Corridor::AsiaSouthAmerica),
    (europe_north_america, Corridor::EuropeNorthAmerica),
    (europe_middle_east, Corridor::EuropeMiddleEast),
    (north_south_america, Corridor::NorthSouthAmerica),
];

/// Classify an origin/destination pair by port name.
pub fn classify(origin: &str, destination: &str) -> Corridor {
    RULES
        .iter()
        .find(|(matches, _)| matches(origin, destination))
        .map(|(_, corridor)| *corridor)
        .unwrap_or(Corridor::Custom)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Waypoint {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CorridorIntel {
    pub chokepoints: &'static [Waypoint],
    pub hotspots: &'static [Waypoint],
    pub trivia: &'static str,
}

const fn wp(name: &'static str, description: &'static str) -> Waypoint {
    Waypoint { name, description }
}

const MALACCA: Waypoint = wp(
    "Strait of Malacca",
    "Busiest shipping lane in Asia; congestion and piracy alerts near the Singapore Strait.",
);
const TAIWAN_STRAIT: Waypoint = wp(
    "Taiwan Strait",
    "Heavily trafficked passage between mainland China and Taiwan subject to military exercises.",
);
const SOUTH_CHINA_SEA: Waypoint = wp(
    "South China Sea",
    "Overlapping territorial claims and typhoon exposure from June to November.",
);
const HORMUZ: Waypoint = wp(
    "Strait of Hormuz",
    "Roughly a fifth of global oil transits here; tanker seizures have raised war-risk premiums.",
);
const BAB_EL_MANDEB: Waypoint = wp(
    "Bab-el-Mandeb",
    "Red Sea gateway where attacks on merchant shipping have forced Cape of Good Hope diversions.",
);
const SUEZ: Waypoint = wp(
    "Suez Canal",
    "Shortest Asia-Europe link; a single grounding can halt traffic for days.",
);
const PANAMA: Waypoint = wp(
    "Panama Canal",
    "Draft and transit limits tighten during drought years on Gatun Lake.",
);
const GIBRALTAR: Waypoint = wp(
    "Strait of Gibraltar",
    "Entry to the Mediterranean with dense crossing ferry traffic.",
);
const ENGLISH_CHANNEL: Waypoint = wp(
    "English Channel",
    "One of the busiest waterways in the world with a mandatory traffic separation scheme.",
);
const KOREA_STRAIT: Waypoint = wp(
    "Korea Strait",
    "Links the East China Sea and the Sea of Japan between Busan and Kyushu.",
);
const CAPE_HORN: Waypoint = wp(
    "Drake Passage",
    "Fallback route around South America when canal transits are restricted; rough seas year-round.",
);

const FAR_EAST_INTEL: CorridorIntel = CorridorIntel {
    chokepoints: &[MALACCA, TAIWAN_STRAIT],
    hotspots: &[
        wp("Shanghai Anchorage", "Frequent queueing outside Yangshan during peak season."),
        wp("Typhoon Belt", "Tropical cyclones disrupt schedules from July to October."),
    ],
    trivia: "The Far East trade handles more container volume than any other region on earth.",
};

const INTRA_EAST_ASIA_INTEL: CorridorIntel = CorridorIntel {
    chokepoints: &[TAIWAN_STRAIT, KOREA_STRAIT],
    hotspots: &[
        wp("East China Sea", "Dense fishing fleets and frequent fog near the Yangtze estuary."),
        wp("Yellow Sea", "Shallow waters and seasonal ice in the northern Bohai approaches."),
    ],
    trivia: "Feeder services between Chinese, Korean and Japanese ports often turn around in under a week.",
};

const EAST_ASIA_SE_ASIA_INTEL: CorridorIntel = CorridorIntel {
    chokepoints: &[MALACCA, SOUTH_CHINA_SEA],
    hotspots: &[
        wp("Singapore Strait", "Armed robbery reports against slow-moving vessels at night."),
        wp("Luzon Strait", "Typhoon track between Taiwan and the Philippines."),
    ],
    trivia: "Singapore is the world's largest transshipment hub, linking over 600 ports.",
};

const ASIA_ME_INTEL: CorridorIntel = CorridorIntel {
    chokepoints: &[MALACCA, HORMUZ],
    hotspots: &[
        wp("Arabian Sea", "Southwest monsoon brings heavy swell from June to September."),
        wp("Gulf of Oman", "Heightened tanker security incidents."),
    ],
    trivia: "Jebel Ali is the largest man-made harbour in the world.",
};

const ASIA_NA_INTEL: CorridorIntel = CorridorIntel {
    chokepoints: &[TAIWAN_STRAIT, PANAMA],
    hotspots: &[
        wp(
            "North Pacific Great Circle",
            "Winter storms near the Aleutians force southern routings.",
        ),
        wp("San Pedro Bay", "Berth congestion at Los Angeles and Long Beach during import peaks."),
    ],
    trivia: "The transpacific is the world's largest east-west trade lane by container volume.",
};

const ASIA_EU_INTEL: CorridorIntel = CorridorIntel {
    chokepoints: &[MALACCA, BAB_EL_MANDEB, SUEZ],
    hotspots: &[
        wp("Gulf of Aden", "Piracy and missile threats against merchant shipping."),
        wp("Cape of Good Hope", "Diversion route adding 10 to 14 days of sailing."),
    ],
    trivia: "The Suez Canal saves roughly 7,000 km compared with sailing around Africa.",
};

const ASIA_SA_INTEL: CorridorIntel = CorridorIntel {
    chokepoints: &[MALACCA, CAPE_HORN],
    hotspots: &[
        wp("South Pacific Crossing", "Few diversion ports and long stretches without support."),
        wp("Callao Approaches", "Fog and swell on the Peruvian coast."),
    ],
    trivia: "Chilean copper and fruit make up much of the Asia-bound cargo on this lane.",
};

const EU_NA_INTEL: CorridorIntel = CorridorIntel {
    chokepoints: &[ENGLISH_CHANNEL, GIBRALTAR],
    hotspots: &[
        wp("North Atlantic", "Winter gales and iceberg reports on the northern great circle."),
        wp("Grand Banks", "Dense fog where the Labrador Current meets the Gulf Stream."),
    ],
    trivia: "The transatlantic is the oldest scheduled liner trade in the world.",
};

const EU_ME_INTEL: CorridorIntel = CorridorIntel {
    chokepoints: &[SUEZ, BAB_EL_MANDEB, HORMUZ],
    hotspots: &[
        wp("Red Sea", "Security incidents have pushed insurers to apply war-risk surcharges."),
        wp("Eastern Mediterranean", "Regional tensions affect port calls and routing."),
    ],
    trivia: "Most European-bound Gulf cargo passes three chokepoints in a single voyage.",
};

const NA_SA_INTEL: CorridorIntel = CorridorIntel {
    chokepoints: &[PANAMA],
    hotspots: &[
        wp("Caribbean Basin", "Hurricane season runs from June through November."),
        wp("Gulf of Mexico", "Offshore platforms and loop current eddies."),
    ],
    trivia: "The Panama Canal lifts ships 26 metres above sea level through its locks.",
};

const TRANS_AMERICAN_INTEL: CorridorIntel = CorridorIntel {
    chokepoints: &[PANAMA],
    hotspots: &[
        wp("Pacific Coast", "Coastal fog and strong northwesterlies off California."),
        wp("Florida Strait", "Strong Gulf Stream currents and heavy cruise traffic."),
    ],
    trivia: "Coastwise US trade between US ports must use US-built, US-crewed vessels under the Jones Act.",
};

const CUSTOM_INTEL: CorridorIntel = CorridorIntel {
    chokepoints: &[wp(
        "Regional Straits",
        "Check local notices to mariners for narrow passages on this route.",
    )],
    hotspots: &[wp(
        "Coastal Approaches",
        "Port approaches carry the highest traffic density on most routes.",
    )],
    trivia: "Over 80% of global trade by volume is carried by sea.",
};

/// Neutral record used when a port could not be resolved.
pub const UNAVAILABLE_INTEL: CorridorIntel = CorridorIntel {
    chokepoints: &[],
    hotspots: &[],
    trivia: "Route intelligence is unavailable because one of the ports is not in the directory.",
};

/// Restricted items and required documents of one route endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PortNotes {
    pub name: String,
    pub known: bool,
    pub restricted_items: Vec<String>,
    pub documents: Vec<String>,
}

impl PortNotes {
    fn new(name: &str, port: Option<&Port>) -> Self {
        match port {
            Some(port) => Self {
                name: port.name.clone(),
                known: true,
                restricted_items: port.restricted_items.clone(),
                documents: port.documents.clone(),
            },
            None => Self {
                name: name.to_string(),
                ..Self::default()
            },
        }
    }
}

/// Everything the route intelligence panel shows for a pair of ports.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteIntel {
    pub corridor: Corridor,
    pub intel: CorridorIntel,
    /// Raw great-circle distance used for cost and CO₂ math.
    pub distance_km: f64,
    pub display_distance_km: u64,
    /// False when either port is unknown; `distance_km` is then 0 and not a real distance.
    pub coordinates_available: bool,
    pub origin: PortNotes,
    pub destination: PortNotes,
}

/// Build route intelligence from the directory lookups of both endpoints.
pub fn analyze_route(
    origin_name: &str,
    origin: Option<&Port>,
    destination_name: &str,
    destination: Option<&Port>,
) -> RouteIntel {
    let origin_notes = PortNotes::new(origin_name, origin);
    let destination_notes = PortNotes::new(destination_name, destination);

    match (origin, destination) {
        (Some(from), Some(to)) => {
            let corridor = classify(&from.name, &to.name);
            let distance = distance_km(from.coordinates(), to.coordinates());
            RouteIntel {
                corridor,
                intel: *corridor.intel(),
                distance_km: distance,
                display_distance_km: display_km(distance),
                coordinates_available: true,
                origin: origin_notes,
                destination: destination_notes,
            }
        }
        _ => {
            tracing::warn!(
                origin = origin_name,
                destination = destination_name,
                "port lookup failed; route intelligence degraded"
            );
            RouteIntel {
                corridor: Corridor::Custom,
                intel: UNAVAILABLE_INTEL,
                distance_km: 0.0,
                display_distance_km: 0,
                coordinates_available: false,
                origin: origin_notes,
                destination: destination_notes,
            }
        }
    }
}
