//! Named airport traffic profiles.
//!
//! Each profile fixes the share of international traffic observed at a real
//! airport. The share drives the generator's class draw.

use std::fmt;
use std::str::FromStr;

/// A real-world airport whose traffic mix the simulation can reproduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AirportProfile {
    /// ~35.08M international / 62.5M total
    JohnFKennedy,
    /// ~74.96M international / 79.2M total
    LondonHeathrow,
    /// Domestic traffic negligible
    DubaiInternational,
    /// ~15.7M international / 104.7M total
    HartsfieldJacksonAtlanta,
    /// 1.3M international / 3.7M total
    #[default]
    SaoPauloGuarulhos,
}

impl AirportProfile {
    /// Every profile, in table order.
    pub const ALL: [AirportProfile; 5] = [
        Self::JohnFKennedy,
        Self::LondonHeathrow,
        Self::DubaiInternational,
        Self::HartsfieldJacksonAtlanta,
        Self::SaoPauloGuarulhos,
    ];

    /// IATA code, used as the profile's key in config files and on the command line.
    pub fn code(&self) -> &'static str {
        match self {
            Self::JohnFKennedy => "jfk",
            Self::LondonHeathrow => "lhr",
            Self::DubaiInternational => "dxb",
            Self::HartsfieldJacksonAtlanta => "atl",
            Self::SaoPauloGuarulhos => "gru",
        }
    }

    pub fn long_name(&self) -> &'static str {
        match self {
            Self::JohnFKennedy => "John F. Kennedy International (JFK)",
            Self::LondonHeathrow => "London Heathrow (LHR)",
            Self::DubaiInternational => "Dubai International (DXB)",
            Self::HartsfieldJacksonAtlanta => "Hartsfield-Jackson Atlanta (ATL)",
            Self::SaoPauloGuarulhos => "São Paulo–Guarulhos (GRU)",
        }
    }

    pub fn location(&self) -> &'static str {
        match self {
            Self::JohnFKennedy => "New York, USA",
            Self::LondonHeathrow => "London, UK",
            Self::DubaiInternational => "Dubai, UAE",
            Self::HartsfieldJacksonAtlanta => "Atlanta, USA",
            Self::SaoPauloGuarulhos => "São Paulo, Brazil",
        }
    }

    /// Share of international flights, 0-100.
    pub fn international_percentage(&self) -> u8 {
        match self {
            Self::JohnFKennedy => 56,
            Self::LondonHeathrow => 95,
            Self::DubaiInternational => 99,
            Self::HartsfieldJacksonAtlanta => 15,
            Self::SaoPauloGuarulhos => 35,
        }
    }
}

impl fmt::Display for AirportProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.long_name())
    }
}

impl FromStr for AirportProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|profile| profile.code() == key)
            .ok_or_else(|| {
                format!(
                    "unknown airport '{}', expected one of: jfk, lhr, dxb, atl, gru",
                    s
                )
            })
    }
}
