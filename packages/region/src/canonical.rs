//! Canonical administrative region vocabulary.
//!
//! The 28 states and 8 union territories form a closed set: every record
//! that survives cleaning carries a `state` value drawn from exactly this
//! enumeration. Free-text labels are mapped onto it by the resolver in
//! the crate root.

use serde::de::Error as _;
use strum::{Display, EnumIter, EnumString};

/// A canonical Indian state or union territory.
///
/// Display and `FromStr` round-trip through the official post-2020 names
/// (e.g. `"Dadra and Nagar Haveli and Daman and Diu"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
pub enum Region {
    #[strum(serialize = "Andhra Pradesh")]
    AndhraPradesh,
    #[strum(serialize = "Arunachal Pradesh")]
    ArunachalPradesh,
    Assam,
    Bihar,
    Chhattisgarh,
    Goa,
    Gujarat,
    Haryana,
    #[strum(serialize = "Himachal Pradesh")]
    HimachalPradesh,
    Jharkhand,
    Karnataka,
    Kerala,
    #[strum(serialize = "Madhya Pradesh")]
    MadhyaPradesh,
    Maharashtra,
    Manipur,
    Meghalaya,
    Mizoram,
    Nagaland,
    Odisha,
    Punjab,
    Rajasthan,
    Sikkim,
    #[strum(serialize = "Tamil Nadu")]
    TamilNadu,
    Telangana,
    Tripura,
    #[strum(serialize = "Uttar Pradesh")]
    UttarPradesh,
    Uttarakhand,
    #[strum(serialize = "West Bengal")]
    WestBengal,
    #[strum(serialize = "Andaman and Nicobar Islands")]
    AndamanAndNicobarIslands,
    Chandigarh,
    #[strum(serialize = "Dadra and Nagar Haveli and Daman and Diu")]
    DadraAndNagarHaveliAndDamanAndDiu,
    Delhi,
    #[strum(serialize = "Jammu and Kashmir")]
    JammuAndKashmir,
    Ladakh,
    Lakshadweep,
    Puducherry,
}

impl Region {
    /// The canonical name as it appears in cleaned data.
    #[must_use]
    pub fn name(self) -> String {
        self.to_string()
    }
}

impl serde::Serialize for Region {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Region {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| D::Error::custom(format!("unknown region: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn canonical_set_size() {
        assert_eq!(Region::iter().count(), 36);
    }

    #[test]
    fn name_roundtrip() {
        for region in Region::iter() {
            let name = region.name();
            assert_eq!(name.parse::<Region>(), Ok(region), "roundtrip: {name}");
        }
    }

    #[test]
    fn merged_territory_name() {
        assert_eq!(
            Region::DadraAndNagarHaveliAndDamanAndDiu.name(),
            "Dadra and Nagar Haveli and Daman and Diu"
        );
    }

    #[test]
    fn serde_as_string() {
        let json = serde_json::to_string(&Region::TamilNadu).unwrap();
        assert_eq!(json, "\"Tamil Nadu\"");
        let back: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Region::TamilNadu);
    }
}
