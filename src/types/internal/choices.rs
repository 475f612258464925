//! Fixed value sets stored as strings in the database.
//!
//! Every choice renders to the exact label it is stored under and parses
//! back from it. Unknown labels fail with the list of accepted values so
//! callers can surface a useful message.

use std::fmt;
use std::str::FromStr;

/// Error returned when a label is not one of the accepted values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidChoice {
    pub value: String,
    pub allowed: &'static [&'static str],
}

impl fmt::Display for InvalidChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not a valid choice. Expected one of: {}",
            self.value,
            self.allowed.join(", ")
        )
    }
}

impl std::error::Error for InvalidChoice {}

macro_rules! choice {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = InvalidChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    _ => Err(InvalidChoice {
                        value: s.to_owned(),
                        allowed: Self::LABELS,
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice!(Sex {
    Male => "Male",
    Female => "Female",
});

choice!(CowBreedName {
    Friesian => "Friesian",
    Sahiwal => "Sahiwal",
    Jersey => "Jersey",
    Guernsey => "Guernsey",
    Crossbreed => "Crossbreed",
    Ayrshire => "Ayrshire",
});

choice!(AvailabilityStatus {
    Alive => "Alive",
    Sold => "Sold",
    Dead => "Dead",
});

choice!(
    /// Pregnancy status as tracked on the cow itself
    CowPregnancyStatus {
        Open => "Open",
        Pregnant => "Pregnant",
        Calved => "Calved",
        Unavailable => "Unavailable",
    }
);

choice!(CowCategory {
    Calf => "Calf",
    Weaner => "Weaner",
    Heifer => "Heifer",
    Bull => "Bull",
    MilkingCow => "Milking Cow",
});

choice!(ProductionStatus {
    Open => "Open",
    PregnantNotLactating => "Pregnant not Lactating",
    PregnantAndLactating => "Pregnant and Lactating",
    Dry => "Dry",
    Culled => "Culled",
    Quarantined => "Quarantined",
    Bull => "Bull",
    YoungBull => "Young Bull",
    YoungHeifer => "Young Heifer",
    MatureBull => "Mature Bull",
    Calf => "Calf",
    Weaner => "Weaner",
});

choice!(LactationStage {
    Early => "Early",
    Mid => "Mid",
    Late => "Late",
    Dry => "Dry",
    Ended => "Ended",
});

choice!(CullingReason {
    Injuries => "Injuries",
    ChronicHealth => "Chronic Health Issues",
    CostOfCare => "Cost Of Care",
    Unprofitable => "Unprofitable",
    LowMarketDemand => "Low Market Demand",
    Age => "Age",
    ConsistentLowProduction => "Consistent Low Production",
    LowQuality => "Low Quality",
    InefficientFeedConversion => "Inefficient Feed Conversion",
    InheritedDiseases => "Inherited Diseases",
    Inbreeding => "Inbreeding",
    UnwantedTraits => "Unwanted Traits",
    ClimateChange => "Climate Change",
    NaturalDisaster => "Natural Disaster",
    Overpopulation => "Overpopulation",
    GovernmentRegulations => "Government Regulations",
    AnimalWelfareStandards => "Animal Welfare Standards",
    EnvironmentProtectionLaws => "Environmental Protection Laws",
});

choice!(
    /// Status of a single pregnancy record
    PregnancyStatus {
        Confirmed => "Confirmed",
        Unconfirmed => "Unconfirmed",
        Failed => "Failed",
    }
);

choice!(PregnancyOutcome {
    Live => "Live",
    Stillborn => "Stillborn",
    Miscarriage => "Miscarriage",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for label in ProductionStatus::LABELS {
            let status: ProductionStatus = label.parse().unwrap();
            assert_eq!(status.as_str(), *label);
        }
    }

    #[test]
    fn test_multi_word_labels() {
        assert_eq!(CowCategory::MilkingCow.as_str(), "Milking Cow");
        assert_eq!(
            "Environmental Protection Laws".parse::<CullingReason>().unwrap(),
            CullingReason::EnvironmentProtectionLaws
        );
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let err = "Holstein".parse::<CowBreedName>().unwrap_err();
        assert_eq!(err.value, "Holstein");
        assert!(err.to_string().contains("Friesian"));
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert!("male".parse::<Sex>().is_err());
        assert_eq!("Male".parse::<Sex>().unwrap(), Sex::Male);
    }
}
