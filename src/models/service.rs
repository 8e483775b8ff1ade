use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ServiceError, ServiceResult};

/// Base offerings a booking starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseService {
    Haircut,
    Shave,
    Styling,
    Coloring,
}

impl BaseService {
    pub const ALL: [BaseService; 4] = [
        BaseService::Haircut,
        BaseService::Shave,
        BaseService::Styling,
        BaseService::Coloring,
    ];

    pub fn price(&self) -> Decimal {
        match self {
            BaseService::Haircut => dec!(50000),
            BaseService::Shave => dec!(30000),
            BaseService::Styling => dec!(80000),
            BaseService::Coloring => dec!(150000),
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        match self {
            BaseService::Haircut => 30,
            BaseService::Shave => 20,
            BaseService::Styling => 45,
            BaseService::Coloring => 90,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BaseService::Haircut => "Haircut",
            BaseService::Shave => "Shave",
            BaseService::Styling => "Styling",
            BaseService::Coloring => "Coloring",
        }
    }

    /// Catalog copy shown alongside the offering
    pub fn blurb(&self) -> &'static str {
        match self {
            BaseService::Haircut => "Professional haircut",
            BaseService::Shave => "Clean shave",
            BaseService::Styling => "Hair styling",
            BaseService::Coloring => "Hair coloring",
        }
    }
}

impl fmt::Display for BaseService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for BaseService {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "haircut" => Ok(BaseService::Haircut),
            "shave" => Ok(BaseService::Shave),
            "styling" => Ok(BaseService::Styling),
            "coloring" => Ok(BaseService::Coloring),
            _ => Err(format!("Invalid base service: {}", s)),
        }
    }
}

/// Optional add-ons layered onto a base service
///
/// Each add-on contributes a fixed price and duration delta and appends its
/// label to the composed description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Addon {
    HairWash,
    HairSpa,
    Massage,
    HotTowel,
    PremiumProducts,
}

impl Addon {
    pub const ALL: [Addon; 5] = [
        Addon::HairWash,
        Addon::HairSpa,
        Addon::Massage,
        Addon::HotTowel,
        Addon::PremiumProducts,
    ];

    pub fn price_delta(&self) -> Decimal {
        match self {
            Addon::HairWash => dec!(15000),
            Addon::HairSpa => dec!(30000),
            Addon::Massage => dec!(15000),
            Addon::HotTowel => dec!(10000),
            Addon::PremiumProducts => dec!(25000),
        }
    }

    pub fn duration_delta_minutes(&self) -> u32 {
        match self {
            Addon::HairWash => 10,
            Addon::HairSpa => 20,
            Addon::Massage => 10,
            Addon::HotTowel => 5,
            Addon::PremiumProducts => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Addon::HairWash => "Hair Wash",
            Addon::HairSpa => "Hair Spa",
            Addon::Massage => "Massage",
            Addon::HotTowel => "Hot Towel",
            Addon::PremiumProducts => "Premium Products",
        }
    }
}

impl fmt::Display for Addon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Addon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(' ', "_").as_str() {
            "hair_wash" => Ok(Addon::HairWash),
            "hair_spa" => Ok(Addon::HairSpa),
            "massage" => Ok(Addon::Massage),
            "hot_towel" => Ok(Addon::HotTowel),
            "premium_products" => Ok(Addon::PremiumProducts),
            _ => Err(format!("Invalid add-on: {}", s)),
        }
    }
}

/// A fully composed service: one base plus zero or more add-ons in
/// application order
///
/// Totals are folds over the add-on list and do not depend on ordering; the
/// description preserves the order the add-ons were applied in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSelection {
    pub base: BaseService,
    pub addons: Vec<Addon>,
}

impl ServiceSelection {
    pub fn new(base: BaseService) -> Self {
        Self {
            base,
            addons: Vec::new(),
        }
    }

    /// Compose a service from a base name and an ordered add-on name list.
    ///
    /// The only construction path for services. An unknown base name is an
    /// error; unknown add-on names are skipped so callers may pass stale
    /// tags without failing.
    pub fn compose(base_name: &str, addon_names: &[String]) -> ServiceResult<Self> {
        let base: BaseService =
            base_name
                .parse()
                .map_err(|_| ServiceError::UnknownService {
                    name: base_name.to_string(),
                })?;

        let addons = addon_names
            .iter()
            .filter_map(|name| name.parse::<Addon>().ok())
            .collect();

        Ok(Self { base, addons })
    }

    pub fn price(&self) -> Decimal {
        self.addons
            .iter()
            .fold(self.base.price(), |total, addon| total + addon.price_delta())
    }

    pub fn duration_minutes(&self) -> u32 {
        self.addons.iter().fold(self.base.duration_minutes(), |total, addon| {
            total + addon.duration_delta_minutes()
        })
    }

    /// Human-readable description, add-ons in application order
    pub fn description(&self) -> String {
        self.addons
            .iter()
            .fold(self.base.label().to_string(), |desc, addon| {
                format!("{} + {}", desc, addon.label())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_base_service() {
        let selection = ServiceSelection::new(BaseService::Shave);
        assert_eq!(selection.price(), dec!(30000));
        assert_eq!(selection.duration_minutes(), 20);
        assert_eq!(selection.description(), "Shave");
    }

    #[test]
    fn test_haircut_with_hair_wash() {
        let selection =
            ServiceSelection::compose("Haircut", &["Hair Wash".to_string()]).unwrap();

        assert_eq!(selection.price(), dec!(65000));
        assert_eq!(selection.duration_minutes(), 40);
        assert_eq!(selection.description(), "Haircut + Hair Wash");
    }

    #[test]
    fn test_unknown_base_service_fails() {
        let result = ServiceSelection::compose("UnknownService", &[]);
        assert!(matches!(
            result,
            Err(ServiceError::UnknownService { .. })
        ));
    }

    #[test]
    fn test_unknown_addons_are_skipped() {
        let selection = ServiceSelection::compose(
            "Shave",
            &["Glitter".to_string(), "Hot Towel".to_string()],
        )
        .unwrap();

        assert_eq!(selection.addons, vec![Addon::HotTowel]);
        assert_eq!(selection.price(), dec!(40000));
        assert_eq!(selection.duration_minutes(), 25);
    }

    #[test]
    fn test_totals_ignore_addon_order() {
        let forward = ServiceSelection::compose(
            "Coloring",
            &["Hair Spa".to_string(), "Massage".to_string()],
        )
        .unwrap();
        let reverse = ServiceSelection::compose(
            "Coloring",
            &["Massage".to_string(), "Hair Spa".to_string()],
        )
        .unwrap();

        assert_eq!(forward.price(), reverse.price());
        assert_eq!(forward.duration_minutes(), reverse.duration_minutes());
        // descriptions differ: application order is preserved
        assert_eq!(forward.description(), "Coloring + Hair Spa + Massage");
        assert_eq!(reverse.description(), "Coloring + Massage + Hair Spa");
    }

    #[test]
    fn test_addon_name_forms() {
        assert_eq!("hair_wash".parse::<Addon>().unwrap(), Addon::HairWash);
        assert_eq!("Hair Wash".parse::<Addon>().unwrap(), Addon::HairWash);
        assert_eq!(
            "premium products".parse::<Addon>().unwrap(),
            Addon::PremiumProducts
        );
        assert!("perm".parse::<Addon>().is_err());
    }

    #[test]
    fn test_serde_serialization() {
        let selection = ServiceSelection::compose(
            "Styling",
            &["Hair Wash".to_string(), "Premium Products".to_string()],
        )
        .unwrap();

        let json = serde_json::to_string(&selection).unwrap();
        assert!(json.contains("\"styling\""));
        assert!(json.contains("\"hair_wash\""));

        let deserialized: ServiceSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(selection, deserialized);
    }
}
