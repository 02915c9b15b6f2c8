//! Built-in ecosystem service values (USD/ha/yr), service catalogue and
//! regional factors. Baselines equal the sum of their services.

use crate::tables::{EcosystemBaseline, RegionTable, ServiceInfo};
use std::collections::BTreeMap;

fn eco(services: &[(&str, f64)]) -> EcosystemBaseline {
    let services: BTreeMap<String, f64> = services
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect();
    EcosystemBaseline {
        baseline_per_hectare: services.values().sum(),
        services,
    }
}

pub fn default_ecosystems() -> BTreeMap<String, EcosystemBaseline> {
    let table = [
        (
            "tropical_forest",
            eco(&[
                ("carbon_sequestration", 1500.0),
                ("water_regulation", 1200.0),
                ("biodiversity_habitat", 1100.0),
                ("soil_formation", 550.0),
                ("air_purification", 380.0),
                ("recreation", 332.0),
                ("pollination", 320.0),
            ]),
        ),
        (
            "temperate_forest",
            eco(&[
                ("carbon_sequestration", 900.0),
                ("water_regulation", 750.0),
                ("biodiversity_habitat", 600.0),
                ("recreation", 307.0),
                ("soil_formation", 300.0),
                ("air_purification", 280.0),
            ]),
        ),
        (
            "mangrove",
            eco(&[
                ("coastal_protection", 4000.0),
                ("carbon_sequestration", 2500.0),
                ("biodiversity_habitat", 1800.0),
                ("food_provision", 900.0),
                ("water_regulation", 790.0),
            ]),
        ),
        (
            "wetland",
            eco(&[
                ("water_regulation", 3800.0),
                ("biodiversity_habitat", 1900.0),
                ("carbon_sequestration", 1200.0),
                ("food_provision", 700.0),
                ("recreation", 585.0),
                ("soil_formation", 400.0),
            ]),
        ),
        (
            "grassland_savanna",
            eco(&[
                ("soil_formation", 800.0),
                ("carbon_sequestration", 650.0),
                ("pollination", 550.0),
                ("biodiversity_habitat", 450.0),
                ("food_provision", 421.0),
            ]),
        ),
        (
            "agricultural",
            eco(&[
                ("food_provision", 700.0),
                ("pollination", 350.0),
                ("soil_formation", 250.0),
                ("water_regulation", 132.0),
                ("carbon_sequestration", 100.0),
            ]),
        ),
        (
            "urban_green",
            eco(&[
                ("air_purification", 2100.0),
                ("recreation", 2000.0),
                ("water_regulation", 1300.0),
                ("carbon_sequestration", 700.0),
                ("biodiversity_habitat", 561.0),
            ]),
        ),
        (
            "default",
            eco(&[
                ("carbon_sequestration", 900.0),
                ("water_regulation", 800.0),
                ("biodiversity_habitat", 700.0),
                ("soil_formation", 400.0),
                ("recreation", 400.0),
                ("pollination", 300.0),
            ]),
        ),
    ];
    table
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

pub fn default_services() -> BTreeMap<String, ServiceInfo> {
    let info = |name: &str, icon: &str, color: &str, description: &str| ServiceInfo {
        name: name.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        description: description.to_string(),
    };
    BTreeMap::from([
        (
            "carbon_sequestration".to_string(),
            info(
                "Carbon Sequestration",
                "leaf",
                "#27ae60",
                "CO2 captured and stored in biomass and soil",
            ),
        ),
        (
            "water_regulation".to_string(),
            info(
                "Water Regulation",
                "droplet",
                "#3498db",
                "Flood buffering, groundwater recharge and filtration",
            ),
        ),
        (
            "biodiversity_habitat".to_string(),
            info(
                "Biodiversity Habitat",
                "paw",
                "#8e44ad",
                "Nursery and refuge habitat supporting species richness",
            ),
        ),
        (
            "soil_formation".to_string(),
            info(
                "Soil Formation",
                "layers",
                "#a0522d",
                "Nutrient cycling and erosion control",
            ),
        ),
        (
            "pollination".to_string(),
            info(
                "Pollination",
                "flower",
                "#f1c40f",
                "Pollinator support for crops and wild plants",
            ),
        ),
        (
            "air_purification".to_string(),
            info(
                "Air Purification",
                "wind",
                "#1abc9c",
                "Particulate and pollutant removal by vegetation",
            ),
        ),
        (
            "recreation".to_string(),
            info(
                "Recreation & Culture",
                "mountain",
                "#e67e22",
                "Tourism, recreation and cultural value",
            ),
        ),
        (
            "food_provision".to_string(),
            info(
                "Food Provision",
                "wheat",
                "#d35400",
                "Crops, fisheries and wild food harvested",
            ),
        ),
        (
            "coastal_protection".to_string(),
            info(
                "Coastal Protection",
                "waves",
                "#2980b9",
                "Storm surge and shoreline erosion protection",
            ),
        ),
    ])
}

pub fn default_regions() -> RegionTable {
    RegionTable {
        factors: BTreeMap::from([
            ("north_america".to_string(), 1.0),
            ("europe".to_string(), 0.95),
            ("oceania".to_string(), 0.9),
            ("east_asia".to_string(), 0.8),
            ("middle_east".to_string(), 0.7),
            ("latin_america".to_string(), 0.65),
            ("southeast_asia".to_string(), 0.6),
            ("south_asia".to_string(), 0.55),
            ("africa".to_string(), 0.5),
        ]),
        default_factor: 0.75,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_baselines() {
        let eco = default_ecosystems();
        let expected = [
            ("tropical_forest", 5382.0),
            ("temperate_forest", 3137.0),
            ("mangrove", 9990.0),
            ("wetland", 8585.0),
            ("grassland_savanna", 2871.0),
            ("agricultural", 1532.0),
            ("urban_green", 6661.0),
            ("default", 3500.0),
        ];
        for (key, value) in expected {
            assert_eq!(eco[key].baseline_per_hectare, value, "{}", key);
        }
    }

    #[test]
    fn every_service_has_catalogue_entry() {
        let services = default_services();
        for (key, eco) in default_ecosystems() {
            for svc in eco.services.keys() {
                assert!(services.contains_key(svc), "{} in {}", svc, key);
            }
        }
    }
}
