//! Seeded random scenarios.

use eco_core::{CellKind, GeneratorConfig, Placement, Result, Scenario};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Roll every cell once against the configured densities.
///
/// The same configuration always yields the same scenario.
pub fn generate(config: &GeneratorConfig) -> Result<Scenario> {
    config.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let ecosystem = &config.ecosystem;

    let rock = config.rock_density;
    let rabbit = rock + config.rabbit_density;
    let fox = rabbit + config.fox_density;

    let mut placements = Vec::new();
    for row in 0..ecosystem.rows {
        for col in 0..ecosystem.cols {
            let roll = rng.gen::<f32>();
            let kind = if roll < rock {
                CellKind::Rock
            } else if roll < rabbit {
                CellKind::Rabbit
            } else if roll < fox {
                CellKind::Fox
            } else {
                continue;
            };
            placements.push(Placement::new(kind, row, col));
        }
    }

    Ok(Scenario::new(ecosystem.clone(), placements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_core::EcosystemConfig;

    fn config(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            ecosystem: EcosystemConfig {
                rows: 20,
                cols: 20,
                ..Default::default()
            },
            seed,
            rock_density: 0.1,
            rabbit_density: 0.3,
            fox_density: 0.1,
        }
    }

    #[test]
    fn test_same_seed_same_scenario() {
        assert_eq!(generate(&config(7)).unwrap(), generate(&config(7)).unwrap());
        assert_ne!(generate(&config(7)).unwrap(), generate(&config(8)).unwrap());
    }

    #[test]
    fn test_generated_scenario_is_valid() {
        let scenario = generate(&config(42)).unwrap();
        assert!(scenario.validate().is_ok());

        let count = |kind| scenario.placements.iter().filter(|p| p.kind == kind).count();
        assert!(count(CellKind::Rock) > 0);
        assert!(count(CellKind::Rabbit) > 0);
        assert!(count(CellKind::Fox) > 0);
        assert!(scenario.placements.len() < 400);
    }

    #[test]
    fn test_zero_densities_give_empty_world() {
        let scenario = generate(&GeneratorConfig {
            rock_density: 0.0,
            rabbit_density: 0.0,
            fox_density: 0.0,
            ..config(1)
        })
        .unwrap();
        assert!(scenario.placements.is_empty());
    }

    #[test]
    fn test_bad_densities_rejected() {
        let bad = GeneratorConfig {
            rabbit_density: 1.5,
            ..config(1)
        };
        assert!(generate(&bad).is_err());
    }
}
