use crate::error::ConfigurationError;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct SimParams {
    // Number of points on the string, including both ends.
    pub n: usize,
    // Time step.
    pub dt: f64,
    // Last step index that is still simulated.
    pub timestep_max: usize,
    // Multiplier on acceleration from the neighbours' relative displacement.
    pub spring_multiplier: f64,
    // Velocity is scaled by this before the spring term is added.
    // Below 1 damps the string over time.
    pub velocity_multiplier: f64,
}

impl Default for SimParams {
    fn default() -> Self {
        SimParams {
            n: 201,
            dt: 10.0,
            timestep_max: 5000,
            spring_multiplier: 1.0,
            velocity_multiplier: 1.0,
        }
    }
}

impl SimParams {
    pub fn to_steps(&self, t: f64) -> usize {
        (t / self.dt).ceil() as usize
    }

    pub fn t_max(&self) -> f64 {
        self.timestep_max as f64 * self.dt
    }

    // One step expands to x' = (1 + vm) x - vm x_prev + k Lap(x). Lap has
    // eigenvalues down to -4, so the roots stay in the unit disc only for
    // k >= 0, |vm| <= 1 and 2k <= 1 + vm.
    pub fn exceeds_stability_bound(&self) -> bool {
        let k = self.spring_multiplier;
        let vm = self.velocity_multiplier;
        k < 0.0 || vm.abs() > 1.0 || 2.0 * k > 1.0 + vm
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.n < 3 {
            return Err(ConfigurationError::TooFewPoints(self.n));
        }
        for (name, value) in [
            ("dt", self.dt),
            ("spring_multiplier", self.spring_multiplier),
            ("velocity_multiplier", self.velocity_multiplier),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFiniteParameter { name, value });
            }
        }
        if self.dt <= 0.0 {
            return Err(ConfigurationError::NonPositiveTimestep(self.dt));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let p = SimParams::default();
        assert_eq!(p.validate(), Ok(()));
        assert!(!p.exceeds_stability_bound());
        assert_eq!(p.t_max(), 50_000.0);
    }

    #[test]
    fn test_rejects_short_string() {
        let p = SimParams {
            n: 2,
            ..Default::default()
        };
        assert_eq!(p.validate(), Err(ConfigurationError::TooFewPoints(2)));
    }

    #[test]
    fn test_rejects_bad_timestep() {
        for dt in [0.0, -1.0] {
            let p = SimParams {
                dt,
                ..Default::default()
            };
            assert_eq!(p.validate(), Err(ConfigurationError::NonPositiveTimestep(dt)));
        }
        let p = SimParams {
            dt: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(ConfigurationError::NonFiniteParameter { name: "dt", .. })
        ));
    }

    #[test]
    fn test_to_steps() {
        let p = SimParams::default();
        assert_eq!(p.to_steps(100.0), 10);
        assert_eq!(p.to_steps(101.0), 11);
    }

    #[test]
    fn test_stability_bound() {
        let bounded = |spring_multiplier: f64, velocity_multiplier: f64| {
            !SimParams {
                spring_multiplier,
                velocity_multiplier,
                ..Default::default()
            }
            .exceeds_stability_bound()
        };
        assert!(bounded(1.0, 1.0));
        assert!(bounded(0.5, 0.999));
        assert!(bounded(0.5, 0.0));
        assert!(bounded(0.0, -1.0));
        assert!(!bounded(1.5, 1.0));
        // Damping at full spring strength still blows up.
        assert!(!bounded(1.0, 0.9));
        assert!(!bounded(-0.1, 1.0));
        assert!(!bounded(0.0, -1.5));
        assert!(!bounded(0.5, 1.01));
    }
}
