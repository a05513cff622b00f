use crate::error::ConfigurationError;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    // One full sine period over the forcing duration.
    #[default]
    Sine,
    // Held at the full strength for the whole forcing window.
    Constant,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ForcingParams {
    pub driven_index: usize,
    // Length of the driven window, also the sine period.
    pub duration: f64,
    pub strength: f64,
    // After the driven window the point is held at zero for this long.
    pub settle: f64,
    #[serde(default)]
    pub waveform: Waveform,
}

impl Default for ForcingParams {
    fn default() -> Self {
        ForcingParams {
            driven_index: 100,
            duration: 360.0,
            strength: 5.0,
            settle: 50.0,
            waveform: Waveform::Sine,
        }
    }
}

impl ForcingParams {
    pub fn validate(&self, n: usize) -> Result<(), ConfigurationError> {
        if self.driven_index >= n {
            return Err(ConfigurationError::DrivenIndexOutOfRange {
                index: self.driven_index,
                n,
            });
        }
        for (name, value) in [
            ("forcing.duration", self.duration),
            ("forcing.strength", self.strength),
            ("forcing.settle", self.settle),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFiniteParameter { name, value });
            }
        }
        if self.duration <= 0.0 {
            return Err(ConfigurationError::NonPositiveForcingDuration(self.duration));
        }
        if self.settle < 0.0 {
            return Err(ConfigurationError::NegativeSettle(self.settle));
        }
        Ok(())
    }
}
