use crate::quantity::power::Watts;

/// Anything that draws power and has a ceiling on it.
pub trait Load {
    fn effective_max_power(&self) -> Watts;
}

/// Charger which can use one or more phases.
#[derive(Copy, Clone, Debug, serde::Deserialize)]
pub struct Loadpoint {
    /// Maximum current per phase, amperes.
    pub max_current: f64,

    #[serde(default = "Loadpoint::default_phases")]
    pub phases: u8,
}

impl Loadpoint {
    /// Nominal phase voltage.
    const VOLTAGE: f64 = 230.0;

    const fn default_phases() -> u8 {
        3
    }
}

impl Default for Loadpoint {
    fn default() -> Self {
        Self { max_current: 16.0, phases: Self::default_phases() }
    }
}

impl Load for Loadpoint {
    fn effective_max_power(&self) -> Watts {
        Watts(Self::VOLTAGE * f64::from(self.phases) * self.max_current)
    }
}
