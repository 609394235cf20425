use std::ops::Mul;

use crate::quantity::{energy::WattHours, time::Hours};

quantity!(Watts, "W");

impl Mul<Hours> for Watts {
    type Output = WattHours;

    fn mul(self, hours: Hours) -> Self::Output {
        WattHours(self.0 * hours.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn test_energy_over_quarter() {
        let energy = Watts(2000.0) * Hours::from(TimeDelta::minutes(15));
        assert_abs_diff_eq!(energy.0, 500.0);
    }
}
