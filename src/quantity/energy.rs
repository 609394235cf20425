quantity!(WattHours, "Wh");
quantity!(KilowattHours, "kWh");

impl From<WattHours> for KilowattHours {
    fn from(watt_hours: WattHours) -> Self {
        Self(watt_hours.0 * 0.001)
    }
}
