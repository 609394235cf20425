pub trait Zero: Copy + PartialOrd {
    const ZERO: Self;

    /// Clip negative values to zero.
    #[must_use]
    fn positive_part(self) -> Self {
        if self > Self::ZERO { self } else { Self::ZERO }
    }
}
