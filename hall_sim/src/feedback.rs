//! Edge charge buildup and the Hall voltage it produces

use crate::carrier::Polarity;
use crate::collision::Wall;
use crate::constants::{CARRIER_INCREASE_RATE, VOLTAGE_SCALE};

/// Cumulative wall strike counts and the derived Hall voltage
///
/// The voltage is recomputed from the counts at every termination, so it never
/// carries memory beyond the two counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackAccumulator {
    top_count: u64,
    bottom_count: u64,
    hall_voltage: f64,
    /// Carriers credited to a wall per strike
    increment: u64,
    voltage_scale: f64,
}

impl FeedbackAccumulator {
    pub fn new(increment: u64, voltage_scale: f64) -> Self {
        Self {
            top_count: 0,
            bottom_count: 0,
            hall_voltage: 0.0,
            increment,
            voltage_scale,
        }
    }

    pub fn top_count(&self) -> u64 {
        self.top_count
    }

    pub fn bottom_count(&self) -> u64 {
        self.bottom_count
    }

    pub fn total_count(&self) -> u64 {
        self.top_count + self.bottom_count
    }

    pub fn hall_voltage(&self) -> f64 {
        self.hall_voltage
    }

    pub fn increment(&self) -> u64 {
        self.increment
    }

    pub fn voltage_scale(&self) -> f64 {
        self.voltage_scale
    }

    /// Credit a terminated run and recompute the voltage
    ///
    /// `wall` is `None` when the carrier left through the far end.
    pub fn record(&mut self, wall: Option<Wall>, polarity: Polarity) -> f64 {
        match wall {
            Some(Wall::Top) => self.top_count += self.increment,
            Some(Wall::Bottom) => self.bottom_count += self.increment,
            None => {}
        }

        self.hall_voltage = Self::voltage_for(
            self.top_count,
            self.bottom_count,
            self.voltage_scale,
            polarity,
        );
        self.hall_voltage
    }

    /// V_H = (N_bottom - N_top) * scale * sign(q)
    pub fn voltage_for(top: u64, bottom: u64, voltage_scale: f64, polarity: Polarity) -> f64 {
        let imbalance = bottom as f64 - top as f64;
        imbalance * voltage_scale * polarity.sign()
    }

    pub fn reset(&mut self) {
        self.top_count = 0;
        self.bottom_count = 0;
        self.hall_voltage = 0.0;
    }
}

impl Default for FeedbackAccumulator {
    fn default() -> Self {
        Self::new(CARRIER_INCREASE_RATE, VOLTAGE_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strikes_increment_their_wall() {
        let mut acc = FeedbackAccumulator::new(50, 400.0);
        acc.record(Some(Wall::Top), Polarity::Negative);
        assert_eq!((acc.top_count(), acc.bottom_count()), (50, 0));
        acc.record(Some(Wall::Bottom), Polarity::Negative);
        acc.record(Some(Wall::Bottom), Polarity::Negative);
        assert_eq!((acc.top_count(), acc.bottom_count()), (50, 100));
        assert_eq!(acc.total_count(), 150);
        assert_eq!(acc.hall_voltage(), 50.0 * 400.0 * -1.0);
    }

    #[test]
    fn exit_leaves_counts_unchanged() {
        let mut acc = FeedbackAccumulator::new(50, 400.0);
        acc.record(Some(Wall::Bottom), Polarity::Positive);
        let v = acc.record(None, Polarity::Positive);
        assert_eq!((acc.top_count(), acc.bottom_count()), (0, 50));
        assert_eq!(v, 20_000.0);
    }

    #[test]
    fn voltage_is_recomputed_not_accumulated() {
        let mut acc = FeedbackAccumulator::new(50, 400.0);
        acc.record(Some(Wall::Top), Polarity::Negative);
        acc.record(Some(Wall::Bottom), Polarity::Negative);
        assert_eq!(acc.hall_voltage(), 0.0);
        assert_eq!(
            acc.record(None, Polarity::Negative),
            FeedbackAccumulator::voltage_for(50, 50, 400.0, Polarity::Negative)
        );
    }

    #[test]
    fn flipped_polarity_negates_voltage_at_every_termination() {
        let walls = [
            Some(Wall::Top),
            Some(Wall::Top),
            None,
            Some(Wall::Bottom),
            Some(Wall::Top),
            Some(Wall::Bottom),
            Some(Wall::Bottom),
            Some(Wall::Bottom),
            None,
        ];
        let mut negative = FeedbackAccumulator::default();
        let mut positive = FeedbackAccumulator::default();

        for wall in walls {
            let vn = negative.record(wall, Polarity::Negative);
            let vp = positive.record(wall, Polarity::Positive);
            assert_eq!(vn, -vp);
        }
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut acc = FeedbackAccumulator::default();
        acc.record(Some(Wall::Top), Polarity::Negative);
        acc.reset();
        assert_eq!(acc, FeedbackAccumulator::default());
    }
}
