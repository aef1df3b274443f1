//! Supported output frequencies and the tick-rate derivation
//!
//! The hardware timer fires at a fixed [`TICK_RATE_HZ`]; the sampling
//! density of a waveform period therefore varies with the selected
//! frequency, not with the timer. Restricting the frequency to an enum
//! makes the lookup total: there is no unsupported value to pass in.

use num_derive::FromPrimitive;

/// Fixed timer tick rate driving sample output, in Hz
///
/// One DAC code is emitted per tick regardless of the selected frequency.
pub const TICK_RATE_HZ: u32 = 27_000;

/// One of the five selectable output frequencies
///
/// Discriminants match the keypad digits that select them, so a digit
/// key converts directly via [`num_traits::FromPrimitive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Frequency {
    /// 100 Hz (keypad `1`)
    Hz100 = 1,
    /// 200 Hz (keypad `2`)
    Hz200 = 2,
    /// 300 Hz (keypad `3`)
    Hz300 = 3,
    /// 400 Hz (keypad `4`)
    Hz400 = 4,
    /// 500 Hz (keypad `5`)
    Hz500 = 5,
}

impl Frequency {
    /// The frequency value in Hz
    #[inline]
    pub fn hz(self) -> u32 {
        match self {
            Frequency::Hz100 => 100,
            Frequency::Hz200 => 200,
            Frequency::Hz300 => 300,
            Frequency::Hz400 => 400,
            Frequency::Hz500 => 500,
        }
    }

    /// Number of timer ticks spanning one full waveform period
    ///
    /// Derived from the fixed tick rate by integer division (400 Hz does
    /// not divide 27 kHz evenly and truncates to 67 points). Always >= 1
    /// for every supported frequency; pure and callable from the tick
    /// path.
    #[inline]
    pub fn points_per_cycle(self) -> u32 {
        TICK_RATE_HZ / self.hz()
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::Hz100
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz", self.hz())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    const ALL: [Frequency; 5] = [
        Frequency::Hz100,
        Frequency::Hz200,
        Frequency::Hz300,
        Frequency::Hz400,
        Frequency::Hz500,
    ];

    #[test]
    fn test_points_per_cycle_table() {
        assert_eq!(Frequency::Hz100.points_per_cycle(), 270);
        assert_eq!(Frequency::Hz200.points_per_cycle(), 135);
        assert_eq!(Frequency::Hz300.points_per_cycle(), 90);
        assert_eq!(Frequency::Hz400.points_per_cycle(), 67);
        assert_eq!(Frequency::Hz500.points_per_cycle(), 54);
    }

    #[test]
    fn test_points_per_cycle_at_least_one() {
        for freq in ALL {
            assert!(freq.points_per_cycle() >= 1, "{freq} has zero points");
        }
    }

    #[test]
    fn test_keypad_digit_conversion() {
        assert_eq!(Frequency::from_u8(1), Some(Frequency::Hz100));
        assert_eq!(Frequency::from_u8(5), Some(Frequency::Hz500));
        assert_eq!(Frequency::from_u8(0), None);
        assert_eq!(Frequency::from_u8(6), None);
    }
}
