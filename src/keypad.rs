//! Keypad symbols and 4x3 matrix scan decoding
//!
//! The instrument's front panel is a 12-key telephone-style matrix
//! (digits, `*`, `#`). Scanning and debouncing happen outside this
//! crate; what arrives here is either a decoded [`Key`] symbol or a raw
//! column/row reading from a scan pass, which [`decode_scan`] turns into
//! a symbol.
//!
//! Decoding assumes a single pressed key. When keys on multiple columns
//! are down, the scan reports the leftmost column; multiple keys in one
//! column produce an ambiguous row pattern and decode to `None`. The
//! last detected key wins, which is the documented limitation of the
//! original scanner.

use crate::synth::frequency::Frequency;
use crate::synth::params::{SynthParams, WaveformKind, DUTY_DEFAULT, DUTY_STEP};
use bitflags::bitflags;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;

bitflags! {
    /// Row input pins of the keypad port
    ///
    /// Row 4 sits on bit 4 rather than bit 3; the board routes around an
    /// unusable pin, and the scan table below accounts for the gap.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RowPins: u8 {
        /// Row 1 (keys 1-2-3)
        const ROW1 = 0x01;
        /// Row 2 (keys 4-5-6)
        const ROW2 = 0x02;
        /// Row 3 (keys 7-8-9)
        const ROW3 = 0x04;
        /// Row 4 (keys *-0-#)
        const ROW4 = 0x10;
    }
}

bitflags! {
    /// Column drive pins of the keypad port
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ColPins: u8 {
        /// Leftmost column (keys 1-4-7-*)
        const COL1 = 0x20;
        /// Middle column (keys 2-5-8-0)
        const COL2 = 0x40;
        /// Rightmost column (keys 3-6-9-#)
        const COL3 = 0x80;
    }
}

/// One keypad symbol
///
/// Discriminants mirror the raw scan codes: digits map to themselves,
/// `*` scans as 10 and `#` as 12 (scan code 11 is the `0` key and is
/// fixed up during decode), so a scan code converts directly via
/// [`num_traits::FromPrimitive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Key {
    /// Digit 0 (duty-cycle reset)
    D0 = 0,
    /// Digit 1 (select 100 Hz)
    D1 = 1,
    /// Digit 2 (select 200 Hz)
    D2 = 2,
    /// Digit 3 (select 300 Hz)
    D3 = 3,
    /// Digit 4 (select 400 Hz)
    D4 = 4,
    /// Digit 5 (select 500 Hz)
    D5 = 5,
    /// Digit 6 (unassigned)
    D6 = 6,
    /// Digit 7 (select square)
    D7 = 7,
    /// Digit 8 (select sine)
    D8 = 8,
    /// Digit 9 (select sawtooth)
    D9 = 9,
    /// The `*` key (duty cycle down)
    Star = 10,
    /// The `#` key (duty cycle up)
    Hash = 12,
}

impl Key {
    /// Parse a key from its character form
    pub fn from_char(c: char) -> Option<Key> {
        match c {
            '*' => Some(Key::Star),
            '#' => Some(Key::Hash),
            '0'..='9' => Key::from_u8(c as u8 - b'0'),
            _ => None,
        }
    }

    /// The character printed on the key cap
    pub fn to_char(self) -> char {
        match self {
            Key::Star => '*',
            Key::Hash => '#',
            digit => (digit as u8 + b'0') as char,
        }
    }

    /// The digit value, for digit keys
    pub fn digit(self) -> Option<u8> {
        match self {
            Key::Star | Key::Hash => None,
            digit => Some(digit as u8),
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Decode one scan pass: the driven column and the row pins that read high
///
/// Returns `None` when no single key can be attributed to the reading
/// (no row active, an ambiguous multi-row pattern, or a multi-flag
/// column argument).
pub fn decode_scan(col: ColPins, rows: RowPins) -> Option<Key> {
    let col_index = match col.bits() {
        b if b == ColPins::COL1.bits() => 0u8,
        b if b == ColPins::COL2.bits() => 1,
        b if b == ColPins::COL3.bits() => 2,
        _ => return None,
    };
    let row_index = match rows.bits() {
        b if b == RowPins::ROW1.bits() => 1u8,
        b if b == RowPins::ROW2.bits() => 2,
        b if b == RowPins::ROW3.bits() => 3,
        b if b == RowPins::ROW4.bits() => 4,
        _ => return None,
    };

    // Scan codes count left to right, top to bottom: 1..=12.
    let scan_code = row_index * 3 - (2 - col_index);
    if scan_code == 11 {
        // The 0 key sits between * (10) and # (12).
        return Some(Key::D0);
    }
    Key::from_u8(scan_code)
}

/// Apply one key event to the synthesis parameters
///
/// Returns `true` when the key was handled (and the status display
/// should refresh), `false` for unassigned keys. Frequency keys 1-5,
/// waveform keys 7/8/9, duty nudges `*`/`#`, duty reset `0`.
pub fn apply_key(params: &mut SynthParams, key: Key) -> bool {
    match key {
        Key::D1 | Key::D2 | Key::D3 | Key::D4 | Key::D5 => {
            // Digits 1-5 share their discriminant with the frequency enum.
            if let Some(freq) = Frequency::from_u8(key as u8) {
                params.frequency = freq;
            }
            true
        }
        Key::D7 => {
            params.kind = WaveformKind::Square;
            true
        }
        Key::D8 => {
            params.kind = WaveformKind::Sine;
            true
        }
        Key::D9 => {
            params.kind = WaveformKind::Sawtooth;
            true
        }
        Key::Star => {
            params.adjust_duty_cycle(-DUTY_STEP);
            true
        }
        Key::Hash => {
            params.adjust_duty_cycle(DUTY_STEP);
            true
        }
        Key::D0 => {
            params.set_duty_cycle(DUTY_DEFAULT);
            true
        }
        Key::D6 => false,
    }
}
