//! End-to-end scenarios driving the engine the way the instrument does:
//! key events mutate the shared parameters while the tick path generates
//! codes, and the emitted sequences are checked against the documented
//! waveform timing.

use funcgen::dac::{AMPLITUDE, CEILING, DC_BIAS};
use funcgen::{
    apply_key, panel, Dco, Frequency, Key, SharedParams, SynthParams, WaveformKind,
};

fn dco_with(kind: WaveformKind, frequency: Frequency, duty: f32) -> (Dco, SharedParams) {
    let params = SharedParams::new(SynthParams::new(kind, frequency, duty));
    (Dco::new(params.clone()), params)
}

#[test]
fn test_square_100hz_half_duty_timing() {
    // 100 Hz at a 27 kHz tick rate: 270 points per cycle, 135 high.
    let (mut dco, _) = dco_with(WaveformKind::Square, Frequency::Hz100, 0.5);
    let codes = dco.generate_codes(540);

    assert!(codes[..135].iter().all(|c| c.get() == CEILING));
    assert!(codes[135..270].iter().all(|c| c.get() == DC_BIAS));
    // The pattern repeats in the second cycle.
    assert!(codes[270..405].iter().all(|c| c.get() == CEILING));
    assert!(codes[405..540].iter().all(|c| c.get() == DC_BIAS));
}

#[test]
fn test_square_high_fraction_for_all_settings() {
    let frequencies = [
        Frequency::Hz100,
        Frequency::Hz200,
        Frequency::Hz300,
        Frequency::Hz400,
        Frequency::Hz500,
    ];
    for frequency in frequencies {
        for duty in [0.1, 0.2, 0.5, 0.8, 0.9] {
            let (mut dco, _) = dco_with(WaveformKind::Square, frequency, duty);
            let points = frequency.points_per_cycle() as usize;
            let codes = dco.generate_codes(points);

            let high = codes.iter().filter(|c| c.get() == CEILING).count();
            let expected = (points as f32 * duty).round() as usize;
            assert_eq!(high, expected, "{frequency}, duty {duty}");
        }
    }
}

#[test]
fn test_sine_500hz_wraps_within_sixty_ticks() {
    // 500 Hz: 54 points per cycle, 6 degrees per tick, so the waveform
    // period is 60 emitted codes (floor(360/54) = 6 divides 360 evenly).
    let (mut dco, _) = dco_with(WaveformKind::Sine, Frequency::Hz500, 0.5);
    let codes = dco.generate_codes(180);

    // Starts on the bias (sin 0 = 0) and reaches the negative half-wave
    // before wrapping, so the degree counter covered the full circle.
    assert_eq!(codes[0].get(), DC_BIAS);
    assert!(codes[..60].iter().any(|c| c.get() < DC_BIAS));

    for k in 0..120 {
        assert_eq!(codes[k], codes[k + 60], "period mismatch at tick {k}");
    }
}

#[test]
fn test_sine_codes_bounded_for_all_frequencies() {
    let frequencies = [
        Frequency::Hz100,
        Frequency::Hz200,
        Frequency::Hz300,
        Frequency::Hz400,
        Frequency::Hz500,
    ];
    for frequency in frequencies {
        let (mut dco, _) = dco_with(WaveformKind::Sine, frequency, 0.5);
        for code in dco.generate_codes(2 * frequency.points_per_cycle() as usize) {
            assert!(code.get() >= DC_BIAS - AMPLITUDE, "{frequency}");
            assert!(code.get() <= DC_BIAS + AMPLITUDE, "{frequency}");
        }
    }
}

#[test]
fn test_sawtooth_300hz_period_and_reset() {
    // 300 Hz: 90 points per cycle, step AMPLITUDE/90 codes per tick.
    let (mut dco, _) = dco_with(WaveformKind::Sawtooth, Frequency::Hz300, 0.5);
    let codes = dco.generate_codes(181);

    assert_eq!(codes[0].get(), DC_BIAS);
    for pair in codes[..90].windows(2) {
        assert!(pair[1] > pair[0], "ramp not increasing: {pair:?}");
        assert!(pair[1].get() <= CEILING);
    }
    // One full period in, the ramp has fallen back to the bias.
    assert_eq!(codes[90].get(), DC_BIAS);
    assert_eq!(codes[180].get(), DC_BIAS);
}

#[test]
fn test_duty_requests_are_clamped() {
    let params = SynthParams::new(WaveformKind::Square, Frequency::Hz100, 1.0);
    assert_eq!(params.duty_cycle(), 0.9);

    let params = SynthParams::new(WaveformKind::Square, Frequency::Hz100, 0.0);
    assert_eq!(params.duty_cycle(), 0.1);
}

#[test]
fn test_key_sequence_drives_engine_and_panel() {
    let (mut dco, params) = dco_with(WaveformKind::Square, Frequency::Hz100, 0.5);

    // Operator presses 3 (300 Hz), then 8 (sine), then # (duty up).
    for key in [Key::D3, Key::D8, Key::Hash] {
        let mut changed = false;
        params.commit(|p| changed = apply_key(p, key));
        assert!(changed);
    }

    let snapshot = params.snapshot();
    assert_eq!(snapshot.kind, WaveformKind::Sine);
    assert_eq!(snapshot.frequency, Frequency::Hz300);
    assert_eq!(snapshot.duty_cycle(), 0.6);

    let lines = panel::status_lines(&snapshot);
    assert_eq!(lines[1].trim_end(), "300  60% SIN");

    // The engine picks the new settings up on its next tick and the
    // sine output stays inside the amplitude window.
    for code in dco.generate_codes(90) {
        assert!(code.get() >= DC_BIAS - AMPLITUDE);
        assert!(code.get() <= DC_BIAS + AMPLITUDE);
    }
}

#[test]
fn test_reselecting_active_waveform_keeps_phase() {
    let (mut dco, params) = dco_with(WaveformKind::Square, Frequency::Hz100, 0.5);

    // Walk into the low half of the square cycle.
    dco.generate_codes(200);
    assert_eq!(dco.last_code().get(), DC_BIAS);

    // Pressing 7 again re-selects square; the cycle must not restart.
    params.commit(|p| {
        apply_key(p, Key::D7);
    });
    dco.clock();
    assert_eq!(dco.last_code().get(), DC_BIAS);

    // The cycle wraps on schedule: tick 271 overall is high again.
    let codes = dco.generate_codes(70);
    assert!(codes.iter().any(|c| c.get() == CEILING));
}
