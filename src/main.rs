use std::env;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use funcgen::{
    apply_key, export, panel, Dco, Frequency, Key, SharedParams, SynthParams, WaveformKind,
    TICK_RATE_HZ,
};

#[cfg(feature = "streaming")]
use funcgen::streaming::{AudioDevice, StreamConfig, StreamingDac};

/// Panel refresh / key poll interval in milliseconds
const PANEL_REFRESH_MS: u64 = 50;

/// Samples generated per producer batch
const BATCH_SIZE: usize = 1024;

fn parse_wave(value: &str) -> Option<WaveformKind> {
    match value.to_ascii_lowercase().as_str() {
        "sqr" | "square" => Some(WaveformKind::Square),
        "saw" | "sawtooth" => Some(WaveformKind::Sawtooth),
        "sin" | "sine" => Some(WaveformKind::Sine),
        _ => None,
    }
}

fn parse_freq(value: &str) -> Option<Frequency> {
    match value {
        "100" => Some(Frequency::Hz100),
        "200" => Some(Frequency::Hz200),
        "300" => Some(Frequency::Hz300),
        "400" => Some(Frequency::Hz400),
        "500" => Some(Frequency::Hz500),
        _ => None,
    }
}

fn print_usage() {
    eprintln!(
        "Usage:\n  funcgen [options]\n\nOptions:\n  --wave <sqr|saw|sin>   Initial waveform (default sqr)\n  --freq <hz>            Initial frequency: 100|200|300|400|500 (default 100)\n  --duty <fraction>      Initial square duty cycle, clamped to 0.1-0.9 (default 0.5)\n  --capture <file.wav>   Render a capture to WAV and exit\n  --csv <file.csv>       Render a capture to CSV and exit\n  --seconds <n>          Capture length in seconds (default 1.0)\n  --no-audio             Run the interactive panel without audio output\n  -h, --help             Show this help\n\nInteractive keys:\n  1-5   frequency 100-500 Hz\n  7/8/9 square / sine / sawtooth\n  * #   duty cycle -/+10%\n  0     duty cycle 50%\n  q     quit\n"
    );
}

#[cfg(unix)]
fn set_raw_terminal_mode() {
    let _ = std::process::Command::new("stty")
        .arg("-echo")
        .arg("raw")
        .status();
}

#[cfg(not(unix))]
fn set_raw_terminal_mode() {}

#[cfg(unix)]
fn restore_terminal_mode() {
    let _ = std::process::Command::new("stty")
        .arg("echo")
        .arg("-raw")
        .status();
}

#[cfg(not(unix))]
fn restore_terminal_mode() {}

fn redraw_panel(params: &SynthParams) {
    let lines = panel::status_lines(params);
    print!("\x1B[2A");
    print!("\x1B[2K\r{}\n", lines[0]);
    print!("\x1B[2K\r{}\n", lines[1]);
    io::stdout().flush().ok();
}

fn main() -> funcgen::Result<()> {
    let mut kind = WaveformKind::Square;
    let mut frequency = Frequency::Hz100;
    let mut duty = 0.5f32;
    let mut capture_wav: Option<String> = None;
    let mut capture_csv: Option<String> = None;
    let mut seconds = 1.0f32;
    let mut no_audio = false;
    let mut show_help = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--wave" => match args.next().as_deref().and_then(parse_wave) {
                Some(value) => kind = value,
                None => {
                    eprintln!("--wave requires sqr, saw, or sin");
                    show_help = true;
                }
            },
            "--freq" => match args.next().as_deref().and_then(parse_freq) {
                Some(value) => frequency = value,
                None => {
                    eprintln!("--freq requires one of 100|200|300|400|500");
                    show_help = true;
                }
            },
            "--duty" => match args.next().and_then(|v| v.parse::<f32>().ok()) {
                Some(value) => duty = value,
                None => {
                    eprintln!("--duty requires a fraction, e.g. 0.7");
                    show_help = true;
                }
            },
            "--seconds" => match args.next().and_then(|v| v.parse::<f32>().ok()) {
                Some(value) if value > 0.0 => seconds = value,
                _ => {
                    eprintln!("--seconds requires a positive number");
                    show_help = true;
                }
            },
            "--capture" => match args.next() {
                Some(path) => capture_wav = Some(path),
                None => {
                    eprintln!("--capture requires a file path");
                    show_help = true;
                }
            },
            "--csv" => match args.next() {
                Some(path) => capture_csv = Some(path),
                None => {
                    eprintln!("--csv requires a file path");
                    show_help = true;
                }
            },
            "--no-audio" => no_audio = true,
            "--help" | "-h" => show_help = true,
            _ => {
                eprintln!("Unknown flag: {arg}");
                show_help = true;
            }
        }
    }

    if show_help {
        print_usage();
        return Ok(());
    }

    let initial = SynthParams::new(kind, frequency, duty);

    // Capture mode: render to file(s) and exit.
    if capture_wav.is_some() || capture_csv.is_some() {
        let ticks = (seconds * TICK_RATE_HZ as f32) as usize;
        if let Some(path) = capture_wav {
            let mut dco = Dco::new(SharedParams::new(initial));
            export::export_wav(&mut dco, ticks, &path)?;
            println!(
                "Wrote {ticks} samples ({seconds:.2}s of {} at {}) to {path}",
                initial.kind, initial.frequency
            );
        }
        if let Some(path) = capture_csv {
            let mut dco = Dco::new(SharedParams::new(initial));
            export::export_csv(&mut dco, ticks, &path)?;
            println!("Wrote {ticks} rows to {path}");
        }
        return Ok(());
    }

    println!("funcgen - DAC Function Generator");
    println!("================================\n");
    println!("Tick rate: {TICK_RATE_HZ} Hz, 12-bit output codes");
    println!("Keys: [1-5]=frequency, [7]=SQR [8]=SIN [9]=SAW, [*/#]=duty -/+10%, [0]=duty 50%, [q]=quit\n");

    let params = SharedParams::new(initial);
    let running = Arc::new(AtomicBool::new(true));

    #[cfg(feature = "streaming")]
    let monitor = if no_audio {
        None
    } else {
        let config = StreamConfig::default();
        let dac = StreamingDac::new(config)?;
        println!(
            "Audio monitor: {} Hz, {} sample buffer ({:.1}ms latency)\n",
            config.sample_rate,
            config.ring_buffer_size,
            config.latency_ms()
        );
        Some(dac)
    };

    #[cfg(feature = "streaming")]
    let _audio_device = match &monitor {
        Some(dac) => {
            let config = *dac.config();
            Some(AudioDevice::new(
                config.sample_rate,
                config.channels,
                dac.buffer(),
            )?)
        }
        None => None,
    };

    #[cfg(not(feature = "streaming"))]
    if !no_audio {
        println!("Built without the \"streaming\" feature; running silent.");
        println!("Rebuild with `--features streaming` to hear the output.\n");
    }

    // Producer: paces the engine at the tick rate. With the audio
    // monitor attached, backpressure from the ring buffer is the clock;
    // otherwise a wall-clock sleep stands in.
    let producer = {
        let running = Arc::clone(&running);
        let mut dco = Dco::new(params.clone());
        #[cfg(feature = "streaming")]
        let monitor = monitor.clone();
        std::thread::spawn(move || {
            let mut batch = [0.0f32; BATCH_SIZE];
            while running.load(Ordering::Relaxed) {
                dco.fill_samples(&mut batch);

                #[cfg(feature = "streaming")]
                if let Some(dac) = &monitor {
                    dac.write_blocking(&batch);
                    continue;
                }

                std::thread::sleep(Duration::from_micros(
                    BATCH_SIZE as u64 * 1_000_000 / TICK_RATE_HZ as u64,
                ));
            }
            dco.ticks()
        })
    };

    // Input: raw-mode stdin reader feeding single bytes to the control loop.
    let (tx, rx) = std::sync::mpsc::channel::<u8>();
    std::thread::spawn(move || {
        set_raw_terminal_mode();
        let mut stdin = io::stdin();
        let mut buf = [0u8; 1];
        while stdin.read_exact(&mut buf).is_ok() {
            if tx.send(buf[0]).is_err() || buf[0] == b'\x03' {
                break;
            }
        }
        restore_terminal_mode();
    });

    let started = Instant::now();

    // Reserve the two panel lines, then redraw in place on key events.
    print!("\x1B[?25l");
    println!();
    println!();
    redraw_panel(&params.snapshot());

    loop {
        std::thread::sleep(Duration::from_millis(PANEL_REFRESH_MS));

        while let Ok(byte) = rx.try_recv() {
            match byte {
                b'q' | b'Q' | b'\x03' => {
                    running.store(false, Ordering::Relaxed);
                }
                other => {
                    if let Some(key) = Key::from_char(other as char) {
                        let mut changed = false;
                        params.commit(|p| changed = apply_key(p, key));
                        if changed {
                            redraw_panel(&params.snapshot());
                        }
                    }
                }
            }
        }

        if !running.load(Ordering::Relaxed) {
            break;
        }
    }

    let ticks = producer
        .join()
        .expect("Producer thread panicked during shutdown");

    #[cfg(feature = "streaming")]
    if let Some(device) = &_audio_device {
        device.finish();
    }

    restore_terminal_mode();
    println!("\x1B[?25h");

    let elapsed = started.elapsed().as_secs_f32();
    println!("\n=== Session Statistics ===");
    println!("Duration:       {elapsed:.2} seconds");
    println!("Ticks executed: {ticks}");
    #[cfg(feature = "streaming")]
    if let Some(dac) = &monitor {
        let stats = dac.get_stats();
        println!("Samples played: {}", stats.samples_played);
        println!("Overrun events: {}", stats.overrun_count);
        println!("Buffer latency: {:.1} ms", dac.latency_ms());
    }

    Ok(())
}
