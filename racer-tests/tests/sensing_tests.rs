//! Integration Tests für den Mess-Pfad: Roh-Frame → Puffer → Klassifikation

use racer_core::classifier::REFERENCE_BOXES;
use racer_core::debounce::DEBOUNCE_WINDOW_MS;
use racer_core::{classify, ColorClass, ColorSample, Debouncer, RawRgbc, SampleBuffer};

fn sample(red: u16, green: u16, blue: u16) -> ColorSample {
    ColorSample::new(red, green, blue, u16::MAX)
}

// ============================================================================
// Tests: Klassifikation
// ============================================================================

#[test]
fn test_overlap_resolves_by_priority() {
    // Liegt in den Boxen von Grün und Cyan; Grün wird zuerst geprüft
    let s = sample(50, 60, 40);
    let containing: Vec<ColorClass> = REFERENCE_BOXES
        .iter()
        .filter(|b| b.contains(&s))
        .map(|b| b.class)
        .collect();
    assert_eq!(containing, vec![ColorClass::Green, ColorClass::Cyan]);
    assert_eq!(classify(&s), ColorClass::Green);
}

#[test]
fn test_bright_warm_sample_is_yellow() {
    let s = sample(60_000, 60_000, 40_000);
    assert_eq!(classify(&s), ColorClass::Yellow);
}

#[test]
fn test_between_boxes_is_unknown() {
    assert_eq!(classify(&sample(30_000, 2_000, 50_000)), ColorClass::Unknown);
}

#[test]
fn test_classification_is_deterministic() {
    let s = sample(12_000, 23_000, 31_000);
    assert_eq!(classify(&s), classify(&s));
    assert_eq!(classify(&s), ColorClass::Blue);
}

// ============================================================================
// Tests: Ringpuffer
// ============================================================================

#[test]
fn test_full_ring_of_constant_sample_averages_to_it() {
    let s = sample(37_250, 17_100, 15_550);
    let mut buffer = SampleBuffer::new();
    for _ in 0..buffer.capacity() {
        buffer.put(s);
    }

    assert!(buffer.is_full());
    assert_eq!(buffer.average(), s);

    buffer.put(s);
    assert!(buffer.is_full());
    assert_eq!(buffer.len(), 3);
}

#[test]
fn test_cold_start_bias_pulls_towards_black() {
    let mut buffer = SampleBuffer::new();
    assert!(buffer.is_empty());
    buffer.put(sample(37_250, 17_100, 15_550));

    // Zwei Null-Slots ziehen den Mittelwert aus der Rot-Box heraus
    assert_eq!(buffer.average(), ColorSample::new(12_416, 5_700, 5_183, 21_845));
    assert_eq!(classify(&buffer.average()), ColorClass::Unknown);
}

// ============================================================================
// Tests: Roh-Frames
// ============================================================================

#[test]
fn test_raw_frame_normalization_feeds_classifier() {
    // Blau-Referenz relativ zum Clear-Kanal
    let raw = RawRgbc {
        clear: 2_000,
        red: 369,
        green: 714,
        blue: 961,
    };
    let s = ColorSample::normalized(raw).unwrap();
    assert_eq!(s.clear, u16::MAX);
    assert_eq!(classify(&s), ColorClass::Blue);
}

#[test]
fn test_dark_frame_is_skipped() {
    let raw = RawRgbc {
        clear: 3,
        red: 1,
        green: 1,
        blue: 1,
    };
    assert_eq!(ColorSample::normalized(raw), None);
}

// ============================================================================
// Tests: Entprellung
// ============================================================================

#[test]
fn test_edge_burst_yields_single_trigger() {
    let mut debouncer = Debouncer::default();
    let edges = [0u64, 5, 40, 120, 199, 200];
    let accepted = edges.iter().filter(|&&t| debouncer.accept(t)).count();
    assert_eq!(accepted, 1);

    assert!(debouncer.accept(DEBOUNCE_WINDOW_MS + 1));
}
