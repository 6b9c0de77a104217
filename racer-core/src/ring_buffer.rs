//! Ringpuffer für Farbmessungen
//!
//! Glättet einen Burst von Sensor-Messungen zu einem Mittelwert. Ist der Puffer
//! voll, überschreibt `put` die älteste Messung.

use crate::types::ColorSample;

/// Standard-Kapazität des Mess-Puffers
pub const SAMPLE_BUFFER_CAPACITY: usize = 3;

/// Ringpuffer mit der Standard-Kapazität
pub type SampleBuffer = SampleRingBuffer<SAMPLE_BUFFER_CAPACITY>;

/// Ringpuffer fester Kapazität `N`
///
/// Ein Schreiber, ein Leser, kein internes Lock. Der Besitzer (Sensor-Task)
/// ist für exklusiven Zugriff verantwortlich.
#[derive(Debug, Clone)]
pub struct SampleRingBuffer<const N: usize> {
    slots: [ColorSample; N],
    head: usize,
    tail: usize,
    full: bool,
}

impl<const N: usize> Default for SampleRingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleRingBuffer<N> {
    pub const fn new() -> Self {
        Self {
            slots: [ColorSample::new(0, 0, 0, 0); N],
            head: 0,
            tail: 0,
            full: false,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// `true` nur direkt nach der Initialisierung, vor dem ersten `put`
    pub fn is_empty(&self) -> bool {
        !self.full && self.head == self.tail
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Anzahl der seit der Initialisierung beschriebenen Slots
    pub fn len(&self) -> usize {
        if self.full {
            N
        } else {
            (self.head + N - self.tail) % N
        }
    }

    /// Speichert eine Messung und verdrängt bei vollem Puffer die älteste
    pub fn put(&mut self, sample: ColorSample) {
        self.slots[self.head] = sample;
        if self.full {
            self.tail = (self.tail + 1) % N;
        }
        self.head = (self.head + 1) % N;
        self.full = self.head == self.tail;
    }

    /// Arithmetisches Mittel über alle `N` Slots
    ///
    /// Solange der Puffer noch nie voll war, fließen die unbeschriebenen
    /// (Null-)Slots mit ein. Das ist gewolltes Verhalten.
    pub fn average(&self) -> ColorSample {
        let mut sum = [0u32; 4];
        for slot in &self.slots {
            sum[0] += u32::from(slot.red);
            sum[1] += u32::from(slot.green);
            sum[2] += u32::from(slot.blue);
            sum[3] += u32::from(slot.clear);
        }

        let n = N as u32;
        ColorSample {
            red: (sum[0] / n) as u16,
            green: (sum[1] / n) as u16,
            blue: (sum[2] / n) as u16,
            clear: (sum[3] / n) as u16,
        }
    }
}
