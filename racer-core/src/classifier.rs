//! Farbklassifikation
//!
//! Ordnet eine gemittelte Farbmessung einer [`ColorClass`] zu. Jede Referenzfarbe
//! ist eine achsenparallele Toleranz-Box um einen Mittelpunkt. Die Boxen werden
//! in fester Reihenfolge geprüft; die erste passende gewinnt.

use crate::types::{ColorClass, ColorSample};

/// Standard-Toleranz pro Kanal
const DEFAULT_TOLERANCE: u32 = 10_000;

/// Toleranz-Box um eine Referenzfarbe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceBox {
    pub class: ColorClass,
    /// Mittelpunkt (R, G, B)
    pub center: [u32; 3],
    /// Halbe Kantenlänge pro Kanal (R, G, B)
    pub tolerance: [u32; 3],
}

impl ReferenceBox {
    const fn uniform(class: ColorClass, center: [u32; 3]) -> Self {
        Self {
            class,
            center,
            tolerance: [DEFAULT_TOLERANCE; 3],
        }
    }

    /// Liegt das Sample auf allen drei Kanälen innerhalb der Box?
    ///
    /// Untere Grenzen sättigen bei 0. Der Clear-Kanal wird nicht geprüft.
    pub fn contains(&self, sample: &ColorSample) -> bool {
        let channels = [
            u32::from(sample.red),
            u32::from(sample.green),
            u32::from(sample.blue),
        ];

        channels
            .iter()
            .zip(self.center.iter().zip(self.tolerance.iter()))
            .all(|(&value, (&center, &tolerance))| {
                value >= center.saturating_sub(tolerance) && value <= center + tolerance
            })
    }
}

/// Referenz-Boxen in Prüfreihenfolge
///
/// Die Reihenfolge ist der Tie-Break für überlappende Boxen und darf nicht
/// verändert werden: Gelb → Grün → Blau → Cyan → Rot → Weiß.
pub const REFERENCE_BOXES: [ReferenceBox; 6] = [
    ReferenceBox {
        class: ColorClass::Yellow,
        center: [41_120, 52_909, 21_743],
        tolerance: [22_000, 19_000, 20_000],
    },
    ReferenceBox::uniform(ColorClass::Green, [114, 120, 20]),
    ReferenceBox::uniform(ColorClass::Blue, [12_093, 23_398, 31_486]),
    ReferenceBox::uniform(ColorClass::Cyan, [80, 107, 63]),
    ReferenceBox::uniform(ColorClass::Red, [37_250, 17_100, 15_550]),
    ReferenceBox::uniform(ColorClass::White, [65_535, 65_535, 56_712]),
];

/// Klassifiziert eine (gemittelte) Farbmessung
///
/// # Beispiele
///
/// ```
/// # use racer_core::{classify, ColorClass, ColorSample};
/// let blue = ColorSample::new(12_093, 23_398, 31_486, u16::MAX);
/// assert_eq!(classify(&blue), ColorClass::Blue);
/// ```
pub fn classify(sample: &ColorSample) -> ColorClass {
    REFERENCE_BOXES
        .iter()
        .find(|reference| reference.contains(sample))
        .map_or(ColorClass::Unknown, |reference| reference.class)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center_of(class: ColorClass) -> ColorSample {
        let reference = REFERENCE_BOXES
            .iter()
            .find(|r| r.class == class)
            .unwrap();
        ColorSample::new(
            reference.center[0].min(65_535) as u16,
            reference.center[1].min(65_535) as u16,
            reference.center[2].min(65_535) as u16,
            u16::MAX,
        )
    }

    #[test]
    fn test_reference_centers_classify_as_themselves() {
        for class in [
            ColorClass::Yellow,
            ColorClass::Blue,
            ColorClass::Red,
            ColorClass::White,
        ] {
            assert_eq!(classify(&center_of(class)), class);
        }
    }

    #[test]
    fn test_box_edges_are_inclusive() {
        // Rot: R 27250..=47250, G 7100..=27100, B 5550..=25550
        let low = ColorSample::new(27_250, 7_100, 5_550, 0);
        let high = ColorSample::new(47_250, 27_100, 25_550, 0);
        assert_eq!(classify(&low), ColorClass::Red);
        assert_eq!(classify(&high), ColorClass::Red);

        let outside = ColorSample::new(47_251, 27_100, 25_550, 0);
        assert_eq!(classify(&outside), ColorClass::Unknown);
    }

    #[test]
    fn test_lower_bound_saturates_at_zero() {
        let black = ColorSample::new(0, 0, 0, 0);
        assert!(REFERENCE_BOXES[1].contains(&black));
    }

    #[test]
    fn test_black_sample_classifies_as_green() {
        // Nullgefüllte Ringpuffer-Slots liefern anfangs Schwarz: löst SpeedUp aus
        let black = ColorSample::new(0, 0, 0, 0);
        assert_eq!(classify(&black), ColorClass::Green);
    }

    #[test]
    fn test_clear_channel_is_ignored() {
        let mut sample = center_of(ColorClass::Blue);
        sample.clear = 0;
        assert_eq!(classify(&sample), ColorClass::Blue);
    }
}
