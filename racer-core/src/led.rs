//! LED-Signalisierung
//!
//! Fünf Zonen: vorne links, vorne rechts, hinten rechts, hinten links und
//! die Indikator-LED in der Mitte. Der gemeinsame [`LedState`] wird von
//! mehreren Tasks beschrieben; der [`LedRenderer`] macht daraus in festem
//! Takt einen Frame.

use rgb::RGB8;

use crate::traits::LedError;

/// Anzahl der LED-Zonen
pub const NUM_ZONES: usize = 5;

/// Basis-Takt des Render-Loops (10 Hz)
pub const BASE_TICK_MS: u32 = 100;

/// Blinkperiode nach dem Reset des Zustands
pub const DEFAULT_FLASH_PERIOD_MS: u32 = 500;

/// Blinkperiode im Fahrbetrieb (wird beim Boot gesetzt)
pub const RUN_FLASH_PERIOD_MS: u32 = 100;

/// Ein Frame: eine Farbe pro Zone, in Zonen-Reihenfolge
pub type LedFrame = [RGB8; NUM_ZONES];

// ============================================================================
// Farben
// ============================================================================

pub mod colors {
    use rgb::RGB8;

    pub const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
    pub const RED: RGB8 = RGB8 { r: 255, g: 0, b: 0 };
    pub const GREEN: RGB8 = RGB8 { r: 0, g: 255, b: 0 };
    pub const BLUE: RGB8 = RGB8 { r: 0, g: 0, b: 255 };
    pub const YELLOW: RGB8 = RGB8 { r: 255, g: 255, b: 0 };
    pub const CYAN: RGB8 = RGB8 { r: 0, g: 255, b: 255 };
}

// ============================================================================
// Zonen und Modi
// ============================================================================

/// Physische LED-Zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedZone {
    FrontLeft,
    FrontRight,
    RearRight,
    RearLeft,
    Indicator,
}

impl LedZone {
    pub const ALL: [LedZone; NUM_ZONES] = [
        LedZone::FrontLeft,
        LedZone::FrontRight,
        LedZone::RearRight,
        LedZone::RearLeft,
        LedZone::Indicator,
    ];

    pub fn as_usize(self) -> usize {
        match self {
            LedZone::FrontLeft => 0,
            LedZone::FrontRight => 1,
            LedZone::RearRight => 2,
            LedZone::RearLeft => 3,
            LedZone::Indicator => 4,
        }
    }
}

impl TryFrom<usize> for LedZone {
    type Error = LedError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        LedZone::ALL
            .get(index)
            .copied()
            .ok_or(LedError::InvalidZone(index))
    }
}

/// Blinkmuster des Render-Loops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FlashMode {
    /// Alle Zonen leuchten dauerhaft
    #[default]
    Const,
    /// Zonen 0-3 blinken, Indikator bleibt an
    FlashAll,
    /// Nur die Rücklichter blinken
    FlashBack,
    /// Nur die Scheinwerfer blinken
    FlashFront,
    /// Scheinwerfer links/rechts im Wechsel
    FlashFrontAlternate,
    /// Nur die Indikator-LED blinkt
    FlashIndicator,
}

impl FlashMode {
    /// Blinkende Modi warten pro Tick zusätzlich eine Blinkperiode
    pub fn is_flashing(self) -> bool {
        self != FlashMode::Const
    }
}

/// Indikator-Farbe + Blinkmuster, das eine Zustandsänderung anzeigt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedSignal {
    pub indicator: RGB8,
    pub flash_mode: FlashMode,
}

impl LedSignal {
    /// Indikator aus, Dauerlicht
    pub const CLEARED: LedSignal = LedSignal {
        indicator: colors::OFF,
        flash_mode: FlashMode::Const,
    };

    pub const fn new(indicator: RGB8, flash_mode: FlashMode) -> Self {
        Self {
            indicator,
            flash_mode,
        }
    }
}

// RGB8 implementiert defmt::Format nicht, daher von Hand
#[cfg(feature = "defmt")]
impl defmt::Format for LedSignal {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "LedSignal {{ indicator: ({}, {}, {}), flash_mode: {} }}",
            self.indicator.r,
            self.indicator.g,
            self.indicator.b,
            self.flash_mode
        )
    }
}

// ============================================================================
// Gemeinsamer Zustand
// ============================================================================

/// Gemeinsamer LED-Zustand (liegt im Firmware-Build hinter einem Mutex)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedState {
    pub headlight: RGB8,
    pub taillight: RGB8,
    pub indicator: RGB8,
    pub flash_mode: FlashMode,
    pub flash_period_ms: u32,
    /// Optionale Farbe pro Zone; hat Vorrang vor der Gruppenfarbe
    zone_overrides: [Option<RGB8>; NUM_ZONES],
}

impl Default for LedState {
    fn default() -> Self {
        Self::new()
    }
}

impl LedState {
    /// Scheinwerfer aus, Rücklicht rot, Indikator aus, Dauerlicht
    pub const fn new() -> Self {
        Self {
            headlight: colors::OFF,
            taillight: colors::RED,
            indicator: colors::OFF,
            flash_mode: FlashMode::Const,
            flash_period_ms: DEFAULT_FLASH_PERIOD_MS,
            zone_overrides: [None; NUM_ZONES],
        }
    }

    pub fn set_headlight(&mut self, color: RGB8) {
        self.headlight = color;
    }

    pub fn set_taillight(&mut self, color: RGB8) {
        self.taillight = color;
    }

    pub fn set_indicator(&mut self, color: RGB8) {
        self.indicator = color;
    }

    pub fn set_flash_mode(&mut self, mode: FlashMode) {
        self.flash_mode = mode;
    }

    pub fn set_flash_period(&mut self, period_ms: u32) {
        self.flash_period_ms = period_ms;
    }

    /// Übernimmt Indikator-Farbe und Blinkmuster eines Signals
    pub fn show_signal(&mut self, signal: LedSignal) {
        self.indicator = signal.indicator;
        self.flash_mode = signal.flash_mode;
    }

    /// Setzt eine Einzelfarbe für die Zone `index`
    ///
    /// Ungültige Indizes verändern den Zustand nicht.
    pub fn set_zone_color(&mut self, index: usize, color: RGB8) -> Result<(), LedError> {
        let zone = LedZone::try_from(index)?;
        self.zone_overrides[zone.as_usize()] = Some(color);
        Ok(())
    }

    /// Entfernt die Einzelfarbe der Zone `index` (Gruppenfarbe gilt wieder)
    pub fn clear_zone_color(&mut self, index: usize) -> Result<(), LedError> {
        let zone = LedZone::try_from(index)?;
        self.zone_overrides[zone.as_usize()] = None;
        Ok(())
    }

    pub fn zone_override(&self, zone: LedZone) -> Option<RGB8> {
        self.zone_overrides[zone.as_usize()]
    }

    /// Farbe einer Zone im "an"-Zustand
    pub fn steady_color(&self, zone: LedZone) -> RGB8 {
        if let Some(color) = self.zone_override(zone) {
            return color;
        }
        match zone {
            LedZone::FrontLeft | LedZone::FrontRight => self.headlight,
            LedZone::RearRight | LedZone::RearLeft => self.taillight,
            LedZone::Indicator => self.indicator,
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Berechnet den Frame für einen Zustand und eine Blinkphase
///
/// `phase_on == false` ist die "aus"-Phase blinkender Zonen.
pub fn render_frame(state: &LedState, phase_on: bool) -> LedFrame {
    let mut frame = [colors::OFF; NUM_ZONES];

    for zone in LedZone::ALL {
        let lit = match (state.flash_mode, zone) {
            (FlashMode::Const, _) => true,
            (FlashMode::FlashAll, LedZone::Indicator) => true,
            (FlashMode::FlashAll, _) => phase_on,
            (FlashMode::FlashBack, LedZone::RearRight | LedZone::RearLeft) => phase_on,
            (FlashMode::FlashFront, LedZone::FrontLeft | LedZone::FrontRight) => phase_on,
            (FlashMode::FlashFrontAlternate, LedZone::FrontLeft) => phase_on,
            (FlashMode::FlashFrontAlternate, LedZone::FrontRight) => !phase_on,
            (FlashMode::FlashIndicator, LedZone::Indicator) => phase_on,
            _ => true,
        };

        if lit {
            frame[zone.as_usize()] = state.steady_color(zone);
        }
    }

    frame
}

/// Zustand des Render-Loops zwischen zwei Ticks
///
/// Hält die Blinkphase und den letzten erfolgreich gelesenen Zustand, damit
/// bei einem Lock-Timeout weiter gerendert werden kann.
#[derive(Debug, Clone)]
pub struct LedRenderer {
    snapshot: LedState,
    phase_on: bool,
}

impl Default for LedRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl LedRenderer {
    pub const fn new() -> Self {
        Self {
            snapshot: LedState::new(),
            phase_on: false,
        }
    }

    /// Ein Render-Tick
    ///
    /// `fresh` ist der gerade gelesene Zustand oder `None`, wenn der Lock
    /// nicht rechtzeitig frei wurde. Dann wird der letzte Snapshot verwendet.
    /// Die Blinkphase kippt nach jedem Tick.
    pub fn tick(&mut self, fresh: Option<&LedState>) -> LedFrame {
        if let Some(state) = fresh {
            self.snapshot = *state;
        }

        let frame = render_frame(&self.snapshot, self.phase_on);
        self.phase_on = !self.phase_on;
        frame
    }

    /// Wartezeit bis zum nächsten Tick
    pub fn tick_period_ms(&self) -> u32 {
        if self.snapshot.flash_mode.is_flashing() {
            BASE_TICK_MS + self.snapshot.flash_period_ms
        } else {
            BASE_TICK_MS
        }
    }

    pub fn snapshot(&self) -> &LedState {
        &self.snapshot
    }

    pub fn phase_on(&self) -> bool {
        self.phase_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: RGB8 = RGB8 {
        r: 255,
        g: 255,
        b: 255,
    };

    fn lit_state(mode: FlashMode) -> LedState {
        let mut state = LedState::new();
        state.set_headlight(WHITE);
        state.set_indicator(colors::BLUE);
        state.set_flash_mode(mode);
        state
    }

    #[test]
    fn test_default_state() {
        let state = LedState::default();
        assert_eq!(state.headlight, colors::OFF);
        assert_eq!(state.taillight, colors::RED);
        assert_eq!(state.indicator, colors::OFF);
        assert_eq!(state.flash_mode, FlashMode::Const);
        assert_eq!(state.flash_period_ms, 500);
    }

    #[test]
    fn test_const_ignores_phase() {
        let state = lit_state(FlashMode::Const);
        let expected = [WHITE, WHITE, colors::RED, colors::RED, colors::BLUE];
        assert_eq!(render_frame(&state, false), expected);
        assert_eq!(render_frame(&state, true), expected);
    }

    #[test]
    fn test_flash_all_keeps_indicator() {
        let state = lit_state(FlashMode::FlashAll);
        assert_eq!(
            render_frame(&state, false),
            [colors::OFF, colors::OFF, colors::OFF, colors::OFF, colors::BLUE]
        );
    }

    #[test]
    fn test_flash_front_alternate_antiphase() {
        let state = lit_state(FlashMode::FlashFrontAlternate);
        let off = render_frame(&state, false);
        let on = render_frame(&state, true);
        assert_eq!((off[0], off[1]), (colors::OFF, WHITE));
        assert_eq!((on[0], on[1]), (WHITE, colors::OFF));
        assert_eq!(off[2], colors::RED);
        assert_eq!(on[4], colors::BLUE);
    }

    #[test]
    fn test_flash_back_and_front() {
        let back = render_frame(&lit_state(FlashMode::FlashBack), false);
        assert_eq!(back, [WHITE, WHITE, colors::OFF, colors::OFF, colors::BLUE]);

        let front = render_frame(&lit_state(FlashMode::FlashFront), false);
        assert_eq!(front, [colors::OFF, colors::OFF, colors::RED, colors::RED, colors::BLUE]);
    }

    #[test]
    fn test_flash_indicator_only() {
        let state = lit_state(FlashMode::FlashIndicator);
        assert_eq!(render_frame(&state, false)[4], colors::OFF);
        assert_eq!(render_frame(&state, true)[4], colors::BLUE);
        assert_eq!(render_frame(&state, false)[0], WHITE);
    }

    #[test]
    fn test_invalid_zone_is_rejected() {
        let mut state = LedState::new();
        let before = state;
        assert_eq!(
            state.set_zone_color(5, colors::GREEN),
            Err(LedError::InvalidZone(5))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_zone_override_takes_precedence() {
        let mut state = LedState::new();
        state.set_zone_color(3, colors::GREEN).unwrap();
        let frame = render_frame(&state, true);
        assert_eq!(frame[2], colors::RED);
        assert_eq!(frame[3], colors::GREEN);

        state.clear_zone_color(3).unwrap();
        assert_eq!(render_frame(&state, true)[3], colors::RED);
    }

    #[test]
    fn test_renderer_phase_starts_off_and_flips() {
        let mut renderer = LedRenderer::new();
        let state = lit_state(FlashMode::FlashIndicator);

        assert_eq!(renderer.tick(Some(&state))[4], colors::OFF);
        assert_eq!(renderer.tick(Some(&state))[4], colors::BLUE);
        assert_eq!(renderer.tick(Some(&state))[4], colors::OFF);
    }

    #[test]
    fn test_renderer_uses_snapshot_on_lock_timeout() {
        let mut renderer = LedRenderer::new();
        let state = lit_state(FlashMode::Const);
        renderer.tick(Some(&state));

        let frame = renderer.tick(None);
        assert_eq!(frame[0], WHITE);
        assert_eq!(renderer.snapshot(), &state);
    }

    #[test]
    fn test_tick_period_adds_flash_period() {
        let mut renderer = LedRenderer::new();
        assert_eq!(renderer.tick_period_ms(), 100);

        let mut state = lit_state(FlashMode::FlashAll);
        state.set_flash_period(100);
        renderer.tick(Some(&state));
        assert_eq!(renderer.tick_period_ms(), 200);
    }
}
