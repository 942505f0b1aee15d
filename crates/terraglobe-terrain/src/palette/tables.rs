//! Fixed stop tables for the gradient palettes.

use super::PaletteStop;

const fn stop(t: f32, r: f32, g: f32, b: f32) -> PaletteStop {
    PaletteStop { t, rgb: [r, g, b] }
}

pub(super) static GRAYSCALE: [PaletteStop; 2] = [stop(0.0, 0.0, 0.0, 0.0), stop(1.0, 1.0, 1.0, 1.0)];

pub(super) static VIRIDIS: [PaletteStop; 5] = [
    stop(0.0, 0.267, 0.005, 0.329),
    stop(0.25, 0.229, 0.322, 0.546),
    stop(0.5, 0.128, 0.567, 0.551),
    stop(0.75, 0.369, 0.789, 0.383),
    stop(1.0, 0.993, 0.906, 0.144),
];

pub(super) static INFERNO: [PaletteStop; 5] = [
    stop(0.0, 0.001, 0.000, 0.014),
    stop(0.25, 0.341, 0.062, 0.429),
    stop(0.5, 0.735, 0.216, 0.330),
    stop(0.75, 0.988, 0.645, 0.040),
    stop(1.0, 0.988, 1.000, 0.645),
];

pub(super) static MAGMA: [PaletteStop; 5] = [
    stop(0.0, 0.001, 0.000, 0.014),
    stop(0.25, 0.316, 0.072, 0.485),
    stop(0.5, 0.716, 0.215, 0.475),
    stop(0.75, 0.987, 0.536, 0.382),
    stop(1.0, 0.987, 0.991, 0.750),
];

pub(super) static PLASMA: [PaletteStop; 5] = [
    stop(0.0, 0.050, 0.030, 0.528),
    stop(0.25, 0.494, 0.012, 0.658),
    stop(0.5, 0.798, 0.280, 0.470),
    stop(0.75, 0.973, 0.585, 0.253),
    stop(1.0, 0.940, 0.975, 0.131),
];

pub(super) static TURBO: [PaletteStop; 5] = [
    stop(0.0, 0.190, 0.072, 0.232),
    stop(0.25, 0.163, 0.683, 0.928),
    stop(0.5, 0.647, 0.990, 0.234),
    stop(0.75, 0.984, 0.553, 0.155),
    stop(1.0, 0.480, 0.016, 0.011),
];

pub(super) static COOLWARM: [PaletteStop; 3] = [
    stop(0.0, 0.230, 0.299, 0.754),
    stop(0.5, 0.865, 0.865, 0.865),
    stop(1.0, 0.706, 0.016, 0.150),
];

pub(super) static RAINBOW: [PaletteStop; 6] = [
    stop(0.0, 0.5, 0.0, 1.0),
    stop(0.2, 0.0, 0.0, 1.0),
    stop(0.4, 0.0, 1.0, 0.0),
    stop(0.6, 1.0, 1.0, 0.0),
    stop(0.8, 1.0, 0.5, 0.0),
    stop(1.0, 1.0, 0.0, 0.0),
];

pub(super) static OCEAN: [PaletteStop; 3] = [
    stop(0.0, 0.0, 0.05, 0.2),
    stop(0.5, 0.0, 0.4, 0.7),
    stop(1.0, 0.6, 0.9, 1.0),
];

pub(super) static DESERT: [PaletteStop; 4] = [
    stop(0.0, 0.45, 0.3, 0.15),
    stop(0.35, 0.76, 0.6, 0.42),
    stop(0.7, 0.93, 0.79, 0.55),
    stop(1.0, 1.0, 0.95, 0.85),
];

pub(super) static FOREST: [PaletteStop; 3] = [
    stop(0.0, 0.05, 0.2, 0.05),
    stop(0.5, 0.2, 0.5, 0.15),
    stop(1.0, 0.7, 0.85, 0.5),
];

pub(super) static TERRAIN: [PaletteStop; 5] = [
    stop(0.0, 0.2, 0.2, 0.6),
    stop(0.25, 0.0, 0.8, 0.4),
    stop(0.5, 1.0, 1.0, 0.6),
    stop(0.75, 0.5, 0.36, 0.33),
    stop(1.0, 1.0, 1.0, 1.0),
];

pub(super) static ICE: [PaletteStop; 3] = [
    stop(0.0, 0.1, 0.2, 0.4),
    stop(0.5, 0.6, 0.8, 0.95),
    stop(1.0, 1.0, 1.0, 1.0),
];
