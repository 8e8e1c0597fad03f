use bevy::prelude::*;

/// Core sun palette: centre, two mid layers, surface, corona.
pub struct CorePalette {
    pub name: &'static str,
    pub core: u32,
    pub layer2: u32,
    pub layer3: u32,
    pub surface: u32,
    pub corona: u32,
}

pub const CORE_PALETTES: &[CorePalette] = &[
    CorePalette {
        name: "Ignition",
        core: 0xFFFFFF,
        layer2: 0xFFE8A3,
        layer3: 0xFFB347,
        surface: 0xFF6B1A,
        corona: 0xFF8C42,
    },
    CorePalette {
        name: "Insight",
        core: 0xFFFFFF,
        layer2: 0xC8E6FF,
        layer3: 0x6EB5FF,
        surface: 0x2D6CDF,
        corona: 0x4A90E2,
    },
    CorePalette {
        name: "Transformation",
        core: 0xFFFFFF,
        layer2: 0xE8C8FF,
        layer3: 0xB36EFF,
        surface: 0x7B2DDF,
        corona: 0x9B59B6,
    },
];

/// Translucent halo tints, indexed by spawn order modulo length.
pub const FAMILY_HALO_PALETTE: [u32; 8] = [
    0x4A6FA5, 0x6B4AA5, 0x4AA58C, 0xA5824A, 0xA54A6F, 0x4A8CA5, 0x8CA54A, 0x777777,
];

pub const CONSTELLATION_HALO_PALETTE: [u32; 8] = [
    0x7FA8D9, 0x9C7FD9, 0x7FD9BC, 0xD9B27F, 0xD97FA0, 0x7FC4D9, 0xBCD97F, 0x999999,
];

/// Palette entry for the named core, falling back to the first entry.
pub fn core_palette_for(name: &str) -> &'static CorePalette {
    CORE_PALETTES
        .iter()
        .find(|p| p.name == name)
        .unwrap_or(&CORE_PALETTES[0])
}

pub fn family_halo_color(index: usize) -> Color {
    crate::difficulty::srgb_from_hex(FAMILY_HALO_PALETTE[index % FAMILY_HALO_PALETTE.len()])
}

pub fn constellation_halo_color(index: usize) -> Color {
    crate::difficulty::srgb_from_hex(
        CONSTELLATION_HALO_PALETTE[index % CONSTELLATION_HALO_PALETTE.len()],
    )
}
