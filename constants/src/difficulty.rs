use bevy::prelude::*;

/// Visual style for a subnode at a given difficulty level.
/// Size and brightness increase monotonically with difficulty.
pub struct DifficultyStyle {
    pub difficulty: u8,
    pub color: u32,
    pub radius: f32,
}

pub const DIFFICULTY_STYLES: &[DifficultyStyle] = &[
    DifficultyStyle {
        difficulty: 0,
        color: 0x2A3E66,
        radius: 0.30,
    },
    DifficultyStyle {
        difficulty: 1,
        color: 0x3A527A,
        radius: 0.40,
    },
    DifficultyStyle {
        difficulty: 2,
        color: 0x4B668E,
        radius: 0.50,
    },
    DifficultyStyle {
        difficulty: 3,
        color: 0x5C7AA2,
        radius: 0.60,
    },
    DifficultyStyle {
        difficulty: 4,
        color: 0x6D8EB6,
        radius: 0.70,
    },
    DifficultyStyle {
        difficulty: 5,
        color: 0x7EA2CA,
        radius: 0.80,
    },
    DifficultyStyle {
        difficulty: 6,
        color: 0x8FB6DE,
        radius: 0.90,
    },
    DifficultyStyle {
        difficulty: 7,
        color: 0xA0CAEE,
        radius: 1.00,
    },
    DifficultyStyle {
        difficulty: 8,
        color: 0xB1DEFF,
        radius: 1.10,
    },
    DifficultyStyle {
        difficulty: 9,
        color: 0xC2F2FF,
        radius: 1.20,
    },
    DifficultyStyle {
        difficulty: 10,
        color: 0xFFFFFF,
        radius: 1.30,
    },
];

/// Look up the style for a difficulty level, clamping out-of-range values
/// to the nearest table entry.
pub fn style_for(difficulty: u8) -> &'static DifficultyStyle {
    let index = (difficulty as usize).min(DIFFICULTY_STYLES.len() - 1);
    &DIFFICULTY_STYLES[index]
}

/// Convert a packed 0xRRGGBB colour to a linear-workflow Bevy colour.
pub fn srgb_from_hex(hex: u32) -> Color {
    let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
    let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
    let b = (hex & 0xFF) as f32 / 255.0;
    Color::srgb(r, g, b)
}
