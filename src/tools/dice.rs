use rand::{Rng, RngCore};

/// Faces on the die the alien encounters are settled with.
pub const DIE_FACES: u8 = 4;

pub const ROLL_DICE_DESCRIPTION: &str = "Simulate a dice roll. Used during battles, alien encounters, \
     or to determine random outcomes. Returns a string showing the rolled number.";

/// Draw a single face in `1..=DIE_FACES`.
pub fn roll(rng: &mut dyn RngCore) -> u8 {
    rng.gen_range(1..=DIE_FACES)
}

/// Roll the die and describe the result.
pub fn roll_dice(rng: &mut dyn RngCore) -> String {
    format!("🎲 Dice Roll: {}", roll(rng))
}
