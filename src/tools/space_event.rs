use rand::{Rng, RngCore};

pub const SPACE_EVENTS: [&str; 4] = [
    "🚀 You discovered a hidden wormhole!",
    "👾 An alien ship is approaching fast!",
    "💎 You found rare cosmic crystals!",
    "☄️ Your spaceship is hit by a meteor shower!",
];

pub const SPACE_EVENT_DESCRIPTION: &str = "Generate a random space event. The event can be positive \
     (finding treasures), negative (dangerous encounters), or neutral (unexpected discoveries). \
     Returns a string describing the event.";

/// Pick one of [`SPACE_EVENTS`] uniformly.
pub fn generate_space_event(rng: &mut dyn RngCore) -> String {
    SPACE_EVENTS[rng.gen_range(0..SPACE_EVENTS.len())].to_string()
}
