use chat_core::AGENT_ROSTER;
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniform draw from the fixed roster for the simulated hand-off.
pub fn pick_agent<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    AGENT_ROSTER.choose(rng).copied().unwrap_or(AGENT_ROSTER[0])
}
