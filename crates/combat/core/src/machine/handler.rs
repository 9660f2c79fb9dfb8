use crate::machine::{CombatContext, CombatPhase};
use crate::world::CombatWorld;

/// What a handler gets to touch while it runs.
pub struct PhaseScope<'a> {
    pub world: &'a mut CombatWorld,
    pub ctx: &'a mut CombatContext,
}

/// Behavior of one phase of the battle flow.
///
/// Handlers are registered per phase on the
/// [`CombatStateMachine`](crate::machine::CombatStateMachine) and never see
/// each other. All hooks except `on_update` default to no-ops.
pub trait PhaseHandler: Send {
    /// Returns the handler name for logging and debugging.
    fn name(&self) -> &'static str;

    fn on_enter(&mut self, _scope: &mut PhaseScope<'_>) {}

    /// Advances the phase by `dt` seconds. Returning `Some(next)` requests a
    /// transition, which the machine performs after this call returns.
    fn on_update(&mut self, scope: &mut PhaseScope<'_>, dt: f64) -> Option<CombatPhase>;

    fn on_exit(&mut self, _scope: &mut PhaseScope<'_>) {}

    /// Transient phases are updated again in the same tick right after they
    /// are entered.
    fn is_transient(&self) -> bool {
        false
    }
}
