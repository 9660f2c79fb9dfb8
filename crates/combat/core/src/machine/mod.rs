//! Phase-level state machine driving one encounter.
//!
//! The machine is a dispatch table from [`CombatPhase`] to a boxed
//! [`PhaseHandler`]. It never inspects phases itself: handlers decide where
//! to go next and the machine performs the cut (`on_exit` of the old phase
//! runs to completion before `on_enter` of the new one). Transient phases
//! are chained inside the same update, bounded by
//! [`CombatConfig::max_phase_chain`].

mod context;
mod error;
mod handler;
mod phase;
pub mod states;

pub use context::{
    CombatContext, CombatReport, CombatResult, ParticipantSnapshot, ParticipantSnapshots,
    PendingAction, Rewards, SideChannel, TurnState,
};
pub use error::StateTransitionError;
pub use handler::{PhaseHandler, PhaseScope};
pub use phase::CombatPhase;

use std::collections::HashMap;

use crate::config::CombatConfig;
use crate::types::Tick;

/// One entry of the transition log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: Option<CombatPhase>,
    pub to: CombatPhase,
    pub at: Tick,
}

pub struct CombatStateMachine {
    handlers: HashMap<CombatPhase, Box<dyn PhaseHandler>>,
    current: Option<CombatPhase>,
    history: Vec<PhaseTransition>,
    max_chain: usize,
}

impl CombatStateMachine {
    /// An empty machine with no handlers registered.
    pub fn new(max_chain: usize) -> Self {
        Self {
            handlers: HashMap::new(),
            current: None,
            history: Vec::new(),
            max_chain: max_chain.max(1),
        }
    }

    /// A machine with every built-in phase registered for the configured
    /// mode.
    pub fn with_defaults(config: &CombatConfig) -> Self {
        let mut machine = Self::new(config.max_phase_chain);
        states::register_defaults(&mut machine, config.mode);
        machine
    }

    /// Installs `handler` for `phase`, returning the one it replaces.
    pub fn register(
        &mut self,
        phase: CombatPhase,
        handler: Box<dyn PhaseHandler>,
    ) -> Option<Box<dyn PhaseHandler>> {
        tracing::debug!(%phase, handler = handler.name(), "phase handler registered");
        self.handlers.insert(phase, handler)
    }

    pub fn is_registered(&self, phase: CombatPhase) -> bool {
        self.handlers.contains_key(&phase)
    }

    pub fn current(&self) -> Option<CombatPhase> {
        self.current
    }

    pub fn history(&self) -> &[PhaseTransition] {
        &self.history
    }

    /// Hard cut to `to`.
    ///
    /// Fails with [`StateTransitionError::UnknownState`] when nothing is
    /// registered for `to`; the machine is left untouched in that case.
    pub fn transition(
        &mut self,
        to: CombatPhase,
        scope: &mut PhaseScope<'_>,
    ) -> Result<(), StateTransitionError> {
        if !self.handlers.contains_key(&to) {
            return Err(StateTransitionError::UnknownState(to));
        }

        let from = self.current;
        if let Some(from) = from
            && let Some(handler) = self.handlers.get_mut(&from)
        {
            handler.on_exit(scope);
        }

        let at = scope.world.clock();
        match from {
            Some(from) => tracing::info!(%from, %to, tick = at.0, "phase transition"),
            None => tracing::info!(%to, tick = at.0, "phase entered"),
        }
        self.current = Some(to);
        self.history.push(PhaseTransition { from, to, at });

        if let Some(handler) = self.handlers.get_mut(&to) {
            handler.on_enter(scope);
        }
        Ok(())
    }

    /// Updates the current phase by `dt` and follows any requested
    /// transitions through transient phases.
    pub fn update(&mut self, scope: &mut PhaseScope<'_>, dt: f64) -> Result<(), StateTransitionError> {
        let mut phase = self.current.ok_or(StateTransitionError::NotStarted)?;
        let mut step = dt;
        let mut chained = 0;

        loop {
            let handler = self
                .handlers
                .get_mut(&phase)
                .ok_or(StateTransitionError::UnknownState(phase))?;
            let Some(next) = handler.on_update(scope, step) else {
                return Ok(());
            };
            self.transition(next, scope)?;
            phase = next;

            if !self.handlers.get(&phase).is_some_and(|h| h.is_transient()) {
                return Ok(());
            }
            chained += 1;
            if chained >= self.max_chain {
                tracing::warn!(%phase, chained, "phase chain limit reached");
                debug_assert!(false, "runaway phase chain ending at {phase}");
                return Ok(());
            }
            // Elapsed time is spent once per update.
            step = 0.0;
        }
    }

    /// Runs the current phase once more with no elapsed time if it is
    /// transient.
    pub fn settle(&mut self, scope: &mut PhaseScope<'_>) -> Result<(), StateTransitionError> {
        let transient = self
            .current
            .and_then(|phase| self.handlers.get(&phase))
            .is_some_and(|h| h.is_transient());
        if transient {
            self.update(scope, 0.0)?;
        }
        Ok(())
    }

    /// Leaves the current phase without running any hook. History is kept.
    pub fn halt(&mut self) {
        self.current = None;
    }

    /// Forgets the current phase and history; handlers stay registered.
    pub fn clear(&mut self) {
        self.current = None;
        self.history.clear();
    }
}

impl Default for CombatStateMachine {
    fn default() -> Self {
        Self::with_defaults(&CombatConfig::default())
    }
}

impl std::fmt::Debug for CombatStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut phases: Vec<_> = self.handlers.keys().copied().collect();
        phases.sort();
        f.debug_struct("CombatStateMachine")
            .field("current", &self.current)
            .field("phases", &phases)
            .field("history", &self.history.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityStore;
    use crate::skill::SkillLibrary;
    use crate::types::CombatId;
    use crate::world::CombatWorld;

    type Log = std::sync::Arc<std::sync::Mutex<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        next: Option<CombatPhase>,
        transient: bool,
        log: Log,
    }

    impl PhaseHandler for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn on_enter(&mut self, _scope: &mut PhaseScope<'_>) {
            self.log.lock().unwrap().push(format!("enter {}", self.name));
        }

        fn on_update(&mut self, _scope: &mut PhaseScope<'_>, _dt: f64) -> Option<CombatPhase> {
            self.log.lock().unwrap().push(format!("update {}", self.name));
            self.next
        }

        fn on_exit(&mut self, _scope: &mut PhaseScope<'_>) {
            self.log.lock().unwrap().push(format!("exit {}", self.name));
        }

        fn is_transient(&self) -> bool {
            self.transient
        }
    }

    fn fixture() -> (CombatWorld, CombatContext) {
        let world = CombatWorld::new(
            Box::new(EntityStore::new()),
            SkillLibrary::new(),
            CombatConfig::default(),
        );
        let ctx = CombatContext::new(CombatId(1), Vec::new(), Tick::ZERO);
        (world, ctx)
    }

    fn recorder(
        name: &'static str,
        next: Option<CombatPhase>,
        transient: bool,
        log: &Log,
    ) -> Box<dyn PhaseHandler> {
        Box::new(Recorder {
            name,
            next,
            transient,
            log: log.clone(),
        })
    }

    #[test]
    fn unknown_phase_leaves_machine_untouched() {
        let (mut world, mut ctx) = fixture();
        let log = Log::default();
        let mut machine = CombatStateMachine::new(8);
        machine.register(CombatPhase::BattleStart, recorder("start", None, false, &log));

        let mut scope = PhaseScope {
            world: &mut world,
            ctx: &mut ctx,
        };
        machine.transition(CombatPhase::BattleStart, &mut scope).unwrap();
        let err = machine
            .transition(CombatPhase::Custom("ghost"), &mut scope)
            .unwrap_err();

        assert_eq!(err, StateTransitionError::UnknownState(CombatPhase::Custom("ghost")));
        assert_eq!(machine.current(), Some(CombatPhase::BattleStart));
        assert_eq!(machine.history().len(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["enter start"]);
    }

    #[test]
    fn exit_runs_before_enter_and_transients_chain() {
        let (mut world, mut ctx) = fixture();
        let log = Log::default();
        let mut machine = CombatStateMachine::new(8);
        machine.register(
            CombatPhase::BattleStart,
            recorder("a", Some(CombatPhase::Custom("b")), false, &log),
        );
        machine.register(
            CombatPhase::Custom("b"),
            recorder("b", Some(CombatPhase::Custom("c")), true, &log),
        );
        machine.register(CombatPhase::Custom("c"), recorder("c", None, false, &log));

        let mut scope = PhaseScope {
            world: &mut world,
            ctx: &mut ctx,
        };
        machine.transition(CombatPhase::BattleStart, &mut scope).unwrap();
        machine.update(&mut scope, 0.1).unwrap();

        assert_eq!(machine.current(), Some(CombatPhase::Custom("c")));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["enter a", "update a", "exit a", "enter b", "update b", "exit b", "enter c"]
        );
    }

    #[test]
    fn update_without_phase_is_not_started() {
        let (mut world, mut ctx) = fixture();
        let mut machine = CombatStateMachine::new(8);
        let mut scope = PhaseScope {
            world: &mut world,
            ctx: &mut ctx,
        };
        assert_eq!(
            machine.update(&mut scope, 1.0),
            Err(StateTransitionError::NotStarted)
        );
    }
}
