//! Built-in handlers for every phase of the battle flow.

mod active;
mod end;
mod pause;
mod skill;
mod start;
mod terminal;
mod turn;

pub use active::BattleActiveHandler;
pub use end::BattleEndHandler;
pub use pause::{BattlePauseHandler, BattleResumeHandler};
pub use skill::{CalculatingDamageHandler, SkillCastingHandler, SkillExecutingHandler};
pub use start::BattleStartHandler;
pub use terminal::TerminalHandler;
pub use turn::TurnHandler;

pub(crate) use end::unwind;
pub(crate) use terminal::build_report;

use crate::config::CombatMode;
use crate::machine::{CombatPhase, CombatStateMachine};

pub fn register_defaults(machine: &mut CombatStateMachine, mode: CombatMode) {
    machine.register(CombatPhase::BattleStart, Box::new(BattleStartHandler));
    machine.register(CombatPhase::BattleActive, Box::new(BattleActiveHandler::new(mode)));
    machine.register(CombatPhase::PlayerTurn, Box::new(TurnHandler::new(CombatPhase::PlayerTurn)));
    machine.register(CombatPhase::EnemyTurn, Box::new(TurnHandler::new(CombatPhase::EnemyTurn)));
    machine.register(CombatPhase::SkillCasting, Box::new(SkillCastingHandler));
    machine.register(CombatPhase::SkillExecuting, Box::new(SkillExecutingHandler));
    machine.register(CombatPhase::CalculatingDamage, Box::new(CalculatingDamageHandler));
    machine.register(CombatPhase::BattlePause, Box::new(BattlePauseHandler));
    machine.register(CombatPhase::BattleResume, Box::new(BattleResumeHandler));
    machine.register(CombatPhase::BattleEnd, Box::new(BattleEndHandler));
    for phase in [CombatPhase::Victory, CombatPhase::Defeat, CombatPhase::Draw] {
        machine.register(phase, Box::new(TerminalHandler::new(phase)));
    }
}
