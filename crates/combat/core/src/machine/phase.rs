use std::fmt;

/// Phase of one combat encounter.
///
/// Built-in phases cover the whole battle flow; `Custom` names phases a
/// game registers on top of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CombatPhase {
    BattleStart,
    BattleActive,
    PlayerTurn,
    EnemyTurn,
    SkillCasting,
    SkillExecuting,
    CalculatingDamage,
    BattlePause,
    BattleResume,
    BattleEnd,
    Victory,
    Defeat,
    Draw,
    Custom(&'static str),
}

impl CombatPhase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat | Self::Draw)
    }

    /// Phases a pause may interrupt.
    pub const fn is_active_branch(self) -> bool {
        matches!(
            self,
            Self::BattleActive
                | Self::PlayerTurn
                | Self::EnemyTurn
                | Self::SkillCasting
                | Self::SkillExecuting
                | Self::CalculatingDamage
        )
    }

    pub const fn is_turn(self) -> bool {
        matches!(self, Self::PlayerTurn | Self::EnemyTurn)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BattleStart => "battle_start",
            Self::BattleActive => "battle_active",
            Self::PlayerTurn => "player_turn",
            Self::EnemyTurn => "enemy_turn",
            Self::SkillCasting => "skill_casting",
            Self::SkillExecuting => "skill_executing",
            Self::CalculatingDamage => "calculating_damage",
            Self::BattlePause => "battle_pause",
            Self::BattleResume => "battle_resume",
            Self::BattleEnd => "battle_end",
            Self::Victory => "victory",
            Self::Defeat => "defeat",
            Self::Draw => "draw",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for CombatPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
