use clap::Parser;
use combat_content::Archetype;
use combat_core::{CombatConfig, CombatMode};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum Mode {
    RealTime,
    TurnBased,
}

impl From<Mode> for CombatMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::RealTime => CombatMode::RealTime,
            Mode::TurnBased => CombatMode::TurnBased,
        }
    }
}

/// Run one AI-versus-AI encounter and log it.
#[derive(Debug, Parser)]
#[command(name = "combat-sim")]
#[command(about = "Headless combat simulator", long_about = None)]
#[command(version)]
pub struct SimArgs {
    /// Seed for every random roll.
    #[arg(long, env = "COMBAT_SEED", default_value_t = CombatConfig::DEFAULT_SEED)]
    pub seed: u64,

    #[arg(long, env = "COMBAT_MODE", value_enum, default_value_t = Mode::RealTime)]
    pub mode: Mode,

    /// Upper bound on ticks before giving up.
    #[arg(long, env = "COMBAT_TICKS", default_value_t = 2_000)]
    pub ticks: u64,

    /// Seconds per tick.
    #[arg(long, env = "COMBAT_DT", default_value_t = 0.1)]
    pub dt: f64,

    /// Player party, e.g. `warrior,mage`.
    #[arg(long, env = "COMBAT_HEROES", value_delimiter = ',', default_value = "warrior,mage")]
    pub heroes: Vec<Archetype>,

    /// Enemy party, e.g. `goblin,goblin_shaman`.
    #[arg(long, env = "COMBAT_ENEMIES", value_delimiter = ',', default_value = "goblin,goblin,goblin_shaman")]
    pub enemies: Vec<Archetype>,

    /// Starting gap between the two parties.
    #[arg(long, default_value_t = 6.0)]
    pub distance: f64,

    /// Seconds a turn-based round lasts for effect upkeep.
    #[arg(long, default_value_t = CombatConfig::DEFAULT_TURN_DURATION)]
    pub turn_duration: f64,

    /// Print the final report to stdout.
    #[arg(long)]
    pub summary: bool,
}

impl SimArgs {
    pub fn config(&self) -> CombatConfig {
        CombatConfig::default()
            .with_seed(self.seed)
            .with_mode(self.mode.into())
            .with_turn_duration(self.turn_duration)
    }
}
