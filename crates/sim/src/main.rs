//! Headless encounter runner.
//!
//! Spawns two parties from content archetypes, lets their AI fight it out
//! and logs the event stream and final report. Run with
//! `RUST_LOG=debug` to see per-entity decisions.

mod args;
mod log;

use anyhow::{Context, Result, bail};
use clap::Parser;
use combat_content::{Archetype, standard_library};
use combat_core::{CombatEngine, EntityId, EntityStore, Faction, Position};

use args::SimArgs;
use log::TracingPresentation;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = SimArgs::parse();
    run(&args)
}

/// Lines a party up in a column at `x`.
fn spawn_party(store: &mut EntityStore, party: &[Archetype], faction: Faction, x: f64) -> Vec<EntityId> {
    party
        .iter()
        .enumerate()
        .map(|(i, archetype)| {
            let name = format!("{archetype}#{}", i + 1);
            let position = Position::new(x, i as f64 * 2.0);
            store.spawn(archetype.build_ai(name, faction, position))
        })
        .collect()
}

fn run(args: &SimArgs) -> Result<()> {
    if args.heroes.is_empty() || args.enemies.is_empty() {
        bail!("both parties need at least one member");
    }
    if args.dt.is_nan() || args.dt <= 0.0 {
        bail!("dt must be positive, got {}", args.dt);
    }

    let mut store = EntityStore::new();
    let heroes = spawn_party(&mut store, &args.heroes, Faction::PLAYER, 0.0);
    let enemies = spawn_party(&mut store, &args.enemies, Faction::ENEMY, args.distance);

    let config = args.config();
    let mode = config.mode;
    let mut engine = CombatEngine::new(Box::new(store), standard_library(), config)
        .with_presentation(Box::new(TracingPresentation));

    let combat = engine
        .start_combat(vec![heroes, enemies])
        .context("failed to start combat")?;
    tracing::info!(combat = combat.0, ?mode, seed = args.seed, "simulation started");

    for _ in 0..args.ticks {
        if engine.is_finished() {
            break;
        }
        engine.tick(args.dt).context("tick failed")?;
        let events = engine.drain_events();
        for event in &events {
            log::event(&*engine.world().registry, event);
        }
    }

    if !engine.is_finished() {
        tracing::warn!(ticks = args.ticks, "tick budget exhausted before a result");
    }

    let report = engine.finish().context("combat closed without a report")?;
    tracing::info!(
        result = %report.result,
        turns = report.turns,
        ticks = report.ended_at.0.saturating_sub(report.started_at.0),
        survivors = report.survivors.len(),
        "simulation finished"
    );
    if let Some(rewards) = &report.rewards {
        tracing::info!(
            recipients = rewards.recipients.len(),
            experience = rewards.experience_each,
            gold = rewards.gold_each,
            "rewards distributed"
        );
    }
    if args.summary {
        println!("{report:#?}");
    }
    Ok(())
}
