use behavior_tree::{Behavior, Status, TIME_EPSILON, Wait};

use crate::ai::AiContext;
use crate::attributes::AttributeKind;
use crate::skill::UseOutcome;
use crate::types::{SkillId, Tick};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetSelection {
    Nearest,
    LowestHealth,
}

/// Stateful AI leaves. Progress lives in the variant and clears on reset.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Wait(Wait),
    /// Picks a living enemy; fails when none is left.
    SelectTarget(TargetSelection),
    /// Walks toward the current target at `MoveSpeed` until within
    /// `stop_range`. Fails when rooted, stunned or without a target.
    MoveToward { stop_range: f64 },
    /// Uses a skill on the current target. `Running` while the cast is in
    /// flight; `Failure` if the request is refused or the cast is broken.
    UseSkill { skill: SkillId, started: Option<Tick> },
}

impl Action {
    pub fn wait(seconds: f64) -> Self {
        Self::Wait(Wait::new(seconds))
    }

    pub fn use_skill(skill: impl Into<SkillId>) -> Self {
        Self::UseSkill {
            skill: skill.into(),
            started: None,
        }
    }

    pub fn tick(&mut self, ctx: &mut AiContext<'_>) -> Status {
        match self {
            Self::Wait(wait) => wait.tick(ctx),
            Self::SelectTarget(selection) => select_target(*selection, ctx),
            Self::MoveToward { stop_range } => move_toward(*stop_range, ctx),
            Self::UseSkill { skill, started } => use_skill(skill, started, ctx),
        }
    }

    pub fn tracks_cast(&self, skill: &SkillId) -> bool {
        matches!(self, Self::UseSkill { skill: own, started: Some(_) } if own == skill)
    }

    pub fn reset(&mut self) {
        match self {
            Self::Wait(wait) => Behavior::<AiContext<'_>>::reset(wait),
            Self::UseSkill { started, .. } => *started = None,
            Self::SelectTarget(_) | Self::MoveToward { .. } => {}
        }
    }
}

fn select_target(selection: TargetSelection, ctx: &mut AiContext<'_>) -> Status {
    let Some(origin) = ctx.me().map(|me| me.position) else {
        return Status::Failure;
    };
    let chosen = {
        let enemies = ctx.enemies();
        let scored = enemies.iter().map(|e| {
            let score = match selection {
                TargetSelection::Nearest => origin.distance(&e.position),
                TargetSelection::LowestHealth => e.attributes.peek(AttributeKind::Health),
            };
            (e.id, score)
        });
        // strict comparison keeps the earliest candidate on ties
        scored
            .fold(None, |best: Option<(_, f64)>, (id, score)| match best {
                Some((_, best_score)) if best_score <= score => best,
                _ => Some((id, score)),
            })
            .map(|(id, _)| id)
    };

    if let Some(me) = ctx.me_mut() {
        me.ai_target = chosen;
    }
    Status::from_bool(chosen.is_some())
}

fn move_toward(stop_range: f64, ctx: &mut AiContext<'_>) -> Status {
    let Some(target) = ctx.target().map(|t| t.position) else {
        return Status::Failure;
    };
    let dt = ctx.dt;
    let Some(me) = ctx.me_mut() else {
        return Status::Failure;
    };

    let distance = me.position.distance(&target);
    if distance <= stop_range + TIME_EPSILON {
        return Status::Success;
    }
    if !me.effects.control_flags().can_move() {
        return Status::Failure;
    }
    let speed = me.attributes.get_value(AttributeKind::MoveSpeed);
    if speed <= 0.0 {
        return Status::Failure;
    }

    let step = (speed * dt).min(distance - stop_range);
    me.position = me.position.step_toward(&target, step);
    if me.position.distance(&target) <= stop_range + TIME_EPSILON {
        Status::Success
    } else {
        Status::Running
    }
}

fn use_skill(skill: &SkillId, started: &mut Option<Tick>, ctx: &mut AiContext<'_>) -> Status {
    if let Some(since) = *started {
        let Some(me) = ctx.me() else {
            *started = None;
            return Status::Failure;
        };
        let casting = me
            .cast
            .as_ref()
            .is_some_and(|cast| &cast.commitment.skill == skill);
        if casting {
            return Status::Running;
        }
        let resolved = me.skill(skill).is_some_and(|s| s.resolved_since(since));
        *started = None;
        return Status::from_bool(resolved);
    }

    let target = ctx.me().and_then(|me| me.ai_target);
    match ctx.world.use_skill(ctx.entity, skill, target, false) {
        Ok(UseOutcome::Resolved(_)) | Ok(UseOutcome::Whiffed) => Status::Success,
        Ok(UseOutcome::Casting { .. }) => {
            *started = Some(ctx.world.clock());
            Status::Running
        }
        Err(err) => {
            tracing::debug!(entity = %ctx.entity, %skill, error = %err, "ai skill refused");
            Status::Failure
        }
    }
}
