use crate::types::{EntityId, SkillId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CueStage {
    /// Costs committed, cast started.
    Cast,
    /// Landed on a target.
    Impact,
    /// Cast broken off before resolving.
    Interrupted,
}

/// Fire-and-forget request for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresentationCue {
    pub stage: CueStage,
    pub skill: SkillId,
    pub caster: EntityId,
    pub target: Option<EntityId>,
    pub animation: Option<String>,
    pub vfx: Option<String>,
    pub sfx: Option<String>,
}

/// Receives presentation cues. The core never waits on, or reads back
/// from, the sink.
pub trait PresentationSink: Send {
    fn cue(&mut self, cue: PresentationCue);
}

/// Discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresentation;

impl PresentationSink for NullPresentation {
    fn cue(&mut self, _cue: PresentationCue) {}
}

/// Keeps cues in order; handy for headless runs and tests.
#[derive(Clone, Debug, Default)]
pub struct CueLog {
    pub cues: Vec<PresentationCue>,
}

impl PresentationSink for CueLog {
    fn cue(&mut self, cue: PresentationCue) {
        self.cues.push(cue);
    }
}
