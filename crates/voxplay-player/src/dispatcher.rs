use voxplay_core::{Catalog, ControlAction, MatchResult, MatchTarget};

/// Where an applied action came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Provenance {
    /// A strategy resolved the transcript.
    Strategy { name: String, confidence: f64 },
    /// Nothing matched; the configured default action fired.
    Fallback,
}

/// What playback should do after one resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackUpdate {
    pub action: AppliedAction,
    pub index: usize,
    pub item_id: String,
    pub paused: bool,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedAction {
    Select,
    Advance,
    Retreat,
    Pause,
    Resume,
    Restart,
}

/// Sequential playback cursor. One per running instance; resolution outcomes
/// feed in, playback updates come out.
pub struct Dispatcher {
    index: usize,
    paused: bool,
    default_action: ControlAction,
}

impl Dispatcher {
    pub fn new(default_action: ControlAction) -> Self {
        Self {
            index: 0,
            paused: false,
            default_action,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Apply one resolution outcome against a catalog snapshot.
    ///
    /// Returns `None` when there is nothing to act on: empty catalog, or an
    /// item index that fell outside this snapshot.
    pub fn apply(
        &mut self,
        outcome: Option<MatchResult>,
        catalog: &Catalog,
    ) -> Option<PlaybackUpdate> {
        if catalog.is_empty() {
            tracing::debug!("catalog empty, dropping playback action");
            return None;
        }

        let (target, provenance) = match outcome {
            Some(result) => (
                result.target,
                Provenance::Strategy {
                    name: result.strategy,
                    confidence: result.confidence,
                },
            ),
            None => (MatchTarget::Control(self.default_action), Provenance::Fallback),
        };

        // The cursor may point past the end after a catalog shrink.
        if self.index >= catalog.len() {
            self.index = 0;
        }

        let action = match target {
            MatchTarget::Item(i) => {
                if catalog.get(i).is_none() {
                    tracing::warn!(index = i, "matched item missing from catalog snapshot");
                    return None;
                }
                self.index = i;
                self.paused = false;
                AppliedAction::Select
            }
            MatchTarget::Control(ControlAction::Advance) => {
                self.index = (self.index + 1) % catalog.len();
                self.paused = false;
                AppliedAction::Advance
            }
            MatchTarget::Control(ControlAction::Retreat) => {
                self.index = (self.index + catalog.len() - 1) % catalog.len();
                self.paused = false;
                AppliedAction::Retreat
            }
            MatchTarget::Control(ControlAction::Pause) => {
                self.paused = true;
                AppliedAction::Pause
            }
            MatchTarget::Control(ControlAction::Resume) => {
                self.paused = false;
                AppliedAction::Resume
            }
            MatchTarget::Control(ControlAction::Restart) => {
                self.index = 0;
                self.paused = false;
                AppliedAction::Restart
            }
        };

        let item_id = catalog.get(self.index)?.id.clone();
        Some(PlaybackUpdate {
            action,
            index: self.index,
            item_id,
            paused: self.paused,
            provenance,
        })
    }
}
