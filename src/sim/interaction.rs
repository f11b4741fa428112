//! Chest targeting and the search dwell timer

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::geom::center_distance;

/// In-progress search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    /// Chest currently being searched
    pub target: Option<u32>,
    /// Frames of uninterrupted searching
    pub progress: u32,
}

/// Outcome of one frame of searching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStep {
    Idle,
    Searching,
    /// Movement or a released key wiped the progress
    Interrupted,
    /// Dwell reached on this chest
    Completed(u32),
}

/// Nearest unopened chest within `radius` of the player.
/// Ties go to the lowest id.
pub fn find_target(player: &Entity, actors: &[Entity], radius: f32) -> Option<u32> {
    let player_rect = player.body.rect();
    actors
        .iter()
        .filter(|e| e.is_searchable())
        .map(|e| (e.id, center_distance(&player_rect, &e.body.rect())))
        .filter(|(_, d)| *d <= radius)
        .min_by(|(ia, da), (ib, db)| da.total_cmp(db).then(ia.cmp(ib)))
        .map(|(id, _)| id)
}

impl SearchState {
    /// Percent complete for the HUD (0-100)
    pub fn percent(&self, duration: u32) -> u32 {
        if duration == 0 {
            return 0;
        }
        (self.progress.min(duration) * 100) / duration
    }

    fn reset(&mut self) -> SearchStep {
        let had_progress = self.progress > 0;
        self.progress = 0;
        if had_progress {
            SearchStep::Interrupted
        } else {
            SearchStep::Idle
        }
    }

    /// Advance one frame. Progress only builds while `holding` the search key
    /// with a `target` in range and no movement input.
    pub fn advance(
        &mut self,
        target: Option<u32>,
        holding: bool,
        moving: bool,
        duration: u32,
    ) -> SearchStep {
        if self.target != target {
            self.target = target;
            self.progress = 0;
        }
        let Some(chest) = target else {
            return self.reset();
        };
        if moving || !holding {
            return self.reset();
        }

        self.progress += 1;
        if self.progress >= duration {
            self.progress = 0;
            return SearchStep::Completed(chest);
        }
        SearchStep::Searching
    }
}
