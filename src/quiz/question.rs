use rand::Rng;
use rand::seq::SliceRandom;

use crate::playlist::Track;

/// One round: the track being played and the choices shown for it.
#[derive(Debug, Clone)]
pub struct Question {
    choices: Vec<Track>,
    target_index: usize,
    answered: bool,
}

/// Outcome of checking a selected choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub correct: bool,
    /// Title of the track that was actually playing.
    pub target_title: String,
}

impl Question {
    /// Build a question around `playlist[target]` with `decoys` other tracks,
    /// drawn uniformly without replacement, and the target inserted at a
    /// uniformly random position.
    pub fn build<R: Rng + ?Sized>(
        playlist: &[Track],
        target: usize,
        decoys: usize,
        rng: &mut R,
    ) -> Self {
        let others: Vec<&Track> = playlist
            .iter()
            .filter(|t| !t.same_as(&playlist[target]))
            .collect();

        let mut choices: Vec<Track> = others
            .choose_multiple(rng, decoys.min(others.len()))
            .map(|t| (*t).clone())
            .collect();
        choices.shuffle(rng);

        let target_index = rng.gen_range(0..=choices.len());
        choices.insert(target_index, playlist[target].clone());

        Self {
            choices,
            target_index,
            answered: false,
        }
    }

    pub fn choices(&self) -> &[Track] {
        &self.choices
    }

    pub fn target(&self) -> &Track {
        &self.choices[self.target_index]
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub(super) fn mark_answered(&mut self) -> bool {
        !std::mem::replace(&mut self.answered, true)
    }

    /// Compare `choices[index]` with the target by id. `None` when `index`
    /// is out of range.
    pub fn check(&self, index: usize) -> Option<Answer> {
        let selected = self.choices.get(index)?;
        Some(Answer {
            correct: selected.same_as(self.target()),
            target_title: self.target().title.clone(),
        })
    }
}
