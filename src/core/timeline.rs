use super::state::{Ticks, Tier};
use crate::sim::JobId;

/// One executed slice of the Gantt chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub job: JobId,
    pub tier: Tier,
    pub start: Ticks,
    pub end: Ticks,
}

impl Slice {
    pub fn duration(&self) -> Ticks {
        self.end - self.start
    }
}

/// Append-only, chronological record of executed slices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    slices: Vec<Slice>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, slice: Slice) {
        debug_assert!(slice.start < slice.end, "Empty slice {slice:?}");
        debug_assert!(
            self.slices.last().is_none_or(|last| last.end <= slice.start),
            "Slice {slice:?} overlaps the previous one"
        );
        self.slices.push(slice);
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slice> {
        self.slices.iter()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    // Idle ticks are gaps between slices and do not count
    pub fn busy_time(&self) -> Ticks {
        self.slices.iter().map(Slice::duration).sum()
    }

    pub fn slices_of(&self, job: JobId) -> impl Iterator<Item = &Slice> + '_ {
        self.slices.iter().filter(move |slice| slice.job == job)
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Slice;
    type IntoIter = std::slice::Iter<'a, Slice>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.iter()
    }
}
