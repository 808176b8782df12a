use crate::init_step::InitializeStep;

use std::fmt;

/// Steps ordered by ascending priority.
///
/// Ordering is a stable sort, so steps with equal priority keep the order in
/// which they were supplied.
pub struct StepSequence {
    steps: Vec<Box<dyn InitializeStep>>,
}

impl StepSequence {
    pub fn new(mut steps: Vec<Box<dyn InitializeStep>>) -> Self {
        steps.sort_by_key(|step| step.priority());
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn InitializeStep> {
        self.steps.iter().map(|step| step.as_ref())
    }

    /// `(priority, summary)` for every step, in setup order.
    pub fn summaries(&self) -> Vec<(i32, String)> {
        self.iter()
            .map(|step| (step.priority(), step.summary().to_string()))
            .collect()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut (dyn InitializeStep + 'static)> {
        self.steps.get_mut(index).map(|step| step.as_mut())
    }
}

impl FromIterator<Box<dyn InitializeStep>> for StepSequence {
    fn from_iter<I: IntoIterator<Item = Box<dyn InitializeStep>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Debug for StepSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.summaries()).finish()
    }
}
