use crate::Step;

/// The stages of one turn, run front to back.
pub struct Workflow<S: Clone + 'static> {
    name: &'static str,
    stages: Vec<Box<dyn Step<S>>>,
}

impl<S: Clone + 'static> Workflow<S> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            stages: Vec::new(),
        }
    }

    /// Append a stage after the ones already added.
    pub fn then<T: Step<S>>(mut self, stage: T) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stage names in run order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub(crate) fn stages_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Step<S>>> {
        self.stages.iter_mut()
    }
}
