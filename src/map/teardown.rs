use log::debug;

type Action<M> = Box<dyn FnOnce(&mut M)>;

/// Cleanup actions registered while a map session is set up, run in
/// reverse registration order exactly once.
pub struct Teardown<M> {
    actions: Vec<(&'static str, Action<M>)>,
}

impl<M> Default for Teardown<M> {
    fn default() -> Self {
        Teardown {
            actions: Vec::new(),
        }
    }
}

impl<M> Teardown<M> {
    pub fn new() -> Self {
        Teardown::default()
    }

    pub fn push(&mut self, label: &'static str, action: impl FnOnce(&mut M) + 'static) {
        self.actions.push((label, Box::new(action)));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Runs and drops every registered action, newest first.
    pub fn run(&mut self, target: &mut M) -> usize {
        let count = self.actions.len();

        while let Some((label, action)) = self.actions.pop() {
            debug!("Teardown: {label}");
            action(target);
        }

        count
    }
}
