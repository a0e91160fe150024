//! Generic finite state machine
//!
//! A machine owns exactly one current state plus the one it replaced. States
//! expose `enter`/`tick`/`exit` hooks over a caller-supplied context. A state
//! never swaps itself out directly; `tick` returns a [`Transition`] request
//! that the machine carries out after the hook returns.

/// What a state wants the machine to do after its tick
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<S> {
    Stay,
    To(S),
    /// Go back to the state that was current before this one
    Revert,
}

/// Behavior hooks for a state operating on context `C`
pub trait State<C: ?Sized>: Sized {
    /// One-shot setup when the state becomes current
    fn enter(&mut self, _ctx: &mut C) {}

    /// Per-frame logic
    fn tick(&mut self, ctx: &mut C, dt: f32) -> Transition<Self>;

    /// One-shot teardown when the state is replaced
    fn exit(&mut self, _ctx: &mut C) {}
}

#[derive(Debug, Clone)]
pub struct StateMachine<S> {
    current: Option<S>,
    previous: Option<S>,
}

impl<S> Default for StateMachine<S> {
    fn default() -> Self {
        Self {
            current: None,
            previous: None,
        }
    }
}

impl<S> StateMachine<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start in `initial` without running its enter hook
    pub fn with_state(initial: S) -> Self {
        Self {
            current: Some(initial),
            previous: None,
        }
    }

    pub fn current(&self) -> Option<&S> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&S> {
        self.previous.as_ref()
    }

    /// Exit the current state (if any), then enter `next`
    pub fn transition<C: ?Sized>(&mut self, mut next: S, ctx: &mut C)
    where
        S: State<C>,
    {
        if let Some(mut old) = self.current.take() {
            old.exit(ctx);
            self.previous = Some(old);
        }
        next.enter(ctx);
        self.current = Some(next);
    }

    /// Tick the current state and apply whatever transition it requests
    pub fn tick<C: ?Sized>(&mut self, ctx: &mut C, dt: f32)
    where
        S: State<C>,
    {
        let Some(state) = self.current.as_mut() else {
            return;
        };
        match state.tick(ctx, dt) {
            Transition::Stay => {}
            Transition::To(next) => self.transition(next, ctx),
            Transition::Revert => {
                self.revert(ctx);
            }
        }
    }

    /// Transition back to the remembered prior state
    ///
    /// Returns false (and changes nothing) when there is no prior state.
    pub fn revert<C: ?Sized>(&mut self, ctx: &mut C) -> bool
    where
        S: State<C>,
    {
        match self.previous.take() {
            Some(prev) => {
                self.transition(prev, ctx);
                true
            }
            None => false,
        }
    }
}
