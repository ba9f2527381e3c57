use std::marker::PhantomData;

/// A named state transition. The payload and output types are what an
/// action committing it must pass and gets back.
pub trait Mutation<S> {
    const NAME: &'static str;
    type Payload;
    type Output;

    fn apply(state: &mut S, payload: Self::Payload) -> Self::Output;
}

/// Handed to actions; the only way they touch state is by committing.
pub struct ActionContext<'a, S> {
    state: &'a mut S,
}

impl<'a, S> ActionContext<'a, S> {
    pub fn state(&self) -> &S {
        self.state
    }

    pub fn commit<M: Mutation<S>>(&mut self, payload: M::Payload) -> M::Output {
        tracing::trace!(mutation = M::NAME, "Commit");
        M::apply(self.state, payload)
    }
}

/// The actions registered for a module, by name.
pub trait Actions<S> {
    fn names(&self) -> &'static [&'static str];
}

pub struct Store<S, A> {
    state: S,
    actions: A,
}

impl<S, A: Actions<S>> Store<S, A> {
    pub fn new(state: S, actions: A) -> Self {
        Store { state, actions }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn actions(&self) -> &A {
        &self.actions
    }

    pub fn context(&mut self) -> ActionContext<'_, S> {
        ActionContext {
            state: &mut self.state,
        }
    }

    pub fn commit<M: Mutation<S>>(&mut self, payload: M::Payload) -> M::Output {
        self.context().commit::<M>(payload)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsersState {}

/// No actions are registered for users yet.
#[derive(Debug, Default)]
pub struct UserActions<S = UsersState>(PhantomData<S>);

impl<S> Actions<S> for UserActions<S> {
    fn names(&self) -> &'static [&'static str] {
        &[]
    }
}

pub type UsersStore = Store<UsersState, UserActions>;

impl Default for UsersStore {
    fn default() -> Self {
        Store::new(UsersState::default(), UserActions::default())
    }
}
