//! Hierarchical state machine plumbing
//!
//! States are plain enums with an explicit static parent table; an event
//! unhandled in a leaf state is retried against its parents until some
//! state consumes it or the chain runs out. Transitions computed here
//! give each entity the exit/entry sequences to run, so shared exit
//! behavior (a super-state's cleanup hook) fires on *every* path out,
//! no virtual dispatch involved.

/// A state in some entity's hierarchy
pub trait StateId: Copy + Eq + std::fmt::Debug {
    /// The immediate super-state, or `None` at the hierarchy root
    fn parent(self) -> Option<Self>;
}

/// What a state's handler did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction<S> {
    /// Consumed, no state change
    Handled,
    /// Not my signal; retry against my parent
    Ignored,
    /// Consumed, leave for this (possibly distant) state
    Transition(S),
}

/// The ancestor chain of `state`, leaf first, root last, inclusive
fn chain<S: StateId>(state: S) -> Vec<S> {
    let mut out = vec![state];
    let mut cur = state;
    while let Some(p) = cur.parent() {
        out.push(p);
        cur = p;
    }
    out
}

/// Compute the exit and entry sequences for a transition
///
/// Returns `(exits, entries)`: `exits` is leaf-first from `from` up to
/// (excluding) the least common ancestor; `entries` is outermost-first
/// down to and including `to`. A self-transition exits and re-enters
/// the state (external-transition semantics).
pub fn transition_path<S: StateId>(from: S, to: S) -> (Vec<S>, Vec<S>) {
    let from_chain = chain(from);
    let to_chain = chain(to);

    // Length of the shared suffix (common ancestors, root-aligned)
    let mut common = 0;
    while common < from_chain.len()
        && common < to_chain.len()
        && from_chain[from_chain.len() - 1 - common] == to_chain[to_chain.len() - 1 - common]
    {
        common += 1;
    }
    if from == to && common > 0 {
        common -= 1;
    }

    let exits = from_chain[..from_chain.len() - common].to_vec();
    let mut entries = to_chain[..to_chain.len() - common].to_vec();
    entries.reverse();
    (exits, entries)
}
