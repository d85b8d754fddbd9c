use crate::error::Result;
use std::future::Future;

/// The one optimistic-command shape shared by every store: capture a
/// snapshot, apply the local mutation, attempt the durable write, and restore
/// the snapshot if the write fails. The caller surfaces the error.
///
/// Overlapping commands on the same state are not coordinated; a later
/// failure's rollback can clobber an earlier success (known hazard).
pub(crate) async fn run<S, O, Fut>(
    state: &mut S,
    apply: impl FnOnce(&mut S),
    durable: Fut,
) -> Result<O>
where
    S: Clone,
    Fut: Future<Output = Result<O>>,
{
    let snapshot = state.clone();
    apply(state);
    match durable.await {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            *state = snapshot;
            Err(err)
        }
    }
}
