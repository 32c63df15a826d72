use log::warn;
use std::future::Future;

/// Applies a local change before the remote write and undoes it if the write
/// fails. `apply` returns whatever `revert` needs to restore the old state;
/// `write` sees the already-changed state and must copy what it sends.
pub async fn commit<S, U, T, E, A, R, W, Fut>(
    state: &mut S,
    apply: A,
    revert: R,
    write: W,
) -> Result<T, E>
where
    A: FnOnce(&mut S) -> U,
    R: FnOnce(&mut S, U),
    W: FnOnce(&S) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let undo = apply(state);

    match write(&*state).await {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!("remote write failed, reverting local change: {}", err);
            revert(state, undo);
            Err(err)
        }
    }
}
