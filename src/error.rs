use thiserror::Error;

use crate::PlanError;

/// Error of [`chunked`](crate::chunked), generic over the decoder's error type.
#[derive(Debug, Error)]
pub enum Error<D> {
    #[error("failed to decode firmware image: {0}")]
    Decode(#[source] D),

    #[error(transparent)]
    Plan(#[from] PlanError),
}
