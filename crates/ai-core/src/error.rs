use thiserror::Error;

use crate::WsProp;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldStateError {
    #[error("world state property `{0}` is not set")]
    PropertyNotSet(WsProp),
}
