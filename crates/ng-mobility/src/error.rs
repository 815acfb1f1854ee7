use ng_core::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("route for {0} has no nodes")]
    EmptyRoute(ObjectId),

    #[error("route for {object} has {nodes} nodes but {edges} edges")]
    MalformedRoute {
        object: ObjectId,
        nodes:  usize,
        edges:  usize,
    },
}

pub type MobilityResult<T> = Result<T, MobilityError>;
