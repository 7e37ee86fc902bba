use crate::error::Result;

/// Entities whose fields can be checked after construction or deserialization.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Anything that can report the `(min, max)` corners of a box enclosing it.
pub trait BoundingBox {
    type Point;
    fn bounding_box(&self) -> (Self::Point, Self::Point);
}
