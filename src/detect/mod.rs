mod filter;
mod result;
mod select;

pub use filter::{filter_obstacles, FilteredObstacle};
pub use result::{BoundingBox, Detection, ObjectClass};
pub use select::select_obstacle;
