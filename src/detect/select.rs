use crate::detect::filter::FilteredObstacle;

/// Pick the obstacle with the largest box area as the proximity proxy.
///
/// Equal areas keep the first occurrence so the choice is deterministic.
pub fn select_obstacle(obstacles: &[FilteredObstacle]) -> Option<&FilteredObstacle> {
    let mut best: Option<&FilteredObstacle> = None;
    for obstacle in obstacles {
        match best {
            Some(current) if obstacle.area <= current.area => {}
            _ => best = Some(obstacle),
        }
    }
    best
}
