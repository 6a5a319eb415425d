//! Camera navigation: the damped orbit/pan/zoom controller and the fly-to
//! animator that drives camera transitions to selected halos.

pub mod fly_to;
pub mod orbit;

pub use fly_to::{EasingFunction, FlyTo, FlyToAnimator};
pub use orbit::OrbitCamera;
