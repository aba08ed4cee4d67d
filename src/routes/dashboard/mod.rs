mod handler;
mod model;

pub use handler::{get_active_profile_view, get_source, invalidate_cache};
pub use model::{ComposedProfile, ComposedZone};
