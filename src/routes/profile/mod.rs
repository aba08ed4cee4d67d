mod handler;

pub(crate) use handler::load_active_pointer;
pub use handler::{
    delete_profile,
    get_active_profile,
    get_profile,
    list_profiles,
    put_active_profile,
    put_profile
};
