mod health;
mod index;
mod map;
mod sessions;

pub use health::health_check;
pub use index::index_page;
pub use map::{get_features, get_map};
pub use sessions::{
    create_session, delete_session, get_selection, get_session, post_message, put_shape,
};
