mod health;
mod redirect;
mod url;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use url::{create_url_handler, delete_url_handler, get_url_handler, update_url_handler};
