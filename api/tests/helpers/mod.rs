pub mod app;

pub use app::{bearer, create_staff, get_json_body, make_test_app, request};
