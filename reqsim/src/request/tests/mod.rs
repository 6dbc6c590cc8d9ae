mod uri;

use super::*;
use static_assertions::assert_impl_all;

assert_impl_all!(Request: Send, Sync, Clone);
assert_impl_all!(Method: Send, Sync, Copy);

fn request(builder: &EnvironmentBuilder) -> Request {
    Request::from_builder(builder).unwrap()
}
