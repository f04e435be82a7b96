mod test_app;

pub use test_app::{ADMIN, ALICE, BOB, TestApp};
