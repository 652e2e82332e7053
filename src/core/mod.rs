pub mod attribute;
pub mod dialogue;
pub mod diagnostics;
pub mod loader;
pub mod predicate;
pub mod save;
pub mod session;
