// storefront/src/models/mod.rs

//! Entities held by the store.

pub mod course;
pub mod course_list;
pub mod delivery;
pub mod order;
pub mod session;
pub mod snapshot;
pub mod user;

pub use course::{sum_cents, Comment, Course, CourseDraft, CourseEdit, MAX_PRICE_CENTS};
pub use course_list::{CourseList, ListKind};
pub use delivery::{known_delivery_point, DELIVERY_POINTS};
pub use order::{Order, OrderLine, OrderSummary};
pub use session::Session;
pub use snapshot::CourseSnapshot;
pub use user::{Role, User};
