//! Types - Records managed by Cumulus
//!
//! TigerStyle: Plain data, explicit ownership, closed sums over open interfaces.
//!
//! `User` and `Group` are the only things that can sit inside a group. Rather
//! than an open interface, membership is the closed sum [`Member`], and the
//! relational engine persists its discriminant as [`MemberKind`].

mod group;
mod member;
mod project;
mod session;
mod team;
mod user;

pub use group::{Group, GroupBuilder};
pub use member::{Member, MemberKind, MemberRef};
pub use project::Project;
pub use session::Session;
pub use team::Team;
pub use user::{User, UserBuilder};
