//! # Tether Client
//! Concrete remote-resource proxies built on the tether-shared engine:
//! members and checklist items, each a canonical one-instance-per-ID proxy
//! with validated write-through fields.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod check_item;
mod member;


pub use check_item::{CheckItem, CheckItemState};
pub use member::{Member, MemberStatus};
