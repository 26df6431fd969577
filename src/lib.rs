/// Validated postal address value object, used by [`client`].
pub mod address;

/// Client entity: derived identity, audit timestamps, replaceable address.
pub mod client;

/// Account entity. Balance mutations are crate-private so they can only
/// happen inside the bank's transaction algorithm.
pub mod account;

/// Immutable transaction records, the audit trail of every balance movement.
pub mod transaction;

/// Injectable time source, so tests can pin audit timestamps.
pub mod clock;

/// Persistence seam (add/get/remove/list) plus the in-memory default.
pub mod repository;

/// The bank contract itself: the [`bank::Bank`] trait, its error taxonomy,
/// request/report types, and the in-memory implementation.
pub mod bank;

/// Report and record rendering (CSV, plain text). Strictly peripheral; the
/// contract only ever returns structured data.
pub mod render;
