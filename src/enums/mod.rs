//! Enumerated types.

mod confirmation_type;

pub use confirmation_type::ConfirmationType;
