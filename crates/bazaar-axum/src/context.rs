//! Request identity context.
//!
//! [`CurrentUser`] is inserted into request extensions by the
//! [`authenticate`](crate::authenticate) stage and nowhere else.

use std::ops::Deref;

use bazaar_types::PublicUser;

/// The authenticated caller, password excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser(pub PublicUser);

impl CurrentUser {
    /// Consume the wrapper
    #[must_use]
    pub fn into_inner(self) -> PublicUser {
        self.0
    }
}

impl Deref for CurrentUser {
    type Target = PublicUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
