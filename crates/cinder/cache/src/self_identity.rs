//! The local actor's own identity

use cinder_types::{SelfUser, Snowflake};
use parking_lot::Mutex;

/// Single-owner slot for the local actor.
///
/// Written once by the READY handler and read from every concurrent context
/// afterwards. Each get or set holds the lock for the whole copy.
#[derive(Debug, Default)]
pub struct SelfIdentity {
    user: Mutex<Option<SelfUser>>,
}

impl SelfIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<SelfUser> {
        self.user.lock().clone()
    }

    /// Replaces the identity, returning the previous one.
    pub fn set(&self, user: SelfUser) -> Option<SelfUser> {
        self.user.lock().replace(user)
    }

    pub fn id(&self) -> Option<Snowflake> {
        self.user.lock().as_ref().map(SelfUser::id)
    }

    pub fn is(&self, user_id: Snowflake) -> bool {
        self.id() == Some(user_id)
    }

    pub fn clear(&self) -> Option<SelfUser> {
        self.user.lock().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_types::User;

    #[test]
    fn set_returns_previous_identity() {
        let slot = SelfIdentity::new();
        assert!(slot.get().is_none());

        let first = SelfUser {
            user: User::new(Snowflake::new(1), "first"),
            ..SelfUser::default()
        };
        assert!(slot.set(first.clone()).is_none());
        assert!(slot.is(Snowflake::new(1)));

        let second = SelfUser {
            user: User::new(Snowflake::new(2), "second"),
            ..SelfUser::default()
        };
        assert_eq!(slot.set(second).map(|u| u.id()), Some(Snowflake::new(1)));
        assert_eq!(slot.id(), Some(Snowflake::new(2)));
    }
}
