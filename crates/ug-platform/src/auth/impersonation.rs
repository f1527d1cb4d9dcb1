//! Impersonation State Machine
//!
//! A session is either `Normal` or `Impersonating`. Entering while already
//! impersonating records the *current* acting user as the shadow, so nesting
//! collapses to a single hop: exiting returns to the last impersonator, not
//! the original administrator.
//!
//! Role checks happen before these transitions (see
//! [`checks::require_admin`](crate::shared::authorization::checks::require_admin)).

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Normal { user_id: i64 },
    Impersonating { acting_as: i64, shadowing: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ImpersonationError {
    #[error("Cannot impersonate yourself")]
    SelfImpersonation,

    #[error("Not in impersonation session")]
    NotImpersonating,
}

impl SessionState {
    pub fn from_claims(user_id: i64, shadowing_user_id: Option<i64>) -> Self {
        match shadowing_user_id {
            Some(shadowing) => SessionState::Impersonating { acting_as: user_id, shadowing },
            None => SessionState::Normal { user_id },
        }
    }

    pub fn acting_user_id(&self) -> i64 {
        match *self {
            SessionState::Normal { user_id } => user_id,
            SessionState::Impersonating { acting_as, .. } => acting_as,
        }
    }

    pub fn shadowing_user_id(&self) -> Option<i64> {
        match *self {
            SessionState::Normal { .. } => None,
            SessionState::Impersonating { shadowing, .. } => Some(shadowing),
        }
    }

    pub fn enter(self, target_user_id: i64) -> Result<SessionState, ImpersonationError> {
        let current = self.acting_user_id();
        if target_user_id == current {
            return Err(ImpersonationError::SelfImpersonation);
        }
        Ok(SessionState::Impersonating {
            acting_as: target_user_id,
            shadowing: current,
        })
    }

    pub fn exit(self) -> Result<SessionState, ImpersonationError> {
        match self {
            SessionState::Impersonating { shadowing, .. } => Ok(SessionState::Normal { user_id: shadowing }),
            SessionState::Normal { .. } => Err(ImpersonationError::NotImpersonating),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_and_exit() {
        let state = SessionState::Normal { user_id: 1 }.enter(2).unwrap();
        assert_eq!(state, SessionState::Impersonating { acting_as: 2, shadowing: 1 });
        assert_eq!(state.exit().unwrap(), SessionState::Normal { user_id: 1 });
    }

    #[test]
    fn test_self_impersonation() {
        let result = SessionState::Normal { user_id: 42 }.enter(42);
        assert_eq!(result, Err(ImpersonationError::SelfImpersonation));

        let impersonating = SessionState::Impersonating { acting_as: 7, shadowing: 1 };
        assert_eq!(impersonating.enter(7), Err(ImpersonationError::SelfImpersonation));
    }

    #[test]
    fn test_exit_from_normal() {
        assert_eq!(
            SessionState::Normal { user_id: 1 }.exit(),
            Err(ImpersonationError::NotImpersonating)
        );
    }

    #[test]
    fn test_nested_enter_collapses_to_one_hop() {
        let state = SessionState::Normal { user_id: 1 }.enter(2).unwrap().enter(3).unwrap();
        assert_eq!(state, SessionState::Impersonating { acting_as: 3, shadowing: 2 });
        assert_eq!(state.exit().unwrap(), SessionState::Normal { user_id: 2 });
    }

    #[test]
    fn test_from_claims() {
        assert_eq!(SessionState::from_claims(4, None).shadowing_user_id(), None);
        let state = SessionState::from_claims(4, Some(1));
        assert_eq!(state.acting_user_id(), 4);
        assert_eq!(state.shadowing_user_id(), Some(1));
    }
}
