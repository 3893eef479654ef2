//! Capability checks.
//!
//! All ownership and role rules live in [`authorize`], parameterised by who
//! is acting, what they want to do, and the resource they act on. Handlers
//! call it once instead of branching on roles themselves.

use crate::error::CoreError;
use crate::roles::{ROLE_ADMIN, ROLE_OWNER};
use crate::types::DbId;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub user_id: DbId,
    pub role: String,
}

impl Subject {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Something a subject may attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateAsset,
    ManageAsset,
    ViewBooking,
    ConfirmBooking,
    CancelBooking,
    CompleteBooking,
    PayBooking,
    ViewPayment,
    RefundPayment,
    ModifyReview,
}

impl Action {
    fn describe(self) -> &'static str {
        match self {
            Self::CreateAsset => "list assets",
            Self::ManageAsset => "manage this asset",
            Self::ViewBooking => "view this booking",
            Self::ConfirmBooking => "confirm this booking",
            Self::CancelBooking => "cancel this booking",
            Self::CompleteBooking => "complete this booking",
            Self::PayBooking => "pay for this booking",
            Self::ViewPayment => "view this payment",
            Self::RefundPayment => "refund this payment",
            Self::ModifyReview => "modify this review",
        }
    }
}

/// The thing being acted on, reduced to the ids that matter for access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Platform-level actions with no owning record.
    Platform,
    Asset {
        owner_id: DbId,
    },
    Booking {
        renter_id: DbId,
        owner_id: DbId,
        skipper_id: Option<DbId>,
    },
    Payment {
        payer_id: DbId,
        owner_id: DbId,
    },
    Review {
        author_id: DbId,
    },
}

/// Decide whether `subject` may perform `action` on `resource`.
///
/// Returns [`CoreError::Forbidden`] when denied. Action/resource pairs that
/// make no sense together are denied as well.
pub fn authorize(subject: &Subject, action: Action, resource: &Resource) -> Result<(), CoreError> {
    if is_allowed(subject, action, resource) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "You are not allowed to {}",
            action.describe()
        )))
    }
}

fn is_allowed(subject: &Subject, action: Action, resource: &Resource) -> bool {
    let me = subject.user_id;
    let admin = subject.is_admin();

    match (action, resource) {
        (Action::CreateAsset, Resource::Platform) => admin || subject.role == ROLE_OWNER,
        (Action::ManageAsset, Resource::Asset { owner_id }) => admin || *owner_id == me,

        (
            Action::ViewBooking,
            Resource::Booking {
                renter_id,
                owner_id,
                skipper_id,
            },
        ) => admin || *renter_id == me || *owner_id == me || *skipper_id == Some(me),
        (Action::ConfirmBooking, Resource::Booking { owner_id, .. }) => admin || *owner_id == me,
        (Action::CancelBooking, Resource::Booking { renter_id, .. }) => *renter_id == me,
        (Action::CompleteBooking, Resource::Booking { .. }) => admin,
        (Action::PayBooking, Resource::Booking { renter_id, .. }) => *renter_id == me,

        (Action::ViewPayment, Resource::Payment { payer_id, owner_id }) => {
            admin || *payer_id == me || *owner_id == me
        }
        (Action::RefundPayment, Resource::Payment { owner_id, .. }) => admin || *owner_id == me,
        (Action::ModifyReview, Resource::Review { author_id }) => *author_id == me,

        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ROLE_RENTER, ROLE_SKIPPER};
    use assert_matches::assert_matches;

    fn subject(user_id: DbId, role: &str) -> Subject {
        Subject {
            user_id,
            role: role.to_string(),
        }
    }

    fn booking() -> Resource {
        Resource::Booking {
            renter_id: 1,
            owner_id: 2,
            skipper_id: Some(3),
        }
    }

    #[test]
    fn every_party_can_view_booking() {
        for id in [1, 2, 3] {
            assert!(authorize(&subject(id, ROLE_RENTER), Action::ViewBooking, &booking()).is_ok());
        }
        assert!(authorize(&subject(99, ROLE_ADMIN), Action::ViewBooking, &booking()).is_ok());
    }

    #[test]
    fn stranger_cannot_view_booking() {
        assert_matches!(
            authorize(&subject(4, ROLE_RENTER), Action::ViewBooking, &booking()),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn only_owner_or_admin_confirms() {
        assert!(authorize(&subject(2, ROLE_OWNER), Action::ConfirmBooking, &booking()).is_ok());
        assert!(authorize(&subject(50, ROLE_ADMIN), Action::ConfirmBooking, &booking()).is_ok());
        assert!(authorize(&subject(1, ROLE_RENTER), Action::ConfirmBooking, &booking()).is_err());
        assert!(authorize(&subject(3, ROLE_SKIPPER), Action::ConfirmBooking, &booking()).is_err());
    }

    #[test]
    fn only_renter_cancels() {
        assert!(authorize(&subject(1, ROLE_RENTER), Action::CancelBooking, &booking()).is_ok());
        assert!(authorize(&subject(2, ROLE_OWNER), Action::CancelBooking, &booking()).is_err());
        assert!(authorize(&subject(50, ROLE_ADMIN), Action::CancelBooking, &booking()).is_err());
    }

    #[test]
    fn only_admin_completes() {
        assert!(authorize(&subject(50, ROLE_ADMIN), Action::CompleteBooking, &booking()).is_ok());
        assert!(authorize(&subject(2, ROLE_OWNER), Action::CompleteBooking, &booking()).is_err());
    }

    #[test]
    fn asset_creation_requires_owner_role() {
        assert!(authorize(&subject(2, ROLE_OWNER), Action::CreateAsset, &Resource::Platform).is_ok());
        assert!(authorize(&subject(1, ROLE_RENTER), Action::CreateAsset, &Resource::Platform).is_err());
    }

    #[test]
    fn asset_management_requires_ownership() {
        let asset = Resource::Asset { owner_id: 2 };
        assert!(authorize(&subject(2, ROLE_OWNER), Action::ManageAsset, &asset).is_ok());
        assert!(authorize(&subject(5, ROLE_OWNER), Action::ManageAsset, &asset).is_err());
    }

    #[test]
    fn mismatched_resource_is_denied() {
        assert!(authorize(
            &subject(50, ROLE_ADMIN),
            Action::ConfirmBooking,
            &Resource::Asset { owner_id: 50 }
        )
        .is_err());
    }

    #[test]
    fn refunds_are_for_owner_or_admin() {
        let payment = Resource::Payment {
            payer_id: 1,
            owner_id: 2,
        };
        assert!(authorize(&subject(2, ROLE_OWNER), Action::RefundPayment, &payment).is_ok());
        assert!(authorize(&subject(50, ROLE_ADMIN), Action::RefundPayment, &payment).is_ok());
        assert!(authorize(&subject(1, ROLE_RENTER), Action::RefundPayment, &payment).is_err());
        assert!(authorize(&subject(1, ROLE_RENTER), Action::ViewPayment, &payment).is_ok());
    }

    #[test]
    fn review_author_only() {
        let review = Resource::Review { author_id: 7 };
        assert!(authorize(&subject(7, ROLE_RENTER), Action::ModifyReview, &review).is_ok());
        assert!(authorize(&subject(50, ROLE_ADMIN), Action::ModifyReview, &review).is_err());
    }
}
