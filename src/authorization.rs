//! Role-based access rules.
//!
//! Two roles. Any signed-in account can work with patients, appointments,
//! medical records and search; the doctor roster is admin-only for writes.
//! Default-deny: a permission not listed for a role is refused.

use crate::models::enums::Role;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Read any clinic data, run searches.
    ViewClinicData,
    /// Create, edit and delete patients, appointments and medical records.
    EditClinicData,
    /// Create, edit and delete doctors.
    ManageDoctors,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViewClinicData => "view_clinic_data",
            Self::EditClinicData => "edit_clinic_data",
            Self::ManageDoctors => "manage_doctors",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Role '{}' lacks permission '{}'", role.as_str(), permission.as_str())]
    Forbidden { role: Role, permission: Permission },
}

// ═══════════════════════════════════════════════════════════
// Checks
// ═══════════════════════════════════════════════════════════

pub fn is_allowed(role: Role, permission: Permission) -> bool {
    match role {
        Role::Admin => true,
        Role::User => matches!(
            permission,
            Permission::ViewClinicData | Permission::EditClinicData
        ),
    }
}

pub fn require(role: Role, permission: Permission) -> Result<(), AuthorizationError> {
    if is_allowed(role, permission) {
        Ok(())
    } else {
        Err(AuthorizationError::Forbidden { role, permission })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_every_permission() {
        for p in [
            Permission::ViewClinicData,
            Permission::EditClinicData,
            Permission::ManageDoctors,
        ] {
            assert!(is_allowed(Role::Admin, p));
        }
    }

    #[test]
    fn user_cannot_manage_doctors() {
        assert!(is_allowed(Role::User, Permission::ViewClinicData));
        assert!(is_allowed(Role::User, Permission::EditClinicData));
        assert_eq!(
            require(Role::User, Permission::ManageDoctors),
            Err(AuthorizationError::Forbidden {
                role: Role::User,
                permission: Permission::ManageDoctors,
            })
        );
    }

    #[test]
    fn forbidden_message_names_role_and_permission() {
        let err = require(Role::User, Permission::ManageDoctors).unwrap_err();
        assert_eq!(err.to_string(), "Role 'user' lacks permission 'manage_doctors'");
    }
}
