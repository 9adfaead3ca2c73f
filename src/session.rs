use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Who is talking to the service and what they are doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Guest,
    Admin { editing: Option<Uuid> },
}

impl Session {
    pub fn login() -> Self {
        Session::Admin { editing: None }
    }

    pub fn logout(self) -> Self {
        Session::Guest
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Session::Admin { .. })
    }

    pub fn editing(&self) -> Option<Uuid> {
        match self {
            Session::Admin { editing } => *editing,
            Session::Guest => None,
        }
    }

    pub fn begin_edit(self, item_id: Uuid) -> Result<Self, AppError> {
        match self {
            Session::Admin { .. } => Ok(Session::Admin {
                editing: Some(item_id),
            }),
            Session::Guest => Err(AppError::Unauthorized),
        }
    }

    pub fn end_edit(self) -> Result<Self, AppError> {
        match self {
            Session::Admin { .. } => Ok(Session::Admin { editing: None }),
            Session::Guest => Err(AppError::Unauthorized),
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            role: if self.is_admin() { "admin" } else { "guest" }.to_string(),
            editing_item_id: self.editing(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    pub role: String,
    pub editing_item_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_cannot_begin_editing() {
        let err = Session::Guest.begin_edit(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn admin_edit_cycle() {
        let id = Uuid::new_v4();
        let session = Session::login().begin_edit(id).unwrap();
        assert_eq!(session.editing(), Some(id));
        let session = session.end_edit().unwrap();
        assert_eq!(session, Session::Admin { editing: None });
    }

    #[test]
    fn logout_clears_editing() {
        let session = Session::login().begin_edit(Uuid::new_v4()).unwrap();
        let session = session.logout();
        assert_eq!(session, Session::Guest);
        assert_eq!(session.editing(), None);
        assert_eq!(session.view().role, "guest");
    }
}
