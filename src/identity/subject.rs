use super::Principal;

/// Per-request authentication result for one realm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subject {
    pub principal: Option<Principal>,
}

impl Subject {
    pub fn anonymous() -> Self { Self { principal: None } }

    pub fn authenticated(principal: Principal) -> Self { Self { principal: Some(principal) } }

    pub fn is_anonymous(&self) -> bool { self.principal.is_none() }

    pub fn principal(&self) -> Option<&Principal> { self.principal.as_ref() }
}
