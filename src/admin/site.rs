use std::collections::BTreeMap;

use thiserror::Error;

use super::options::{GROUP_ADMIN, ModelAdminSpec};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Model already registered: {0}")]
    AlreadyRegistered(String),
    #[error("Model is not registered: {0}")]
    NotRegistered(String),
}

/// Models exposed through the admin, keyed by `app_label.model_name`.
#[derive(Debug, Clone, Default)]
pub struct AdminSite {
    registry: BTreeMap<String, &'static ModelAdminSpec>,
}

impl AdminSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// A site as the framework hands it over: only the group admin.
    pub fn with_builtin_models() -> Self {
        let mut site = Self::new();
        site.registry.insert(GROUP_ADMIN.label(), &GROUP_ADMIN);
        site
    }

    pub fn register(&mut self, spec: &'static ModelAdminSpec) -> Result<(), RegistryError> {
        let label = spec.label();
        if self.registry.contains_key(&label) {
            return Err(RegistryError::AlreadyRegistered(label));
        }
        self.registry.insert(label, spec);
        Ok(())
    }

    pub fn unregister(&mut self, label: &str) -> Result<&'static ModelAdminSpec, RegistryError> {
        self.registry
            .remove(label)
            .ok_or_else(|| RegistryError::NotRegistered(label.to_string()))
    }

    pub fn get(&self, label: &str) -> Option<&'static ModelAdminSpec> {
        self.registry.get(label).copied()
    }

    pub fn is_registered(&self, label: &str) -> bool {
        self.registry.contains_key(label)
    }

    /// Sorted by label.
    pub fn registered(&self) -> impl Iterator<Item = &'static ModelAdminSpec> + '_ {
        self.registry.values().copied()
    }
}

#[cfg(test)]
mod tests {
    use crate::admin::options::{GROUP_ADMIN, USER_ADMIN};

    use super::{AdminSite, RegistryError};

    #[test]
    fn builtin_site_only_has_groups() {
        let site = AdminSite::with_builtin_models();
        let labels: Vec<_> = site.registered().map(|spec| spec.label()).collect();
        assert_eq!(labels, ["auth.group"]);
    }

    #[test]
    fn double_registration_is_rejected() {
        let mut site = AdminSite::new();
        site.register(&USER_ADMIN).expect("first registration");
        assert_eq!(
            site.register(&USER_ADMIN),
            Err(RegistryError::AlreadyRegistered("users.user".to_string()))
        );
    }

    #[test]
    fn unregistering_an_absent_model_fails() {
        let mut site = AdminSite::new();
        assert_eq!(
            site.unregister("auth.group").map(|spec| spec.label()),
            Err(RegistryError::NotRegistered("auth.group".to_string()))
        );

        site.register(&GROUP_ADMIN).expect("registration");
        assert!(site.unregister("auth.group").is_ok());
        assert!(site.get("auth.group").is_none());
    }
}
