//! Admin options for the user model and the registry they live in.

mod changelist;
mod options;
mod site;

pub use changelist::ChangeListParams;
pub use options::{
    ADDRESS_INLINE, Fieldset, GROUP_ADMIN, InlineSpec, InlineStyle, ModelAdminSpec, USER_ADMIN,
};
pub use site::{AdminSite, RegistryError};

use serde_json::{Map, Value};

/// Registers the user admin and drops the built-in group admin. Called once
/// during startup.
pub fn setup(site: &mut AdminSite) -> Result<(), RegistryError> {
    site.register(&USER_ADMIN)?;
    site.unregister(&GROUP_ADMIN.label())?;
    tracing::info!(
        models = ?site.registered().map(|spec| spec.label()).collect::<Vec<_>>(),
        "admin site configured"
    );
    Ok(())
}

/// Picks `fields` out of a serialized row. Unknown names map to `null`.
pub fn project(row: &Value, fields: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .map(|field| {
            let value = row.get(*field).cloned().unwrap_or(Value::Null);
            ((*field).to_string(), value)
        })
        .collect()
}
