use std::str::FromStr;

use sea_orm::Order;
use serde::Deserialize;

use crate::{
    auth::UserType, db::dao::UserListQuery, db::entities::user, error::AppError,
};

use super::options::ModelAdminSpec;

/// Query string of the user changelist.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChangeListParams {
    pub q: Option<String>,
    #[serde(rename = "is_superuser__exact")]
    pub is_superuser: Option<String>,
    #[serde(rename = "is_staff__exact")]
    pub is_staff: Option<String>,
    #[serde(rename = "user_type__exact")]
    pub user_type: Option<String>,
    pub o: Option<String>,
    /// Zero-based.
    pub p: Option<u64>,
}

impl ChangeListParams {
    pub fn page_index(&self) -> u64 {
        self.p.unwrap_or(0)
    }

    /// Translates the parameters into a DAO query, checking every name
    /// against the admin options.
    pub fn resolve(&self, spec: &ModelAdminSpec) -> Result<UserListQuery, AppError> {
        let search_columns = spec
            .search_fields
            .iter()
            .map(|field| column(field))
            .collect::<Result<Vec<_>, _>>()?;
        let search_terms = self
            .q
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let user_type = match self.user_type.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(
                UserType::try_from(raw)
                    .map_err(|()| {
                        AppError::bad_request(format!("Unknown user_type filter: {raw}"))
                    })?
                    .as_str()
                    .to_string(),
            ),
        };

        Ok(UserListQuery {
            search_terms,
            search_columns,
            is_superuser: flag("is_superuser__exact", self.is_superuser.as_deref())?,
            is_staff: flag("is_staff__exact", self.is_staff.as_deref())?,
            user_type,
            order: self.ordering(spec)?,
        })
    }

    fn ordering(&self, spec: &ModelAdminSpec) -> Result<(user::Column, Order), AppError> {
        let requested = self.o.as_deref().filter(|raw| !raw.is_empty());
        let raw = match requested {
            Some(raw) => {
                let name = raw.strip_prefix('-').unwrap_or(raw);
                if !spec.list_display.contains(&name) {
                    return Err(AppError::bad_request(format!("Cannot order by {name}")));
                }
                raw
            }
            None => spec.ordering.first().copied().unwrap_or("email"),
        };

        match raw.strip_prefix('-') {
            Some(name) => Ok((column(name)?, Order::Desc)),
            None => Ok((column(raw)?, Order::Asc)),
        }
    }
}

fn column(name: &str) -> Result<user::Column, AppError> {
    user::Column::from_str(name)
        .map_err(|_| AppError::internal(format!("Admin option names an unknown column: {name}")))
}

/// Filter flags accept `1`/`0` as well as `true`/`false`.
fn flag(name: &str, raw: Option<&str>) -> Result<Option<bool>, AppError> {
    match raw {
        None | Some("") => Ok(None),
        Some("1" | "true" | "True") => Ok(Some(true)),
        Some("0" | "false" | "False") => Ok(Some(false)),
        Some(other) => Err(AppError::bad_request(format!(
            "Invalid value for {name}: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Order;

    use crate::admin::options::USER_ADMIN;
    use crate::db::entities::user;

    use super::ChangeListParams;

    #[test]
    fn defaults_search_nothing_and_order_by_email() {
        let query = ChangeListParams::default()
            .resolve(&USER_ADMIN)
            .expect("defaults should resolve");

        assert!(query.search_terms.is_empty());
        assert_eq!(query.search_columns.len(), USER_ADMIN.search_fields.len());
        assert!(matches!(query.order, (user::Column::Email, Order::Asc)));
    }

    #[test]
    fn search_splits_on_whitespace_and_filters_parse() {
        let params = ChangeListParams {
            q: Some("  ann   smith ".to_string()),
            is_staff: Some("1".to_string()),
            is_superuser: Some("false".to_string()),
            user_type: Some("vendor".to_string()),
            o: Some("-last_name".to_string()),
            ..ChangeListParams::default()
        };
        let query = params.resolve(&USER_ADMIN).expect("params should resolve");

        assert_eq!(query.search_terms, ["ann", "smith"]);
        assert_eq!(query.is_staff, Some(true));
        assert_eq!(query.is_superuser, Some(false));
        assert_eq!(query.user_type.as_deref(), Some("vendor"));
        assert!(matches!(query.order, (user::Column::LastName, Order::Desc)));
    }

    #[test]
    fn ordering_is_limited_to_list_columns() {
        let params = ChangeListParams {
            o: Some("password_hash".to_string()),
            ..ChangeListParams::default()
        };
        let err = params.resolve(&USER_ADMIN).expect_err("hidden column");
        assert_eq!(err.message(), "Cannot order by password_hash");
    }

    #[test]
    fn unknown_filter_values_are_rejected() {
        let params = ChangeListParams {
            user_type: Some("robot".to_string()),
            ..ChangeListParams::default()
        };
        assert!(params.resolve(&USER_ADMIN).is_err());

        let params = ChangeListParams {
            is_staff: Some("maybe".to_string()),
            ..ChangeListParams::default()
        };
        assert!(params.resolve(&USER_ADMIN).is_err());
    }
}
