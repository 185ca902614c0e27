use anyhow::{Result, bail};

use super::{AppConfig, defaults::MAX_LIST_PER_PAGE};

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    let admin = &cfg.admin;
    if admin.list_per_page == 0 || admin.list_per_page > MAX_LIST_PER_PAGE {
        errors.push(format!(
            "admin.list_per_page must be between 1 and {MAX_LIST_PER_PAGE}"
        ));
    }

    match (
        admin.superuser_email.as_deref(),
        admin.superuser_password.as_deref(),
    ) {
        (Some(email), Some(password)) => {
            if email.trim().is_empty() {
                errors.push("admin.superuser_email must not be empty".to_string());
            }
            if password.is_empty() {
                errors.push("admin.superuser_password must not be empty".to_string());
            }
        }
        (Some(_), None) | (None, Some(_)) => errors.push(
            "admin.superuser_email and admin.superuser_password must be set together".to_string(),
        ),
        (None, None) => {}
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use crate::config::{AdminConfig, AppConfig, DatabaseConfig};

    use super::validate;

    #[test]
    fn default_config_is_valid() {
        validate(&AppConfig::default()).expect("defaults should validate");
    }

    #[test]
    fn collects_every_problem_in_one_error() {
        let cfg = AppConfig {
            database: Some(DatabaseConfig {
                url: " ".to_string(),
                max_connections: 1,
                min_idle: 4,
            }),
            admin: AdminConfig {
                list_per_page: 0,
                superuser_email: Some("root@example.com".to_string()),
                superuser_password: None,
            },
            ..AppConfig::default()
        };

        let message = validate(&cfg).expect_err("config should fail").to_string();
        assert!(message.contains("database.url must not be empty"));
        assert!(message.contains("database.min_idle (4)"));
        assert!(message.contains("admin.list_per_page"));
        assert!(message.contains("must be set together"));
    }
}
