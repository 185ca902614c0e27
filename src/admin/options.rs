use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fieldset {
    pub name: Option<&'static str>,
    pub classes: &'static [&'static str],
    pub fields: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineStyle {
    Stacked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InlineSpec {
    pub model: &'static str,
    pub prefix: &'static str,
    pub style: InlineStyle,
    pub extra: usize,
}

/// Declarative admin options for one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelAdminSpec {
    pub app_label: &'static str,
    pub model_name: &'static str,
    pub verbose_name: &'static str,
    pub list_display: &'static [&'static str],
    pub list_filter: &'static [&'static str],
    pub search_fields: &'static [&'static str],
    /// Column names; a leading `-` sorts descending.
    pub ordering: &'static [&'static str],
    pub readonly_fields: &'static [&'static str],
    pub fieldsets: &'static [Fieldset],
    pub add_fieldsets: &'static [Fieldset],
    pub inlines: &'static [InlineSpec],
}

impl ModelAdminSpec {
    /// `app_label.model_name`, the registry key.
    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label, self.model_name)
    }
}

pub const ADDRESS_INLINE: InlineSpec = InlineSpec {
    model: "users.address",
    prefix: crate::forms::address::PREFIX,
    style: InlineStyle::Stacked,
    extra: crate::forms::address::EXTRA,
};

pub static USER_ADMIN: ModelAdminSpec = ModelAdminSpec {
    app_label: "users",
    model_name: "user",
    verbose_name: "User",
    list_display: &[
        "email",
        "first_name",
        "last_name",
        "user_type",
        "is_active",
        "is_staff",
    ],
    list_filter: &["is_superuser", "is_staff", "user_type"],
    search_fields: &["email", "first_name", "last_name", "phone_number"],
    ordering: &["email"],
    readonly_fields: &["password"],
    fieldsets: &[
        Fieldset {
            name: None,
            classes: &[],
            fields: &["password"],
        },
        Fieldset {
            name: Some("Personal Info"),
            classes: &[],
            fields: &[
                "first_name",
                "last_name",
                "email",
                "phone_number",
                "profile_picture",
                "user_type",
            ],
        },
        Fieldset {
            name: Some("Permissions"),
            classes: &[],
            fields: &["is_active", "is_staff", "is_superuser"],
        },
        Fieldset {
            name: Some("Important Dates"),
            classes: &[],
            fields: &["last_login", "date_joined"],
        },
    ],
    add_fieldsets: &[Fieldset {
        name: None,
        classes: &["wide"],
        fields: &["email", "phone_number", "password1", "password2"],
    }],
    inlines: &[ADDRESS_INLINE],
};

/// Built-in group admin, present until setup removes it.
pub static GROUP_ADMIN: ModelAdminSpec = ModelAdminSpec {
    app_label: "auth",
    model_name: "group",
    verbose_name: "Group",
    list_display: &["name"],
    list_filter: &[],
    search_fields: &["name"],
    ordering: &["name"],
    readonly_fields: &[],
    fieldsets: &[Fieldset {
        name: None,
        classes: &[],
        fields: &["name", "permissions"],
    }],
    add_fieldsets: &[],
    inlines: &[],
};

#[cfg(test)]
mod tests {
    use super::{GROUP_ADMIN, USER_ADMIN};

    #[test]
    fn labels_join_app_and_model() {
        assert_eq!(USER_ADMIN.label(), "users.user");
        assert_eq!(GROUP_ADMIN.label(), "auth.group");
    }

    #[test]
    fn user_fieldsets_cover_list_display() {
        let shown: Vec<_> = USER_ADMIN
            .fieldsets
            .iter()
            .flat_map(|fieldset| fieldset.fields.iter())
            .collect();
        for column in USER_ADMIN.list_display {
            assert!(shown.contains(&column), "{column} missing from fieldsets");
        }
        assert!(!shown.contains(&&"groups"));
    }

    #[test]
    fn add_form_asks_for_both_passwords() {
        let fields = USER_ADMIN.add_fieldsets[0].fields;
        assert!(fields.contains(&"password1") && fields.contains(&"password2"));
        assert_eq!(USER_ADMIN.add_fieldsets[0].classes, ["wide"]);
    }
}
