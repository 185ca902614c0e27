use serde::{Deserialize, Serialize};

/// Account category shown in the changelist and used as a list filter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Customer,
    Vendor,
    Administrator,
}

impl UserType {
    pub const ALL: [UserType; 3] = [UserType::Customer, UserType::Vendor, UserType::Administrator];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Customer => "customer",
            UserType::Vendor => "vendor",
            UserType::Administrator => "administrator",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserType::Customer => "Customer",
            UserType::Vendor => "Vendor",
            UserType::Administrator => "Administrator",
        }
    }
}

impl TryFrom<&str> for UserType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "customer" => Ok(UserType::Customer),
            "vendor" => Ok(UserType::Vendor),
            "administrator" => Ok(UserType::Administrator),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UserType;

    #[test]
    fn user_type_string_roundtrip() {
        for user_type in UserType::ALL {
            assert_eq!(UserType::try_from(user_type.as_str()), Ok(user_type));
        }
        assert!(UserType::try_from("manager").is_err());
        assert_eq!(UserType::default(), UserType::Customer);
    }
}
