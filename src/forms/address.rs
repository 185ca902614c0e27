use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{dao::AddressFields, entities::address};

use super::{
    errors::FormErrors,
    fields::{optional_text, required_text},
};

pub const PREFIX: &str = "addresses";
/// Blank forms offered below the existing rows.
pub const EXTRA: usize = 1;
pub const FOREIGN_INLINE: &str = "The inline value did not match the parent instance.";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AddressFormInput {
    pub id: Option<Uuid>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "DELETE")]
    pub delete: bool,
}

impl AddressFormInput {
    fn is_blank(&self) -> bool {
        [
            &self.line1,
            &self.line2,
            &self.city,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .all(|value| optional_text(value.as_deref()).is_none())
    }
}

impl From<&address::Model> for AddressFormInput {
    fn from(model: &address::Model) -> Self {
        Self {
            id: Some(model.id),
            line1: Some(model.line1.clone()),
            line2: model.line2.clone(),
            city: Some(model.city.clone()),
            region: model.region.clone(),
            postal_code: Some(model.postal_code.clone()),
            country: Some(model.country.clone()),
            delete: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressChange {
    Create(AddressFields),
    Update { id: Uuid, fields: AddressFields },
    Delete(Uuid),
}

/// Addresses edited inline on the user page.
#[derive(Debug, Clone, Default)]
pub struct AddressInlineFormSet {
    forms: Vec<AddressFormInput>,
}

impl AddressInlineFormSet {
    pub fn new(forms: Vec<AddressFormInput>) -> Self {
        Self { forms }
    }

    /// Existing rows followed by the extra blank forms.
    pub fn initial(existing: &[address::Model]) -> Vec<AddressFormInput> {
        existing
            .iter()
            .map(AddressFormInput::from)
            .chain(std::iter::repeat_with(AddressFormInput::default).take(EXTRA))
            .collect()
    }

    /// `owned` holds the ids already attached to the parent user; any other
    /// id is rejected.
    pub fn clean(self, owned: &[Uuid]) -> Result<Vec<AddressChange>, FormErrors> {
        let mut errors = FormErrors::new();
        let mut changes = Vec::new();

        for (index, form) in self.forms.into_iter().enumerate() {
            let key = |field: &str| format!("{PREFIX}-{index}-{field}");

            if let Some(id) = form.id {
                if !owned.contains(&id) {
                    errors.add(key("id"), FOREIGN_INLINE);
                    continue;
                }
                if form.delete {
                    changes.push(AddressChange::Delete(id));
                    continue;
                }
            } else if form.delete || form.is_blank() {
                continue;
            }

            let line1 = required_text(&mut errors, &key("line1"), form.line1.as_deref());
            let city = required_text(&mut errors, &key("city"), form.city.as_deref());
            let postal_code =
                required_text(&mut errors, &key("postal_code"), form.postal_code.as_deref());
            let country = required_text(&mut errors, &key("country"), form.country.as_deref());

            let (Some(line1), Some(city), Some(postal_code), Some(country)) =
                (line1, city, postal_code, country)
            else {
                continue;
            };
            let fields = AddressFields {
                line1,
                line2: optional_text(form.line2.as_deref()),
                city,
                region: optional_text(form.region.as_deref()),
                postal_code,
                country,
            };
            changes.push(match form.id {
                Some(id) => AddressChange::Update { id, fields },
                None => AddressChange::Create(fields),
            });
        }

        errors.into_result(changes)
    }
}
