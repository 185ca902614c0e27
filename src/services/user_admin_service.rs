use sea_orm::{ConnectionTrait, DatabaseTransaction, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    admin::{self, ChangeListParams, Fieldset, InlineSpec, ModelAdminSpec},
    auth::{PasswordHashSummary, UserType},
    db::{
        dao::{AddressDao, DaoBase, DaoLayerError, UserDao},
        entities::{address, user},
    },
    error::AppError,
    forms::{
        AddressChange, AddressFormInput, AddressInlineFormSet, AdminPasswordChangeForm,
        AdminPasswordChangeInput, FormErrors, UserChangeForm, UserChangeInput, UserCreationForm,
        UserCreationInput, email_conflict, render_password_field,
    },
    logging::mask_email,
};

#[derive(Debug, Default, Deserialize)]
pub struct AddUserRequest {
    #[serde(flatten)]
    pub user: UserCreationInput,
    #[serde(default)]
    pub addresses: Vec<AddressFormInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeUserRequest {
    #[serde(flatten)]
    pub user: UserChangeInput,
    #[serde(default)]
    pub addresses: Vec<AddressFormInput>,
}

#[derive(Debug, Serialize)]
pub struct ChangeListPage {
    pub list_display: &'static [&'static str],
    pub list_filter: &'static [&'static str],
    pub search_fields: &'static [&'static str],
    pub results: Vec<Map<String, Value>>,
    /// Zero-based.
    pub page: u64,
    pub per_page: u64,
    pub has_next: bool,
    pub result_count: u64,
    pub full_count: u64,
}

#[derive(Debug, Serialize)]
pub struct FieldsetValues {
    pub name: Option<&'static str>,
    pub classes: &'static [&'static str],
    pub fields: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct InlineForms {
    #[serde(flatten)]
    pub spec: InlineSpec,
    pub forms: Vec<AddressFormInput>,
}

#[derive(Debug, Serialize)]
pub struct AddFormLayout {
    pub fieldsets: &'static [Fieldset],
    pub inlines: Vec<InlineForms>,
}

#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub id: Uuid,
    pub email: String,
    pub fieldsets: Vec<FieldsetValues>,
    pub inlines: Vec<InlineForms>,
}

/// Orchestrates the user admin pages: forms, inlines and storage.
#[derive(Clone)]
pub struct UserAdminService {
    users: UserDao,
    addresses: AddressDao,
    spec: &'static ModelAdminSpec,
    list_per_page: u64,
}

impl UserAdminService {
    pub fn new(
        users: UserDao,
        addresses: AddressDao,
        spec: &'static ModelAdminSpec,
        list_per_page: u64,
    ) -> Self {
        Self {
            users,
            addresses,
            spec,
            list_per_page,
        }
    }

    pub async fn changelist(&self, params: &ChangeListParams) -> Result<ChangeListPage, AppError> {
        let query = params.resolve(self.spec)?;
        let page = params.page_index();
        let response = self
            .users
            .list(&query, page.saturating_add(1), self.list_per_page)
            .await?;
        let result_count = self.users.count_matching(&query).await?;
        let full_count = self.users.count(|select| select).await?;

        let results = response
            .data
            .iter()
            .map(|user| {
                let row = serialize(user)?;
                let mut projected = admin::project(&row, self.spec.list_display);
                projected.insert("id".to_string(), Value::String(user.id.to_string()));
                Ok(projected)
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        debug!(
            terms = query.search_terms.len(),
            page, result_count, "changelist served"
        );
        Ok(ChangeListPage {
            list_display: self.spec.list_display,
            list_filter: self.spec.list_filter,
            search_fields: self.spec.search_fields,
            results,
            page,
            per_page: self.list_per_page,
            has_next: response.has_next,
            result_count,
            full_count,
        })
    }

    pub fn add_form(&self) -> AddFormLayout {
        AddFormLayout {
            fieldsets: self.spec.add_fieldsets,
            inlines: self.inline_forms(&[]),
        }
    }

    /// Validates the creation form and its inlines together, then stores the
    /// account and its addresses in one transaction.
    pub async fn add_user(&self, request: AddUserRequest) -> Result<UserDetail, AppError> {
        let email_taken = self.email_taken(request.user.email_candidate(), None).await?;
        let cleaned = UserCreationForm::new(request.user).clean(email_taken);
        let inlines = AddressInlineFormSet::new(request.addresses).clean(&[]);
        let (cleaned, changes) = combine(cleaned, inlines)?;

        let pending = cleaned.build()?;
        let txn = self.begin().await?;
        let written = async {
            let user = pending.persist(&UserDao::in_transaction(&txn)).await?;
            apply_address_changes(&AddressDao::in_transaction(&txn), &user.id, changes).await?;
            Ok::<_, AppError>(user)
        }
        .await;
        let user = finish(txn, written).await?;
        info!(user_id = %user.id, email = %mask_email(&user.email), "user created");

        let addresses = self.addresses.list_for_user(&user.id).await?;
        self.render_detail(&user, &addresses)
    }

    pub async fn user_detail(&self, id: &Uuid) -> Result<UserDetail, AppError> {
        let user = self.users.find_by_id(*id).await?;
        let addresses = self.addresses.list_for_user(id).await?;
        self.render_detail(&user, &addresses)
    }

    /// Applies the change form. The stored hash is never part of the update.
    pub async fn change_user(
        &self,
        id: &Uuid,
        request: ChangeUserRequest,
    ) -> Result<UserDetail, AppError> {
        let existing = self.users.find_by_id(*id).await?;
        let email_taken = self
            .email_taken(request.user.email_candidate(), Some(existing.id))
            .await?;
        let owned: Vec<Uuid> = self
            .addresses
            .list_for_user(id)
            .await?
            .iter()
            .map(|address| address.id)
            .collect();

        let cleaned = UserChangeForm::new(request.user).clean(email_taken);
        let inlines = AddressInlineFormSet::new(request.addresses).clean(&owned);
        let (changes, address_changes) = combine(cleaned, inlines)?;

        let txn = self.begin().await?;
        let written = async {
            let user = UserDao::in_transaction(&txn)
                .update(existing.id, move |active| changes.apply(active))
                .await
                .map_err(email_conflict)?;
            apply_address_changes(&AddressDao::in_transaction(&txn), &user.id, address_changes)
                .await?;
            Ok::<_, AppError>(user)
        }
        .await;
        let user = finish(txn, written).await?;
        info!(user_id = %user.id, email = %mask_email(&user.email), "user changed");

        let addresses = self.addresses.list_for_user(&user.id).await?;
        self.render_detail(&user, &addresses)
    }

    /// Replaces the stored hash after both entries are confirmed.
    pub async fn reset_password(
        &self,
        id: &Uuid,
        input: AdminPasswordChangeInput,
    ) -> Result<PasswordHashSummary, AppError> {
        let user = self.users.find_by_id(*id).await?;
        let confirmed = AdminPasswordChangeForm::new(input).clean()?;
        let password_hash = confirmed.hash()?;

        let user = self.users.set_password_hash(&user.id, password_hash).await?;
        info!(user_id = %user.id, email = %mask_email(&user.email), "password reset");
        Ok(render_password_field(&user))
    }

    /// Addresses go with the account through the cascading foreign key.
    pub async fn delete_user(&self, id: &Uuid) -> Result<Uuid, AppError> {
        let deleted = self.users.delete(*id).await?;
        info!(user_id = %deleted, "user deleted");
        Ok(deleted)
    }

    /// Creates the configured superuser through the regular creation form.
    /// An existing account with that email is left untouched.
    pub async fn ensure_superuser(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<user::Model>, AppError> {
        if self.users.find_by_email(email).await?.is_some() {
            debug!(email = %mask_email(email), "superuser already present");
            return Ok(None);
        }

        let input = UserCreationInput {
            email: Some(email.to_string()),
            user_type: Some(UserType::Administrator.as_str().to_string()),
            is_active: true,
            is_staff: true,
            is_superuser: true,
            password1: Some(password.to_string()),
            password2: Some(password.to_string()),
            ..UserCreationInput::default()
        };
        let user = UserCreationForm::new(input)
            .clean(false)
            .map_err(AppError::validation)?
            .build()?
            .persist(&self.users)
            .await?;
        info!(user_id = %user.id, email = %mask_email(&user.email), "superuser seeded");
        Ok(Some(user))
    }

    async fn email_taken(
        &self,
        email: Option<String>,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        match email {
            Some(email) => Ok(self.users.email_taken(&email, exclude).await?),
            None => Ok(false),
        }
    }

    async fn begin(&self) -> Result<DatabaseTransaction, AppError> {
        self.users
            .db()
            .begin()
            .await
            .map_err(|err| AppError::from(DaoLayerError::Db(err)))
    }

    fn inline_forms(&self, existing: &[address::Model]) -> Vec<InlineForms> {
        self.spec
            .inlines
            .iter()
            .map(|spec| InlineForms {
                spec: *spec,
                forms: AddressInlineFormSet::initial(existing),
            })
            .collect()
    }

    fn render_detail(
        &self,
        user: &user::Model,
        addresses: &[address::Model],
    ) -> Result<UserDetail, AppError> {
        let mut row = serialize(user)?;
        if let Value::Object(fields) = &mut row {
            let summary = serde_json::to_value(render_password_field(user)).map_err(|err| {
                AppError::internal_with_source("Failed to render password summary", err)
            })?;
            fields.insert("password".to_string(), summary);
        }

        let fieldsets = self
            .spec
            .fieldsets
            .iter()
            .map(|fieldset| FieldsetValues {
                name: fieldset.name,
                classes: fieldset.classes,
                fields: admin::project(&row, fieldset.fields),
            })
            .collect();

        Ok(UserDetail {
            id: user.id,
            email: user.email.clone(),
            fieldsets,
            inlines: self.inline_forms(addresses),
        })
    }
}

async fn apply_address_changes<C>(
    addresses: &AddressDao<C>,
    user_id: &Uuid,
    changes: Vec<AddressChange>,
) -> Result<(), AppError>
where
    C: ConnectionTrait + Send + Sync,
{
    for change in changes {
        match change {
            AddressChange::Create(fields) => {
                addresses.create_for_user(user_id, fields).await?;
            }
            AddressChange::Update { id, fields } => {
                addresses.update_fields(&id, fields).await?;
            }
            AddressChange::Delete(id) => {
                addresses.delete(id).await?;
            }
        }
    }
    Ok(())
}

/// Commits when every write succeeded, rolls back otherwise.
async fn finish<T>(
    txn: DatabaseTransaction,
    written: Result<T, AppError>,
) -> Result<T, AppError> {
    match written {
        Ok(value) => {
            txn.commit().await.map_err(DaoLayerError::Db)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = txn.rollback().await {
                warn!(error = %rollback, "rollback failed");
            }
            Err(err)
        }
    }
}

fn serialize(user: &user::Model) -> Result<Value, AppError> {
    serde_json::to_value(user)
        .map_err(|err| AppError::internal_with_source("Failed to serialize user", err))
}

/// Runs both validations to completion so every error is reported at once.
fn combine<A, B>(
    first: Result<A, FormErrors>,
    second: Result<B, FormErrors>,
) -> Result<(A, B), AppError> {
    match (first, second) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(mut errors), Err(more)) => {
            errors.merge(more);
            Err(AppError::validation(errors))
        }
        (Err(errors), Ok(_)) | (Ok(_), Err(errors)) => Err(AppError::validation(errors)),
    }
}
