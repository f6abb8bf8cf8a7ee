//! Form submission handling.
//!
//! A submitted [`Form`] is validated first; only a fully valid form is routed
//! by its identifier to the matching handler, which records the result in
//! storage and reports a notice.
//!
//! Login and address submissions wait out a simulated latency before they
//! are committed. Review and newsletter submissions commit immediately.

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::instrument;

use tiffin_core::{Email, EmailError};

use crate::models::{CurrentUser, Review, UserAddress};
use crate::notify::{Notice, SharedNotifier};
use crate::storage::{Storage, keys};
use crate::validation::{Form, ValidationErrors, Validator};

/// Identifiers of the forms this handler knows.
pub mod form_ids {
    pub const LOGIN: &str = "loginForm";
    pub const ADDRESS: &str = "addressForm";
    pub const REVIEW: &str = "reviewForm";
    pub const NEWSLETTER: &str = "newsletterForm";
}

/// Errors returned when a submission is rejected.
#[derive(Debug, Error)]
pub enum FormError {
    /// One or more fields failed validation.
    #[error("form has invalid fields: {0}")]
    Invalid(#[from] ValidationErrors),

    /// A field the handler reads was not submitted.
    #[error("missing form field: {0}")]
    MissingField(&'static str),

    /// The newsletter address could not be parsed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Page the user is sent to after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Address,
    Menu,
}

impl Page {
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Address => "address.html",
            Self::Menu => "menu.html",
        }
    }
}

/// What a successful submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    LoggedIn { user: CurrentUser, next: Page },
    AddressSaved { address: UserAddress, next: Page },
    ReviewPosted(Review),
    Subscribed(Email),
    AlreadySubscribed(Email),
    /// The form id has no handler; nothing was stored.
    Unhandled { form_id: String },
}

/// Construction-time settings for a [`FormHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSettings {
    /// Simulated processing time for login and address submissions.
    pub submit_latency: Duration,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            submit_latency: Duration::from_millis(1500),
        }
    }
}

/// Validates and routes form submissions.
pub struct FormHandler {
    validator: Validator,
    storage: Storage,
    notifier: SharedNotifier,
    settings: FormSettings,
}

impl std::fmt::Debug for FormHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormHandler")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl FormHandler {
    #[must_use]
    pub fn new(
        validator: Validator,
        storage: Storage,
        notifier: SharedNotifier,
        settings: FormSettings,
    ) -> Self {
        Self {
            validator,
            storage,
            notifier,
            settings,
        }
    }

    #[must_use]
    pub const fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Validate and submit `form`, waiting out the simulated latency for
    /// login and address forms.
    ///
    /// # Errors
    ///
    /// Returns `FormError` if validation fails or a needed field is missing.
    #[instrument(skip_all, fields(form_id = %form.id))]
    pub async fn submit(&self, form: &Form) -> Result<Submission, FormError> {
        self.validate(form)?;

        if matches!(form.id.as_str(), form_ids::LOGIN | form_ids::ADDRESS) {
            tokio::time::sleep(self.settings.submit_latency).await;
        }

        self.commit(form, Utc::now())
    }

    /// Validate and submit `form` immediately, as if at `now`.
    ///
    /// # Errors
    ///
    /// Returns `FormError` if validation fails or a needed field is missing.
    pub fn submit_at(&self, form: &Form, now: DateTime<Utc>) -> Result<Submission, FormError> {
        self.validate(form)?;
        self.commit(form, now)
    }

    fn validate(&self, form: &Form) -> Result<(), FormError> {
        self.validator.validate_form(form).map_err(|errors| {
            tracing::debug!(form_id = %form.id, failed = errors.len(), "Form validation failed");
            self.notifier
                .notify(Notice::error("Please fix the errors in the form"));
            FormError::Invalid(errors)
        })
    }

    fn commit(&self, form: &Form, now: DateTime<Utc>) -> Result<Submission, FormError> {
        match form.id.as_str() {
            form_ids::LOGIN => self.login(form, now),
            form_ids::ADDRESS => self.save_address(form, now),
            form_ids::REVIEW => self.post_review(form, now),
            form_ids::NEWSLETTER => self.subscribe(form),
            other => {
                tracing::info!(form_id = other, "Form submitted");
                Ok(Submission::Unhandled {
                    form_id: other.to_string(),
                })
            }
        }
    }

    fn login(&self, form: &Form, now: DateTime<Utc>) -> Result<Submission, FormError> {
        let user = CurrentUser {
            name: field(form, "customerName")?,
            phone: field(form, "customerNo")?,
            login_time: now,
        };

        self.persist(keys::CURRENT_USER, &user);
        self.notifier.notify(Notice::success("Login successful!"));

        Ok(Submission::LoggedIn {
            user,
            next: Page::Address,
        })
    }

    fn save_address(&self, form: &Form, now: DateTime<Utc>) -> Result<Submission, FormError> {
        let address = UserAddress {
            house_flat_no: field(form, "houseFlatNo")?,
            street_name: field(form, "streetName")?,
            city: field(form, "city")?,
            state: field(form, "state")?,
            pincode: field(form, "pincode")?,
            saved_time: now,
        };

        self.persist(keys::USER_ADDRESS, &address);
        self.notifier
            .notify(Notice::success("Address saved successfully!"));

        Ok(Submission::AddressSaved {
            address,
            next: Page::Menu,
        })
    }

    fn post_review(&self, form: &Form, now: DateTime<Utc>) -> Result<Submission, FormError> {
        let review = Review {
            name: field(form, "reviewerName")?,
            rating: form.value("rating").and_then(parse_rating),
            text: field(form, "reviewText")?,
            date: now.date_naive(),
        };

        let mut reviews: Vec<Review> = self.storage.get_or_default(keys::REVIEWS);
        reviews.insert(0, review.clone());
        self.persist(keys::REVIEWS, &reviews);

        self.notifier
            .notify(Notice::success("Review submitted successfully!"));

        Ok(Submission::ReviewPosted(review))
    }

    fn subscribe(&self, form: &Form) -> Result<Submission, FormError> {
        let email = Email::parse(&field(form, "email")?)?;

        let mut subscribers: Vec<Email> = self.storage.get_or_default(keys::SUBSCRIBERS);
        if subscribers.contains(&email) {
            self.notifier
                .notify(Notice::info("You're already subscribed!"));
            return Ok(Submission::AlreadySubscribed(email));
        }

        subscribers.push(email.clone());
        self.persist(keys::SUBSCRIBERS, &subscribers);
        tracing::info!(email = %email, "Newsletter subscription successful");
        self.notifier
            .notify(Notice::success("Successfully subscribed to newsletter!"));

        Ok(Submission::Subscribed(email))
    }

    fn persist<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) {
        if !self.storage.set(key, value) {
            tracing::warn!(key, "Form data could not be persisted");
        }
    }
}

/// Leading whole number of a rating, so "4.5" reads as 4 and "5 stars" as 5.
fn parse_rating(value: &str) -> Option<u8> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value.get(..end)?.parse().ok()
}

/// Trimmed value of a field the handler needs.
fn field(form: &Form, name: &'static str) -> Result<String, FormError> {
    form.value(name)
        .map(|value| value.trim().to_string())
        .ok_or(FormError::MissingField(name))
}
