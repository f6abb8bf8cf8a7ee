//! Login, address, review and newsletter commands.
//!
//! Each command builds the same form the site submits and passes it through
//! the storefront form handler, so validation rules apply unchanged.

use tracing::{info, warn};

use tiffin_storefront::validation::InputKind;
use tiffin_storefront::{Field, Form, FormError, Submission, form_ids};

use super::Context;

/// Delivery address as entered on the command line.
pub struct AddressInput {
    pub house_flat_no: String,
    pub street_name: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// # Errors
///
/// Returns `FormError` if the name or phone number is invalid.
pub async fn login(ctx: &Context, name: &str, phone: &str) -> Result<(), FormError> {
    let form = Form::new(form_ids::LOGIN)
        .field(Field::text("customerName", name).required())
        .field(Field::tel("customerNo", phone).required());

    submit(ctx, &form).await
}

/// # Errors
///
/// Returns `FormError` if any address field is invalid.
pub async fn address(ctx: &Context, input: AddressInput) -> Result<(), FormError> {
    let form = Form::new(form_ids::ADDRESS)
        .field(Field::text("houseFlatNo", input.house_flat_no).required())
        .field(Field::text("streetName", input.street_name).required())
        .field(Field::text("city", input.city).required())
        .field(Field::text("state", input.state).required())
        .field(Field::text("pincode", input.pincode).required());

    submit(ctx, &form).await
}

/// # Errors
///
/// Returns `FormError` if the reviewer name or text is invalid.
pub async fn review(ctx: &Context, name: &str, rating: &str, text: &str) -> Result<(), FormError> {
    let form = Form::new(form_ids::REVIEW)
        .field(Field::text("reviewerName", name).required())
        .field(Field::new("rating", InputKind::Number, rating))
        .field(Field::new("reviewText", InputKind::TextArea, text).required());

    submit(ctx, &form).await
}

/// # Errors
///
/// Returns `FormError` if the address is not a valid e-mail.
pub async fn subscribe(ctx: &Context, email: &str) -> Result<(), FormError> {
    let form = Form::new(form_ids::NEWSLETTER).field(Field::email("email", email).required());

    submit(ctx, &form).await
}

async fn submit(ctx: &Context, form: &Form) -> Result<(), FormError> {
    let submission = match ctx.forms().submit(form).await {
        Ok(submission) => submission,
        Err(FormError::Invalid(errors)) => {
            for error in errors.iter() {
                warn!(field = %error.field, "{}", error.message);
            }
            return Err(FormError::Invalid(errors));
        }
        Err(e) => return Err(e),
    };

    match submission {
        Submission::LoggedIn { user, next } => {
            info!(name = %user.name, next = next.path(), "Logged in");
        }
        Submission::AddressSaved { address, next } => {
            info!(city = %address.city, next = next.path(), "Address saved");
        }
        Submission::ReviewPosted(review) => {
            info!(name = %review.name, rating = ?review.rating, "Review posted");
        }
        Submission::Subscribed(email) | Submission::AlreadySubscribed(email) => {
            info!(email = %email, "Newsletter");
        }
        Submission::Unhandled { form_id } => {
            info!(form_id = %form_id, "Form submitted");
        }
    }
    Ok(())
}
