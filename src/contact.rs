//! Contact form
//!
//! The submit action is a stub: it logs the submission, waits a moment and
//! always reports success. The page also hands the message to the chat app,
//! formatted by [`format_contact_message`].

use crate::cart::state::SharedState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const CONTACT_THANKS: &str =
    "Thank you for reaching out! We'll get back to you within 24 hours.";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// Response body of `POST /contact`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    #[serde(flatten)]
    pub action: ActionResponse,
    pub handoff_url: String,
}

/// Logs `form` and reports success after `delay`. Nothing is validated or stored.
pub async fn submit_contact_form(form: &ContactFormData, delay: Duration) -> ActionResponse {
    tracing::info!(
        name = %form.name,
        email = %form.email,
        phone = %form.phone,
        message = %form.message,
        timestamp = %chrono::Utc::now().to_rfc3339(),
        "contact form submission"
    );

    tokio::time::sleep(delay).await;

    ActionResponse {
        success: true,
        message: CONTACT_THANKS.to_string(),
    }
}

/// The chat message for a contact submission.
pub fn format_contact_message(form: &ContactFormData) -> String {
    format!(
        "🔔 *New Contact Form Submission*\n\n\
         👤 *Name:* {}\n\
         📧 *Email:* {}\n\
         📱 *Phone:* {}\n\n\
         💬 *Message:*\n{}",
        form.name, form.email, form.phone, form.message
    )
}

/// Creates routes for the contact page
pub fn routes() -> Router<SharedState> {
    Router::new().route("/contact", post(contact))
}

/// Endpoint: POST /contact
async fn contact(
    State(state): State<SharedState>,
    Json(form): Json<ContactFormData>,
) -> Json<ContactResponse> {
    let text = format_contact_message(&form);
    state.sink.send(&text);
    let action = submit_contact_form(&form, state.contact_delay).await;

    Json(ContactResponse {
        action,
        handoff_url: state.whatsapp.link(&text).to_string(),
    })
}
