use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Result as ActixResult};
use extractors::record_normalizer::contacts_in_category;
use futures::stream::{self, StreamExt};
use leadgen_agents::CampaignWriter;
use shared_types::{
    CampaignContentResponse, CampaignFailure, Contact, ContactStatus, GenerateCampaignRequest,
    SendCampaignRequest, SendCampaignResponse,
};
use std::future::Future;
use tracing::{info, warn};

use crate::backend::{contacts as contacts_db, templates as templates_db};
use crate::helpers::http_error::{ai_error, backend_error, email_error, json_error};
use crate::integrations::emailjs::{template_params, EmailDeliveryError, EmailJsClient};
use crate::state::AppState;

/// Simultaneous EmailJS requests during a send.
const SEND_CONCURRENCY: usize = 4;

pub async fn generate(
    state: web::Data<AppState>,
    request: web::Json<GenerateCampaignRequest>,
) -> ActixResult<HttpResponse> {
    let req = request.into_inner();

    let model = state.config()?.text_model();
    let writer = CampaignWriter::new(state.llm_client()?, model);
    let content = writer
        .write(&req.prospect_name, &req.company, &req.topic)
        .await
        .map_err(ai_error)?;

    Ok(HttpResponse::Ok().json(CampaignContentResponse { content }))
}

pub async fn send(
    state: web::Data<AppState>,
    request: web::Json<SendCampaignRequest>,
) -> ActixResult<HttpResponse> {
    let req = request.into_inner();
    let backend = state.backend()?;
    let mailer = EmailJsClient::new(state.config()?.email()).map_err(email_error)?;

    let (subject, body) = match req.template_id.as_deref() {
        Some(id) => {
            let template = templates_db::get_template(&backend.client, id)
                .await
                .map_err(backend_error)?;
            (
                req.subject.unwrap_or(template.subject),
                req.body.unwrap_or(template.body),
            )
        }
        None => (
            req.subject.unwrap_or_default(),
            req.body.unwrap_or_default(),
        ),
    };
    if body.trim().is_empty() {
        return Err(json_error(
            StatusCode::BAD_REQUEST,
            "A message body or a template is required",
        ));
    }

    let rows = contacts_db::list_contact_rows(&backend.client)
        .await
        .map_err(backend_error)?;
    let (recipients, skipped_without_email) =
        select_recipients(contacts_in_category(&rows, req.category), req.status);

    info!(
        "Sending campaign to {} {} contact(s), {} without email",
        recipients.len(),
        req.category,
        skipped_without_email
    );

    let sender_name = mailer.sender_name().to_string();
    let (sent, failures) = deliver(recipients, |contact| {
        let params = template_params(contact, &subject, &body, &sender_name);
        let mailer = &mailer;
        async move { mailer.send(&params).await }
    })
    .await;

    if !failures.is_empty() {
        warn!("{} campaign email(s) failed", failures.len());
    }
    Ok(HttpResponse::Ok().json(SendCampaignResponse {
        sent,
        skipped_without_email,
        failures,
    }))
}

/// Keeps contacts with the requested status and an email address. Returns them with
/// the number dropped for lacking an address.
fn select_recipients(
    contacts: Vec<Contact>,
    status: Option<ContactStatus>,
) -> (Vec<Contact>, usize) {
    let matching = contacts.into_iter().filter(|c| match status {
        Some(status) => c.status.parse::<ContactStatus>().ok() == Some(status),
        None => true,
    });

    let (with_email, without_email): (Vec<Contact>, Vec<Contact>) =
        matching.partition(|c| !c.email.trim().is_empty());
    (with_email, without_email.len())
}

async fn deliver<F, Fut>(recipients: Vec<Contact>, send_one: F) -> (usize, Vec<CampaignFailure>)
where
    F: Fn(&Contact) -> Fut,
    Fut: Future<Output = Result<(), EmailDeliveryError>>,
{
    let results: Vec<(String, Result<(), EmailDeliveryError>)> = stream::iter(recipients)
        .map(|contact| {
            let email = contact.email.clone();
            let pending = send_one(&contact);
            async move { (email, pending.await) }
        })
        .buffer_unordered(SEND_CONCURRENCY)
        .collect()
        .await;

    let mut sent = 0;
    let mut failures = Vec::new();
    for (email, result) in results {
        match result {
            Ok(()) => sent += 1,
            Err(e) => failures.push(CampaignFailure {
                email,
                error: e.to_string(),
            }),
        }
    }
    (sent, failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(email: &str, status: &str) -> Contact {
        Contact {
            email: email.to_string(),
            status: status.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_select_recipients() {
        let contacts = vec![
            contact("a@x.com", "New"),
            contact("", "New"),
            contact("b@x.com", "Contacté"),
            contact("  ", "Contacted"),
        ];

        let (all, skipped) = select_recipients(contacts.clone(), None);
        assert_eq!(all.len(), 2);
        assert_eq!(skipped, 2);

        let (contacted, skipped) = select_recipients(contacts, Some(ContactStatus::Contacted));
        assert_eq!(contacted.len(), 1);
        assert_eq!(contacted[0].email, "b@x.com");
        assert_eq!(skipped, 1);
    }

    #[tokio::test]
    async fn test_deliver_collects_failures() {
        let recipients = vec![
            contact("ok@x.com", "New"),
            contact("bounce@x.com", "New"),
            contact("ok2@x.com", "New"),
        ];

        let (sent, failures) = deliver(recipients, |c| {
            let bounce = c.email.starts_with("bounce");
            async move {
                if bounce {
                    Err(EmailDeliveryError::Rejected {
                        status: 422,
                        message: "invalid recipient".to_string(),
                    })
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert_eq!(sent, 2);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].email, "bounce@x.com");
        assert!(failures[0].error.contains("422"));
    }
}
