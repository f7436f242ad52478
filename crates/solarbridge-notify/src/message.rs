use tera::{Context, Tera};

use solarbridge_core::models::assessment::Assessment;

use crate::config::MailIdentity;
use crate::error::NotifyError;

const TEMPLATE_NAME: &str = "assessment.html";

// `.html` name turns on Tera's autoescaping for the visitor-supplied values.
const ASSESSMENT_TEMPLATE: &str = r#"
<h2>New Solar Assessment</h2>
<p><strong>Name:</strong> {{ name }}</p>
<p><strong>Email:</strong> {{ email }}</p>
<p><strong>Contact:</strong> {{ contact }}</p>
<p><strong>Address:</strong> {{ address }}</p>
<p><strong>Monthly Bill:</strong> {{ monthly_bill }}</p>
<p><strong>Terrace Area:</strong> {{ terrace_area }}</p>
<p><strong>Grid Knowledge:</strong> {{ grid_knowledge }}</p>
<p><strong>Submitted At:</strong> {{ submitted_at }}</p>
<p><small>Reference: {{ id }}</small></p>
"#;

const NOT_PROVIDED: &str = "not provided";

/// A fully composed notification, ready for any transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Renders the staff notification for an assessment.
pub struct MessageComposer {
    tera: Tera,
    identity: MailIdentity,
}

fn or_not_provided(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_PROVIDED.to_string(),
    }
}

/// Joins address, city and pincode, skipping blank parts.
pub fn address_line(assessment: &Assessment) -> String {
    let parts: Vec<&str> = [
        assessment.address.as_deref(),
        assessment.city.as_deref(),
        assessment.pincode.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect();

    if parts.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        parts.join(", ")
    }
}

impl MessageComposer {
    pub fn new(identity: MailIdentity) -> Result<Self, NotifyError> {
        if identity.recipients.is_empty() {
            return Err(NotifyError::Config("no notification recipients configured".into()));
        }
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, ASSESSMENT_TEMPLATE)?;
        Ok(Self { tera, identity })
    }

    pub fn identity(&self) -> &MailIdentity {
        &self.identity
    }

    pub fn compose(&self, assessment: &Assessment) -> Result<EmailMessage, NotifyError> {
        let mut context = Context::new();
        context.insert("id", &assessment.id.to_string());
        context.insert("name", &assessment.name);
        context.insert("email", &assessment.email);
        context.insert("contact", &or_not_provided(assessment.contact.as_deref()));
        context.insert("address", &address_line(assessment));
        context.insert(
            "monthly_bill",
            &assessment
                .monthly_bill
                .map(|bill| format!("₹{bill}"))
                .unwrap_or_else(|| NOT_PROVIDED.to_string()),
        );
        context.insert(
            "terrace_area",
            &assessment
                .terrace_area
                .map(|area| format!("{area} sq.ft"))
                .unwrap_or_else(|| NOT_PROVIDED.to_string()),
        );
        context.insert(
            "grid_knowledge",
            &or_not_provided(assessment.grid_knowledge.as_deref()),
        );
        context.insert("submitted_at", &assessment.submitted_at.to_string());

        let html = self.tera.render(TEMPLATE_NAME, &context)?;

        Ok(EmailMessage {
            from: self.identity.from_header(),
            to: self.identity.recipients.clone(),
            subject: format!("🌞 New Solar Assessment from {}", assessment.name),
            html,
        })
    }
}
