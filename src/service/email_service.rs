//! Email Service
//!
//! SMTP delivery of the registration confirmation email.

use async_trait::async_trait;
use chrono::Datelike;
use lettre::{
    message::{header, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use log::{debug, error, info};
use tera::{Context, Tera};

use crate::config::EmailConfig;
use crate::service::notifier::RegistrationNotifier;
use crate::utils::error::{AppError, AppResult};

const REGISTRATION_HTML: &str = "registration_success.html";
const REGISTRATION_TEXT: &str = "registration_success.txt";

/// Email service sending account emails over SMTP
pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    templates: Tera,
    config: EmailConfig,
}

impl EmailService {
    /// Create a new email service. No connection is opened until the first send.
    pub fn new(config: EmailConfig) -> AppResult<Self> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let builder = if config.smtp_use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host).map_err(|e| {
                AppError::Configuration(format!("Failed to configure SMTP relay: {}", e))
            })?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };

        let transport = builder.port(config.smtp_port).credentials(creds).build();

        let mut templates = Tera::default();
        Self::add_embedded_templates(&mut templates)?;
        debug!("Email templates loaded");

        Ok(Self {
            transport,
            templates,
            config,
        })
    }

    fn add_embedded_templates(tera: &mut Tera) -> AppResult<()> {
        let registration_html = r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Welcome to {{ app_name }}</title>
    <style>
        body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }
        .header { text-align: center; background: #f8f9fa; padding: 20px; border-radius: 8px 8px 0 0; }
        .content { background: white; padding: 30px; border: 1px solid #dee2e6; }
        .footer { background: #f8f9fa; padding: 20px; border-radius: 0 0 8px 8px; text-align: center; font-size: 12px; color: #666; }
    </style>
</head>
<body>
    <div class="header">
        <h1>Registration Successful</h1>
    </div>
    <div class="content">
        <p>Hello {{ first_name }},</p>

        <p>Welcome to {{ app_name }}! Your account has been created and is registered to <strong>{{ email }}</strong>.</p>

        <p>You can now sign in with this email address and the password you chose.</p>

        <p>If you did not create this account, please contact our support team.</p>

        <p>Best regards,<br>The {{ app_name }} Team</p>
    </div>
    <div class="footer">
        <p>&copy; {{ current_year }} {{ app_name }}. All rights reserved.</p>
    </div>
</body>
</html>
        "#;

        let registration_text = r#"
Registration Successful

Hello {{ first_name }},

Welcome to {{ app_name }}! Your account has been created and is registered to {{ email }}.

You can now sign in with this email address and the password you chose.

If you did not create this account, please contact our support team.

Best regards,
The {{ app_name }} Team

---
© {{ current_year }} {{ app_name }}. All rights reserved.
        "#;

        tera.add_raw_template(REGISTRATION_HTML, registration_html)
            .map_err(|e| AppError::Configuration(format!("Failed to add HTML template: {}", e)))?;

        tera.add_raw_template(REGISTRATION_TEXT, registration_text)
            .map_err(|e| AppError::Configuration(format!("Failed to add text template: {}", e)))?;

        Ok(())
    }

    /// Render the (text, html) bodies of the registration email
    fn render_registration(&self, to_email: &str, first_name: &str) -> AppResult<(String, String)> {
        let mut context = Context::new();
        context.insert("first_name", first_name);
        context.insert("email", to_email);
        context.insert("app_name", &self.config.from_name);
        context.insert("current_year", &chrono::Utc::now().year());

        let text_body = self
            .templates
            .render(REGISTRATION_TEXT, &context)
            .map_err(|e| AppError::Internal(format!("Failed to render text template: {}", e)))?;

        let html_body = self
            .templates
            .render(REGISTRATION_HTML, &context)
            .map_err(|e| AppError::Internal(format!("Failed to render HTML template: {}", e)))?;

        Ok((text_body, html_body))
    }

    fn build_registration_message(&self, to_email: &str, first_name: &str) -> AppResult<Message> {
        let (text_body, html_body) = self.render_registration(to_email, first_name)?;

        Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_email)
                    .parse()
                    .map_err(|e| AppError::Configuration(format!("Invalid from address: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::BadRequest(format!("Invalid recipient email: {}", e)))?)
            .subject(format!("Welcome to {}", self.config.from_name))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email message: {}", e)))
    }

    /// Send the registration confirmation email
    pub async fn send_registration_email(&self, to_email: &str, first_name: &str) -> AppResult<()> {
        info!("Sending registration email to: {}", to_email);

        let message = self.build_registration_message(to_email, first_name)?;

        match self.transport.send(message).await {
            Ok(_) => {
                info!("Registration email sent successfully to: {}", to_email);
                Ok(())
            }
            Err(e) => {
                error!("Failed to send registration email to {}: {}", to_email, e);
                Err(AppError::ExternalService(format!("Failed to send email: {}", e)))
            }
        }
    }
}

#[async_trait]
impl RegistrationNotifier for EmailService {
    async fn registration_success(&self, email: &str, first_name: &str) -> AppResult<()> {
        self.send_registration_email(email, first_name).await
    }
}
