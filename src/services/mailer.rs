// Envoi des codes de vérification par email.
// Le transport réel est un relais HTTP externe ; sans relais configuré on se contente de logger.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::MailConfig;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail relay request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail relay answered {0}")]
    Rejected(reqwest::StatusCode),
}

//trait = Interface
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), MailError>;
}

/// Message posté au relais
#[derive(Debug, Serialize)]
struct OutgoingMail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: String,
}

pub struct HttpMailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), MailError> {
        let mail = OutgoingMail {
            from: &self.config.from,
            to,
            subject: "Restablecimiento de Contraseña",
            html: verification_body(code),
        };

        let mut request = self.client.post(&self.config.api_url).json(&mail);
        if let Some(user) = &self.config.user {
            request = request.basic_auth(user, self.config.pass.as_ref());
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(MailError::Rejected(response.status()));
        }

        info!(to = %to, "verification code sent");
        Ok(())
    }
}

/// Utilisé quand MAIL_API_URL n'est pas défini (dev local).
/// Le code n'apparaît qu'en debug (RUST_LOG=debug).
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), MailError> {
        info!(to = %to, "no mail relay configured, verification code not delivered");
        debug!(to = %to, code = %code, "verification code");
        Ok(())
    }
}

fn verification_body(code: &str) -> String {
    format!(
        "<h3>Solicitud de restablecimiento de contraseña</h3>\
         <p>Tu código de verificación es:</p>\
         <p><strong>{}</strong></p>\
         <p>El código expira en 1 hora.</p>",
        code
    )
}
