//! Outgoing mail.
//!
//! Delivery sits behind [`Mailer`]. [`SmtpMailer`] talks to a STARTTLS relay
//! when SMTP credentials are configured; otherwise [`LogMailer`] writes each
//! message to the log.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::{
    config::SmtpSettings,
    models::{JobApplication, Order, Reservation},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: Mail) -> anyhow::Result<()>;
}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        let preview: String = mail.body.chars().take(200).collect();
        tracing::info!(to = %mail.to, subject = %mail.subject, body = %preview, "mail queued");
        Ok(())
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> anyhow::Result<Self> {
        let from = settings
            .from
            .parse::<Mailbox>()
            .with_context(|| format!("invalid sender address {}", settings.from))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)
            .with_context(|| format!("invalid SMTP relay {}", settings.server))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        let to = mail
            .to
            .parse::<Mailbox>()
            .with_context(|| format!("invalid recipient {}", mail.to))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

/// SMTP when credentials are configured, the log otherwise.
pub fn from_settings(smtp: Option<&SmtpSettings>) -> Arc<dyn Mailer> {
    let Some(settings) = smtp else {
        return Arc::new(LogMailer);
    };
    match SmtpMailer::new(settings) {
        Ok(mailer) => {
            tracing::info!(server = %settings.server, port = settings.port, "smtp delivery enabled");
            Arc::new(mailer)
        }
        Err(err) => {
            tracing::warn!(error = %err, "smtp setup failed, mail will only be logged");
            Arc::new(LogMailer)
        }
    }
}

/// Send and report success; failures are logged, never propagated.
pub async fn deliver(mailer: &dyn Mailer, mail: Mail) -> bool {
    let to = mail.to.clone();
    match mailer.send(mail).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, to = %to, "mail delivery failed");
            false
        }
    }
}

pub fn order_confirmation(cafe: &str, order: &Order) -> Mail {
    let mut body = format!(
        "Hola {},\n\nGracias por tu pedido en {cafe}.\n\nPedido #{}\n\n",
        order.customer_name, order.id
    );
    body.push_str(&order_lines(order));
    body.push_str(&format!("\nTOTAL: €{:.2}\n", order.total_amount));
    if let Some(notes) = &order.notes {
        body.push_str(&format!("\nNotas: {notes}\n"));
    }
    body.push_str(&format!(
        "\nTe contactaremos al {} cuando esté listo para recoger.\n",
        order.customer_phone.as_deref().unwrap_or("email proporcionado")
    ));
    Mail {
        to: order.customer_email.clone(),
        subject: format!("¡Pedido confirmado #{}! - {cafe}", order.id),
        body,
    }
}

pub fn order_admin_alert(admin: &str, order: &Order) -> Mail {
    let mut body = format!(
        "Nuevo pedido #{}\nCliente: {}\nEmail: {}\nTeléfono: {}\n\n",
        order.id,
        order.customer_name,
        order.customer_email,
        order.customer_phone.as_deref().unwrap_or("No proporcionado")
    );
    body.push_str(&order_lines(order));
    body.push_str(&format!("\nTOTAL: €{:.2}\n", order.total_amount));
    body.push_str(&format!(
        "\n{}\n",
        order
            .notes
            .as_deref()
            .map(|n| format!("Notas del cliente: {n}"))
            .unwrap_or_else(|| "Sin notas especiales".to_string())
    ));
    Mail {
        to: admin.to_string(),
        subject: format!("Nuevo Pedido #{} - {}", order.id, order.customer_name),
        body,
    }
}

fn order_lines(order: &Order) -> String {
    order
        .items
        .iter()
        .map(|item| {
            format!(
                "  • {} x{} - €{:.2}\n",
                item.product_name,
                item.quantity,
                item.price * f64::from(item.quantity)
            )
        })
        .collect()
}

pub fn reservation_confirmation(cafe: &str, phone: &str, reservation: &Reservation) -> Mail {
    let mut body = format!(
        "Hola {},\n\nTu reserva en {cafe} ha sido registrada.\n\n\
         Número de reserva: #{}\nFecha: {}\nHora: {}\nPersonas: {}\n",
        reservation.customer_name,
        reservation.id,
        reservation.reservation_date,
        reservation.reservation_time,
        reservation.party_size
    );
    if let Some(notes) = &reservation.notes {
        body.push_str(&format!("Notas: {notes}\n"));
    }
    body.push_str(&format!(
        "\nPara cambios o cancelaciones contáctanos con al menos 2 horas de antelación: {phone}\n"
    ));
    Mail {
        to: reservation.customer_email.clone(),
        subject: format!("¡Reserva confirmada #{}! - {cafe}", reservation.id),
        body,
    }
}

pub fn reservation_admin_alert(admin: &str, reservation: &Reservation) -> Mail {
    Mail {
        to: admin.to_string(),
        subject: format!(
            "Nueva Reserva #{} - {}",
            reservation.id, reservation.customer_name
        ),
        body: format!(
            "Cliente: {}\nEmail: {}\nTeléfono: {}\nFecha: {}\nHora: {}\nPersonas: {}\n{}\n",
            reservation.customer_name,
            reservation.customer_email,
            reservation.customer_phone,
            reservation.reservation_date,
            reservation.reservation_time,
            reservation.party_size,
            reservation
                .notes
                .as_deref()
                .map(|n| format!("Notas del cliente: {n}"))
                .unwrap_or_else(|| "Sin notas especiales".to_string())
        ),
    }
}

pub fn contact_admin_alert(admin: &str, name: &str, email: &str, subject: &str, message: &str) -> Mail {
    Mail {
        to: admin.to_string(),
        subject: format!("Nuevo mensaje de contacto: {subject}"),
        body: format!(
            "Nombre: {name}\nEmail: {email}\nAsunto: {subject}\n\nMensaje:\n{message}\n"
        ),
    }
}

pub fn newsletter_welcome(cafe: &str, email: &str, name: Option<&str>) -> Mail {
    Mail {
        to: email.to_string(),
        subject: format!("¡Bienvenido al Newsletter de {cafe}! ☕"),
        body: format!(
            "¡Hola {}!\n\nTe damos la bienvenida al newsletter de {cafe}.\n\
             Recibirás ofertas exclusivas, novedades y eventos.\n",
            name.unwrap_or("amigo cafetero")
        ),
    }
}

pub fn newsletter_admin_alert(admin: &str, email: &str, name: Option<&str>) -> Mail {
    Mail {
        to: admin.to_string(),
        subject: "Nueva suscripción al newsletter".to_string(),
        body: format!(
            "Email: {email}\nNombre: {}\n",
            name.unwrap_or("No proporcionado")
        ),
    }
}

pub fn newsletter_issue(cafe: &str, email: &str, name: Option<&str>, subject: &str, content: &str) -> Mail {
    Mail {
        to: email.to_string(),
        subject: subject.to_string(),
        body: format!(
            "Hola {},\n\n{content}\n\n¡Gracias por ser parte de {cafe}!",
            name.unwrap_or("amigo cafetero")
        ),
    }
}

pub fn job_admin_alert(admin: &str, application: &JobApplication) -> Mail {
    Mail {
        to: admin.to_string(),
        subject: format!("Nueva aplicación de trabajo: {}", application.position),
        body: format!(
            "Nombre: {}\nEmail: {}\nTeléfono: {}\nPosición: {}\n\nExperiencia:\n{}\n\nMotivación:\n{}\n\nCV: {}\n",
            application.name,
            application.email,
            application.phone,
            application.position,
            application.experience,
            application.motivation,
            application.cv_filename.as_deref().unwrap_or("No adjuntado")
        ),
    }
}

pub fn job_confirmation(cafe: &str, application: &JobApplication) -> Mail {
    Mail {
        to: application.email.clone(),
        subject: format!("¡Hemos recibido tu aplicación! - {cafe}"),
        body: format!(
            "Hola {},\n\nGracias por tu interés en {cafe}. Hemos recibido tu aplicación \
             para la posición de {}.\n\nNúmero de referencia: #{}\n",
            application.name, application.position, application.id
        ),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::OrderItem;

    fn smtp(from: &str) -> SmtpSettings {
        SmtpSettings {
            server: "smtp.example.com".into(),
            port: 587,
            username: "cafe@example.com".into(),
            password: "secret".into(),
            from: from.into(),
        }
    }

    #[tokio::test]
    async fn smtp_mailer_builds_from_settings() {
        assert!(SmtpMailer::new(&smtp("Café Demo <cafe@example.com>")).is_ok());
        assert!(SmtpMailer::new(&smtp("not an address")).is_err());
    }

    #[tokio::test]
    async fn smtp_mailer_rejects_bad_recipient_before_connecting() {
        let mailer = SmtpMailer::new(&smtp("cafe@example.com")).unwrap();
        let result = mailer
            .send(Mail {
                to: "nobody".into(),
                subject: "x".into(),
                body: "y".into(),
            })
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn order_confirmation_lists_line_totals() {
        let order = Order {
            id: 7,
            customer_name: "Ana".into(),
            customer_email: "ana@example.com".into(),
            customer_phone: None,
            items: vec![OrderItem {
                product_id: 1,
                product_name: "Americano".into(),
                quantity: 2,
                price: 2.8,
                notes: None,
            }],
            total_amount: 5.6,
            notes: None,
            status: "pending".into(),
            created_at: Utc::now(),
        };

        let mail = order_confirmation("Café Demo", &order);
        assert_eq!(mail.to, "ana@example.com");
        assert!(mail.subject.contains("#7"));
        assert!(mail.body.contains("Americano x2 - €5.60"));
        assert!(mail.body.contains("email proporcionado"));
    }
}
