//! Café assistant.
//!
//! Replies come from the OpenAI chat completion API when a key is configured
//! and from keyword rules otherwise, or whenever the remote call fails.

use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    config::BusinessInfo,
    models::{Product, Special},
};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-3.5-turbo";

pub struct ChatBot {
    business: BusinessInfo,
    openai_api_key: Option<String>,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    presence_penalty: f32,
    frequency_penalty: f32,
}

#[derive(Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionContent,
}

#[derive(Deserialize)]
struct CompletionContent {
    content: String,
}

impl ChatBot {
    pub fn new(business: BusinessInfo, openai_api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            business,
            openai_api_key,
            http,
        }
    }

    pub fn business(&self) -> &BusinessInfo {
        &self.business
    }

    pub fn openai_configured(&self) -> bool {
        self.openai_api_key.is_some()
    }

    /// Answer `message`, using `menu` as the catalog context.
    pub async fn respond(&self, message: &str, menu: &str) -> String {
        let message = message.trim();
        if message.is_empty() {
            return format!(
                "👋 ¡Hola! Soy el asistente virtual de {}. ¿En qué puedo ayudarte hoy?",
                self.business.name
            );
        }

        if let Some(key) = &self.openai_api_key {
            match self.ask_openai(key, message, menu).await {
                Ok(reply) => return reply,
                Err(err) => tracing::warn!(error = %err, "openai request failed, using rules"),
            }
        }

        self.rule_reply(message, menu)
    }

    async fn ask_openai(&self, key: &str, message: &str, menu: &str) -> anyhow::Result<String> {
        let system_prompt = self.system_prompt(menu);
        let request = CompletionRequest {
            model: OPENAI_MODEL,
            messages: vec![
                CompletionMessage {
                    role: "system",
                    content: &system_prompt,
                },
                CompletionMessage {
                    role: "user",
                    content: message,
                },
            ],
            max_tokens: 200,
            temperature: 0.7,
            presence_penalty: 0.1,
            frequency_penalty: 0.1,
        };

        let response: CompletionResponse = self
            .http
            .post(OPENAI_URL)
            .bearer_auth(key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut reply = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .context("completion returned no choices")?;

        let lower = message.to_lowercase();
        let needs_contact = ["reserva", "pedido", "alergia", "delivery"]
            .iter()
            .any(|kw| lower.contains(kw));
        if needs_contact && !reply.contains(&self.business.phone) {
            reply.push_str(&format!("\n\n📞 Para más información: {}", self.business.phone));
        }
        Ok(reply)
    }

    fn system_prompt(&self, menu: &str) -> String {
        let b = &self.business;
        format!(
            "Eres el asistente virtual de {name}, una cafetería moderna en Barcelona.\n\n\
             📍 INFORMACIÓN DEL NEGOCIO:\n\
             - Nombre: {name}\n- Horario: {hours}\n- Ubicación: {address}\n- Teléfono: {phone}\n\
             - Especialidad: Café de calidad, productos frescos, ambiente acogedor\n\n\
             {menu}\n\
             📋 INSTRUCCIONES:\n\
             - Responde SIEMPRE en español, de forma amigable y concisa (máximo 150 palabras)\n\
             - Si preguntan por productos, menciona precio y descripción\n\
             - Para reservas o pedidos complejos, deriva al teléfono de contacto\n\
             - Si mencionan alergias, recomienda hablar con el personal\n\n\
             📞 Para dudas complejas deriva siempre al: {phone}",
            name = b.name,
            hours = b.hours,
            address = b.address,
            phone = b.phone,
        )
    }

    /// Keyword replies; the first matching topic wins.
    pub fn rule_reply(&self, message: &str, menu: &str) -> String {
        let b = &self.business;
        let lower = message.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if has(&["hola", "buenas", "hey", "hi"]) {
            format!(
                "¡Hola! 👋 Bienvenido a {}. ¿En qué puedo ayudarte? Puedes preguntarme sobre nuestro menú, horarios o ubicación.",
                b.name
            )
        } else if has(&["menu", "menú", "carta", "comida", "bebida"]) {
            format!("📋 Aquí tienes nuestro menú:\n\n{menu}\n📞 Para pedidos: {}", b.phone)
        } else if has(&["precio", "cuesta", "coste"]) {
            format!(
                "💰 Los precios varían según el producto. Te recomiendo ver nuestro menú completo o llamarnos al {} para información específica.",
                b.phone
            )
        } else if has(&["horario", "abierto", "cerrado", "hora"]) {
            format!("🕒 Nuestro horario: {}\n📍 Ubicación: {}", b.hours, b.address)
        } else if has(&["donde", "dónde", "ubicacion", "ubicación", "direccion", "dirección"]) {
            format!(
                "📍 Nos encontramos en: {}\n🕒 Horario: {}\n📞 Teléfono: {}",
                b.address, b.hours, b.phone
            )
        } else if has(&["reserva", "mesa", "booking"]) {
            format!(
                "🍽️ Para reservas de mesa, por favor llámanos al {} o visítanos directamente en {}. ¡Te esperamos!",
                b.phone, b.address
            )
        } else if has(&["especial", "oferta", "promocion", "promoción"]) {
            format!(
                "🎉 Consulta nuestros especiales del día en nuestro menú. ¡Siempre tenemos ofertas deliciosas! Para más detalles, llámanos al {}",
                b.phone
            )
        } else {
            format!(
                "🤖 Soy el asistente virtual de {}. Puedo ayudarte con:\n• Ver nuestro menú\n• Información de horarios y ubicación\n• Precios y especiales\n\nPara consultas específicas: {}",
                b.name, b.phone
            )
        }
    }

    /// Canned reply used when the assistant cannot answer at all.
    pub fn error_reply(&self) -> String {
        format!(
            "Lo siento, estoy experimentando problemas técnicos. Por favor intenta más tarde o contacta directamente al {}.",
            self.business.phone
        )
    }
}

/// Render the available catalog, grouped by category, plus today's specials.
pub fn menu_context(cafe: &str, products: &[Product], specials: &[Special]) -> String {
    let mut text = format!("🍽️ MENÚ {cafe}:\n\n");

    let mut current: Option<&str> = None;
    for product in products {
        if current != Some(product.category.as_str()) {
            if current.is_some() {
                text.push('\n');
            }
            text.push_str(&format!("📂 {}:\n", product.category.to_uppercase()));
            current = Some(product.category.as_str());
        }
        text.push_str(&format!(
            "• {}: {} - €{:.2}\n",
            product.name,
            describe(&product.description),
            product.price
        ));
    }
    if current.is_some() {
        text.push('\n');
    }

    if !specials.is_empty() {
        text.push_str("🎉 ESPECIALES DEL DÍA:\n");
        for special in specials {
            text.push_str(&format!(
                "• {}: {} - €{:.2} (antes €{:.2}, -{}% descuento)\n",
                special.product.name,
                describe(&special.product.description),
                special.discounted_price(),
                special.product.price,
                special.discount
            ));
        }
        text.push('\n');
    }

    text
}

fn describe(description: &str) -> &str {
    if description.trim().is_empty() {
        "Sin descripción"
    } else {
        description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot() -> ChatBot {
        ChatBot::new(BusinessInfo::default(), None)
    }

    fn product(id: i64, name: &str, category: &str, price: f64) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: String::new(),
            price,
            category: category.to_string(),
            image: String::new(),
            available: true,
        }
    }

    #[test]
    fn greeting_wins_over_later_topics() {
        let reply = bot().rule_reply("Hola, ¿qué horario tenéis?", "");
        assert!(reply.starts_with("¡Hola!"));
    }

    #[test]
    fn hours_reply_quotes_business_hours() {
        let reply = bot().rule_reply("¿A qué hora abren?", "");
        assert!(reply.contains("Lunes a Domingo 7:00-22:00"));
    }

    #[test]
    fn menu_reply_embeds_context() {
        let reply = bot().rule_reply("quiero ver la carta", "MENU-CONTEXT");
        assert!(reply.contains("MENU-CONTEXT"));
        assert!(reply.contains("+34 611 59 46 43"));
    }

    #[test]
    fn unknown_topic_gets_help_text() {
        let reply = bot().rule_reply("xyz", "");
        assert!(reply.contains("Puedo ayudarte con"));
    }

    #[tokio::test]
    async fn blank_message_gets_welcome() {
        let reply = bot().respond("   ", "").await;
        assert!(reply.contains("¿En qué puedo ayudarte hoy?"));
    }

    #[test]
    fn menu_context_groups_by_category_and_lists_specials() {
        let coffee = product(1, "Americano", "bebidas", 2.8);
        let cake = product(2, "Tarta", "postres", 4.0);
        let special = Special {
            id: 1,
            product: cake.clone(),
            discount: 25.0,
            date: "2025-01-01".to_string(),
        };

        let text = menu_context("Café Demo", &[coffee, cake], &[special]);
        assert!(text.contains("📂 BEBIDAS:\n• Americano: Sin descripción - €2.80"));
        assert!(text.contains("📂 POSTRES:"));
        assert!(text.contains("• Tarta: Sin descripción - €3.00 (antes €4.00, -25% descuento)"));
    }
}
