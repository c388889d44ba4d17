use std::sync::{Arc, Mutex};

use chrono::{Datelike, Local};
use rusqlite::Connection;

use crate::models::{BusinessProfile, ChatSession, Intent, ServiceOffering};
use crate::services::ai::prompt::{self, STATIC_FALLBACK};
use crate::services::ai::CompletionProvider;
use crate::services::bot::intent;
use crate::services::bot::render;
use crate::services::bot::session::SessionStore;
use crate::services::profile;

/// The chatbot engine: classifies each message, consults and updates the
/// per-session state, and renders the reply from the current business
/// profile. Every path ends in a user-facing Portuguese string; errors
/// are recovered internally and at most logged.
pub struct BotEngine {
    db: Arc<Mutex<Connection>>,
    business_id: i64,
    completion: Option<Box<dyn CompletionProvider>>,
    sessions: SessionStore,
}

impl BotEngine {
    pub fn new(
        db: Arc<Mutex<Connection>>,
        business_id: i64,
        completion: Option<Box<dyn CompletionProvider>>,
    ) -> Self {
        Self {
            db,
            business_id,
            completion,
            sessions: SessionStore::new(),
        }
    }

    pub async fn handle_message(&self, session_key: &str, text: &str) -> String {
        let text = text.trim();
        if text.is_empty() {
            return STATIC_FALLBACK.to_string();
        }

        // Re-fetched every message so admin edits apply immediately.
        let profile = profile::load_profile(&self.db, self.business_id);

        let session_handle = self.sessions.get_or_create(session_key);
        let mut session = session_handle.lock().await;

        session.append_history(text);

        let detected = intent::classify(text);
        tracing::info!(
            session = session_key,
            intent = detected.as_str(),
            "processing message"
        );

        self.compose(&profile, &mut session, detected, text).await
    }

    /// True when an existing session was cleared.
    pub fn reset_session(&self, session_key: &str) -> bool {
        self.sessions.reset(session_key)
    }

    async fn compose(
        &self,
        profile: &BusinessProfile,
        session: &mut ChatSession,
        detected: Intent,
        text: &str,
    ) -> String {
        match detected {
            Intent::Greeting => match session.record_greeting() {
                1 => {
                    if profile.bot_intro_message.is_empty() {
                        format!(
                            "Olá! Seja bem-vinda ao {}! 😊 Como posso ajudar você hoje?",
                            profile.studio_name
                        )
                    } else {
                        profile.bot_intro_message.clone()
                    }
                }
                2 => "Oi novamente! 😊 Em que posso ajudar? Temos diversos serviços de \
                      sobrancelhas e cílios disponíveis."
                    .to_string(),
                _ => "Olá! Vejo que está tentando cumprimentar várias vezes. Posso te ajudar \
                      com informações sobre nossos serviços, preços ou agendamento? 😊"
                    .to_string(),
            },

            Intent::Hours => format!(
                "Nossos horários de funcionamento:\n\n{}\n\nPara agendar, entre em contato \
                 pelo WhatsApp: {} 📱",
                render::weekly_schedule(&profile.hours, today_weekday()),
                profile.whatsapp
            ),

            Intent::Services => format!(
                "Nossos serviços:\n\n{}\n\nQual serviço te interessou? 😊",
                render::services_bullets(&profile.services)
            ),

            Intent::Price => match find_service(&profile.services, text) {
                Some(service) => self.price_reply(profile, session, service),
                None => format!(
                    "Aqui estão nossos preços:\n\n{}\n\nQual serviço você gostaria de saber \
                     mais detalhes?",
                    render::services_bullets(&profile.services)
                ),
            },

            Intent::Contact => {
                let mut contact = format!(
                    "📱 WhatsApp: {}\n📞 Telefone: {}",
                    profile.whatsapp, profile.phone
                );
                if let Some(website) = &profile.website {
                    if !website.is_empty() {
                        contact.push_str(&format!("\n🌐 Site: {website}"));
                    }
                }
                format!(
                    "Entre em contato conosco:\n\n{contact}\n\nPrefere agendar por WhatsApp \
                     para atendimento mais rápido!"
                )
            }

            Intent::Location => format!(
                "📍 Estamos localizados em:\n{}\n\nFácil acesso e estacionamento próximo!",
                profile.address
            ),

            Intent::Booking => format!(
                "Para agendar seu horário, entre em contato pelo WhatsApp: {} 📱\n\nNosso \
                 atendimento é rápido e personalizado!",
                profile.whatsapp
            ),

            Intent::Help => "Posso te ajudar com:\n• Informações sobre serviços e preços\n\
                             • Horários de funcionamento\n• Localização do studio\n\
                             • Contato para agendamento\n\nO que você gostaria de saber? 😊"
                .to_string(),

            Intent::Date => {
                let now = Local::now();
                format!(
                    "Hoje é {}, {}. Confira nossos horários de funcionamento acima! Estamos \
                     prontas para te atender. 💅",
                    render::weekday_long(today_weekday()),
                    now.format("%d/%m/%Y")
                )
            }

            Intent::Unknown => match find_service(&profile.services, text) {
                Some(service) => self.service_detail_reply(profile, session, service),
                None => {
                    prompt::generate_fallback(
                        self.completion.as_deref(),
                        profile,
                        &session.history,
                        text,
                        today_weekday(),
                    )
                    .await
                }
            },
        }
    }

    // Price question naming a known service: quote it and remember that
    // it was discussed; repeats get the shorter acknowledgement.
    fn price_reply(
        &self,
        profile: &BusinessProfile,
        session: &mut ChatSession,
        service: &ServiceOffering,
    ) -> String {
        if !session.mark_service_discussed(service.id) {
            return already_discussed_reply(service);
        }

        format!(
            "{}: {}\nDuração: {} minutos\n\nGostaria de agendar este serviço? Entre em \
             contato pelo WhatsApp: {}",
            service.name,
            render::format_price(service.price),
            service.duration_minutes,
            profile.whatsapp
        )
    }

    fn service_detail_reply(
        &self,
        profile: &BusinessProfile,
        session: &mut ChatSession,
        service: &ServiceOffering,
    ) -> String {
        if !session.mark_service_discussed(service.id) {
            return already_discussed_reply(service);
        }

        let mut reply = format!(
            "✨ {} ✨\n💰 {}\n⏱️ Duração: {} minutos",
            service.name,
            render::format_price(service.price),
            service.duration_minutes
        );
        if let Some(description) = &service.description {
            if !description.is_empty() {
                reply.push_str(&format!("\n\n{description}"));
            }
        }
        reply.push_str(&format!(
            "\n\nPara agendar, chame no WhatsApp: {}",
            profile.whatsapp
        ));
        reply
    }
}

fn already_discussed_reply(service: &ServiceOffering) -> String {
    format!(
        "Já conversamos sobre {}! 😊\n{} - {} minutos\n\nQuer agendar ou conhecer outro \
         serviço?",
        service.name,
        render::format_price(service.price),
        service.duration_minutes
    )
}

/// Matches when the full service name appears in the message or any word
/// of the name appears as a whole token. First catalog entry wins;
/// ambiguous multi-service messages are not disambiguated.
fn find_service<'a>(
    services: &'a [ServiceOffering],
    text: &str,
) -> Option<&'a ServiceOffering> {
    let lowered = text.to_lowercase();
    services.iter().find(|service| {
        let name = service.name.to_lowercase();
        lowered.contains(&name)
            || name
                .split_whitespace()
                .any(|word| intent::tokens(&lowered).any(|token| token == word))
    })
}

fn today_weekday() -> usize {
    Local::now().weekday().num_days_from_monday() as usize
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::db;
    use crate::db::queries;
    use crate::models::business::WEEKDAYS;
    use crate::services::ai::Message;

    struct FailingProvider;

    #[async_trait]
    impl CompletionProvider for FailingProvider {
        async fn chat(&self, _system: &str, _messages: &[Message]) -> anyhow::Result<String> {
            anyhow::bail!("network unreachable")
        }
    }

    struct CannedProvider(&'static str);

    #[async_trait]
    impl CompletionProvider for CannedProvider {
        async fn chat(&self, _system: &str, _messages: &[Message]) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn engine() -> BotEngine {
        let conn = db::init_db(":memory:").unwrap();
        BotEngine::new(Arc::new(Mutex::new(conn)), 1, None)
    }

    fn engine_with(provider: Box<dyn CompletionProvider>) -> BotEngine {
        let conn = db::init_db(":memory:").unwrap();
        BotEngine::new(Arc::new(Mutex::new(conn)), 1, Some(provider))
    }

    #[tokio::test]
    async fn first_greeting_returns_intro_verbatim() {
        let bot = engine();
        let reply = bot.handle_message("s1", "Oi, bom dia!").await;
        assert_eq!(reply, BusinessProfile::fallback().bot_intro_message);
    }

    #[tokio::test]
    async fn greeting_count_selects_the_branch() {
        let bot = engine();
        let first = bot.handle_message("s1", "oi").await;
        let second = bot.handle_message("s1", "olá").await;
        let third = bot.handle_message("s1", "oi de novo").await;
        let fourth = bot.handle_message("s1", "oi").await;
        let fifth = bot.handle_message("s1", "olá!!").await;

        assert!(first.contains("bem-vinda"));
        assert!(second.contains("Oi novamente"));
        assert!(third.contains("cumprimentar várias vezes"));
        assert_eq!(fourth, third);
        assert_eq!(fifth, third);
    }

    #[tokio::test]
    async fn greetings_are_tracked_per_session() {
        let bot = engine();
        let a = bot.handle_message("a", "oi").await;
        let b = bot.handle_message("b", "oi").await;
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn hours_reply_lists_week_in_order() {
        let bot = engine();
        let reply = bot.handle_message("s1", "qual o horário de vocês?").await;

        let positions: Vec<usize> = WEEKDAYS
            .iter()
            .map(|day| reply.find(day).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);

        assert!(reply.contains("Fechado"));
        assert!(reply.contains("(11) 99999-9999"));
    }

    #[tokio::test]
    async fn services_reply_is_a_priced_bullet_list() {
        let bot = engine();
        let reply = bot.handle_message("s1", "quais serviços vocês fazem?").await;
        assert!(reply.contains("• Design de Sobrancelhas: R$ 50.00 (duração: 60min)"));
        assert!(reply.contains("• Henna: R$ 30.00 (duração: 45min)"));
        assert!(reply.contains("• Micropigmentação: R$ 200.00 (duração: 120min)"));
    }

    #[tokio::test]
    async fn price_question_with_service_quotes_and_marks_it() {
        let bot = engine();
        let first = bot.handle_message("s1", "quanto custa a henna?").await;
        assert!(first.contains("Henna: R$ 30.00"));
        assert!(first.contains("Duração: 45 minutos"));

        let second = bot.handle_message("s1", "quanto custa a henna?").await;
        assert!(second.contains("Já conversamos sobre Henna"));
        assert!(second.contains("R$ 30.00 - 45 minutos"));
    }

    #[tokio::test]
    async fn price_question_without_service_lists_everything() {
        let bot = engine();
        let reply = bot.handle_message("s1", "qual o valor?").await;
        assert!(reply.contains("Aqui estão nossos preços"));
        assert!(reply.contains("Henna"));
        assert!(reply.contains("Micropigmentação"));
    }

    #[tokio::test]
    async fn direct_service_mention_gets_full_detail_once() {
        let bot = engine();
        let first = bot.handle_message("s1", "me conta sobre a micropigmentação").await;
        assert!(first.contains("✨ Micropigmentação ✨"));
        assert!(first.contains("💰 R$ 200.00"));
        assert!(first.contains("⏱️ Duração: 120 minutos"));

        let second = bot.handle_message("s1", "e a micropigmentação?").await;
        assert!(second.contains("Já conversamos sobre Micropigmentação"));
    }

    #[tokio::test]
    async fn service_matches_on_single_name_word() {
        let bot = engine();
        // "Design de Sobrancelhas" matched through the token "design"
        let reply = bot.handle_message("s1", "queria fazer um design").await;
        assert!(reply.contains("✨ Design de Sobrancelhas ✨"));
    }

    #[tokio::test]
    async fn unknown_without_provider_returns_menu() {
        let bot = engine();
        let reply = bot.handle_message("s1", "xyzzy").await;
        assert_eq!(reply, STATIC_FALLBACK);
    }

    #[tokio::test]
    async fn unknown_with_provider_uses_completion() {
        let bot = engine_with(Box::new(CannedProvider("Claro, posso explicar!")));
        let reply = bot.handle_message("s1", "vocês atendem crianças?").await;
        assert_eq!(reply, "Claro, posso explicar!");
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_menu() {
        let bot = engine_with(Box::new(FailingProvider));
        let reply = bot.handle_message("s1", "vocês atendem crianças?").await;
        assert_eq!(reply, STATIC_FALLBACK);
    }

    #[tokio::test]
    async fn empty_message_returns_menu_without_touching_provider() {
        // If the provider were reached, its canned reply would leak out
        let bot = engine_with(Box::new(CannedProvider("não deveria aparecer")));
        let reply = bot.handle_message("s1", "   ").await;
        assert_eq!(reply, STATIC_FALLBACK);
    }

    #[tokio::test]
    async fn contact_includes_website_only_when_set() {
        let bot = engine();
        let reply = bot.handle_message("s1", "qual o contato?").await;
        assert!(reply.contains("📱 WhatsApp:"));
        assert!(reply.contains("📞 Telefone:"));
        assert!(!reply.contains("🌐 Site:"));
    }

    #[tokio::test]
    async fn date_reply_names_the_weekday() {
        let bot = engine();
        let reply = bot.handle_message("s1", "que dia é hoje?").await;
        assert!(reply.starts_with("Hoje é "));
        assert!(reply.contains("💅"));
    }

    #[tokio::test]
    async fn reset_clears_session_state() {
        let bot = engine();
        bot.handle_message("s1", "oi").await;
        assert!(bot.reset_session("s1"));
        assert!(!bot.reset_session("s1"));

        // Fresh session greets with the intro again
        let reply = bot.handle_message("s1", "oi").await;
        assert!(reply.contains("bem-vinda"));
    }

    #[tokio::test]
    async fn profile_edits_show_up_on_the_next_message() {
        let conn = db::init_db(":memory:").unwrap();
        let db = Arc::new(Mutex::new(conn));
        let id = {
            let conn = db.lock().unwrap();
            queries::seed_default_business(&conn).unwrap()
        };
        let bot = BotEngine::new(Arc::clone(&db), id, None);

        {
            let conn = db.lock().unwrap();
            queries::insert_service(&conn, id, "Buço", 15.0, 20, None).unwrap();
        }

        let reply = bot.handle_message("s1", "quais serviços vocês oferecem?").await;
        assert!(reply.contains("• Buço: R$ 15.00 (duração: 20min)"));
    }
}
