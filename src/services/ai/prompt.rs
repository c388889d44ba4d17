use crate::models::{BusinessProfile, HistoryEntry};
use crate::services::ai::{CompletionProvider, Message};
use crate::services::bot::render;

/// Menu returned whenever no reply can be composed: unmatched intent
/// without a provider, provider failure, or empty input.
pub const STATIC_FALLBACK: &str = "Não entendi sua pergunta. 🤔 Posso te ajudar com:\n\
• Nossos serviços e preços\n\
• Horários de funcionamento\n\
• Agendamento via WhatsApp\n\
• Localização\n\n\
O que você gostaria de saber?";

/// Only this many history entries are fed back to the model.
const HISTORY_WINDOW: usize = 3;

/// Builds the system prompt from the current profile. The model is
/// constrained to the catalog and hours it is given; it never invents
/// services and always routes bookings to WhatsApp.
pub fn system_prompt(profile: &BusinessProfile, today: usize) -> String {
    let tone = if profile.bot_tone.is_empty() {
        "Profissional e amigável"
    } else {
        &profile.bot_tone
    };

    format!(
        "Você é uma atendente virtual do {name}.\n\n\
         REGRAS IMPORTANTES:\n\
         1. NUNCA invente serviços que não estão na lista abaixo\n\
         2. Seja consistente e profissional\n\
         3. Use APENAS as informações fornecidas\n\
         4. Responda APENAS em português brasileiro\n\
         5. Se repetir saudações, seja breve e sugira como pode ajudar\n\n\
         INFORMAÇÕES DO STUDIO:\n\
         Nome: {name}\n\
         Endereço: {address}\n\
         Telefone: {phone}\n\
         WhatsApp: {whatsapp}\n\n\
         SERVIÇOS DISPONÍVEIS (USE APENAS ESTES):\n\
         {services}\n\n\
         HORÁRIOS:\n\
         {hours}\n\n\
         TOM: {tone}\n\n\
         Para agendamentos, sempre direcione para o WhatsApp.",
        name = profile.studio_name,
        address = profile.address,
        phone = profile.phone,
        whatsapp = profile.whatsapp,
        services = render::catalog_lines(&profile.services),
        hours = render::weekly_schedule(&profile.hours, today),
        tone = tone,
    )
}

/// Delegates an unmatched message to the completion provider. Any
/// failure (network, auth, timeout, malformed reply) degrades to the
/// static menu; the caller never sees an error.
pub async fn generate_fallback(
    provider: Option<&dyn CompletionProvider>,
    profile: &BusinessProfile,
    history: &[HistoryEntry],
    current_message: &str,
    today: usize,
) -> String {
    let Some(provider) = provider else {
        return STATIC_FALLBACK.to_string();
    };

    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let context = history[start..]
        .iter()
        .map(|h| format!("User: {}", h.message))
        .collect::<Vec<_>>()
        .join("\n");

    let user_message = Message {
        role: "user".to_string(),
        content: format!("Contexto da conversa:\n{context}\n\nMensagem atual: {current_message}"),
    };

    match provider
        .chat(&system_prompt(profile, today), &[user_message])
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "completion provider failed, using static fallback");
            STATIC_FALLBACK.to_string()
        }
    }
}
