use crate::models::Intent;

// Single-word greetings match as whole tokens only; "oi" inside
// "proibido" must not greet. Multi-word forms match as phrases.
const GREETING_TOKENS: &[&str] = &["oi", "olá", "ola", "hello", "hi", "hey"];
const GREETING_PHRASES: &[&str] = &["bom dia", "boa tarde", "boa noite"];

/// Substring rules checked in this exact order after greeting; the first
/// matching rule wins. Reordering changes tie-breaks and is a behavior
/// change, not a cleanup.
const KEYWORD_RULES: &[(Intent, &[&str])] = &[
    (
        Intent::Hours,
        &[
            "horário",
            "horario",
            "quando",
            "abre",
            "fecha",
            "funcionamento",
            "aberto",
        ],
    ),
    (
        Intent::Price,
        &["quanto custa", "preço", "valor", "precos", "quanto é"],
    ),
    (
        Intent::Services,
        &[
            "serviço",
            "servico",
            "procedimento",
            "oferece",
            "fazem",
            "disponível",
        ],
    ),
    (
        Intent::Contact,
        &["contato", "telefone", "whatsapp", "ligar", "zap"],
    ),
    (
        Intent::Location,
        &[
            "onde",
            "endereço",
            "endereco",
            "localização",
            "localizacao",
            "fica",
        ],
    ),
    (
        Intent::Booking,
        &["agendar", "agendamento", "marcar", "horário disponível"],
    ),
    (
        Intent::Help,
        &["ajuda", "ajudar", "help", "dúvida", "duvida"],
    ),
    (Intent::Date, &["que dia", "hoje", "data"]),
];

pub fn classify(text: &str) -> Intent {
    let lowered = text.to_lowercase();

    if is_greeting(&lowered) {
        return Intent::Greeting;
    }

    for (intent, keywords) in KEYWORD_RULES {
        if keywords.iter().any(|kw| lowered.contains(kw)) {
            return *intent;
        }
    }

    Intent::Unknown
}

fn is_greeting(lowered: &str) -> bool {
    tokens(lowered).any(|t| GREETING_TOKENS.contains(&t))
        || GREETING_PHRASES.iter().any(|p| lowered.contains(p))
}

/// Words of the message with punctuation stripped. Expects lowercased
/// input.
pub fn tokens(lowered: &str) -> impl Iterator<Item = &str> {
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_matches_whole_tokens() {
        assert_eq!(classify("oi"), Intent::Greeting);
        assert_eq!(classify("Oi, tudo bem?"), Intent::Greeting);
        assert_eq!(classify("Olá!"), Intent::Greeting);
        // "oi" inside a longer word is not a greeting
        assert_eq!(classify("foi proibido"), Intent::Unknown);
    }

    #[test]
    fn multi_word_greetings_match_as_phrases() {
        assert_eq!(classify("Oi, bom dia!"), Intent::Greeting);
        assert_eq!(classify("boa tarde"), Intent::Greeting);
        assert_eq!(classify("Boa noite, ainda atendem?"), Intent::Greeting);
    }

    #[test]
    fn greeting_wins_ties_with_every_other_intent() {
        assert_eq!(classify("oi, quanto custa?"), Intent::Greeting);
        assert_eq!(classify("olá, qual o horário?"), Intent::Greeting);
        assert_eq!(classify("oi, onde fica?"), Intent::Greeting);
        assert_eq!(classify("bom dia, quero agendar"), Intent::Greeting);
    }

    #[test]
    fn fixed_priority_order_breaks_ties() {
        // hours before price
        assert_eq!(classify("qual o horário e o preço?"), Intent::Hours);
        // price before services
        assert_eq!(classify("preço dos serviços"), Intent::Price);
        // services before contact
        assert_eq!(classify("quais serviços, me passa o telefone"), Intent::Services);
        // contact before location
        assert_eq!(classify("telefone e endereço"), Intent::Contact);
        // location before booking
        assert_eq!(classify("onde fica para marcar"), Intent::Location);
        // booking before help
        assert_eq!(classify("quero agendar, me ajuda"), Intent::Booking);
        // help before date
        assert_eq!(classify("ajuda hoje"), Intent::Help);
    }

    #[test]
    fn classifies_each_intent() {
        assert_eq!(classify("quando vocês abrem?"), Intent::Hours);
        assert_eq!(classify("quanto custa a henna?"), Intent::Price);
        assert_eq!(classify("qual o valor?"), Intent::Price);
        assert_eq!(classify("que procedimentos vocês fazem?"), Intent::Services);
        assert_eq!(classify("qual o whatsapp de vocês?"), Intent::Contact);
        assert_eq!(classify("onde vocês ficam?"), Intent::Location);
        assert_eq!(classify("quero marcar um horário amanhã"), Intent::Hours);
        assert_eq!(classify("gostaria de agendar"), Intent::Booking);
        assert_eq!(classify("preciso de ajuda"), Intent::Help);
        assert_eq!(classify("que dia é hoje?"), Intent::Date);
    }

    #[test]
    fn unmatched_text_is_unknown() {
        assert_eq!(classify("xyz"), Intent::Unknown);
        assert_eq!(classify(""), Intent::Unknown);
        assert_eq!(classify("me conta mais sobre a micropigmentação"), Intent::Unknown);
    }
}
