use serde::{Deserialize, Serialize};

/// Short weekday names used in the rendered schedule, indexed by
/// `day_of_week` (0 = Monday .. 6 = Sunday).
pub const WEEKDAYS: [&str; 7] = [
    "Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado", "Domingo",
];

/// Full weekday names used by the date reply.
pub const WEEKDAYS_LONG: [&str; 7] = [
    "segunda-feira",
    "terça-feira",
    "quarta-feira",
    "quinta-feira",
    "sexta-feira",
    "sábado",
    "domingo",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub id: i64,
    pub studio_name: String,
    pub address: String,
    pub phone: String,
    pub whatsapp: String,
    pub website: Option<String>,
    pub bot_tone: String,
    pub bot_intro_message: String,
    pub services: Vec<ServiceOffering>,
    pub hours: Vec<OperatingHours>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub duration_minutes: i64,
    pub description: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatingHours {
    pub day_of_week: usize,
    pub open_time: String,
    pub close_time: String,
    pub is_closed: bool,
}

impl BusinessProfile {
    /// Built-in profile used whenever no business record can be loaded.
    /// The engine always operates on a complete profile.
    pub fn fallback() -> Self {
        Self {
            id: 0,
            studio_name: "Meu Studio de Sobrancelhas".to_string(),
            address: "Endereço não configurado".to_string(),
            phone: "(11) 99999-9999".to_string(),
            whatsapp: "(11) 99999-9999".to_string(),
            website: None,
            bot_tone: "Seja simpática, profissional e prestativa.".to_string(),
            bot_intro_message:
                "Olá! Seja bem-vinda ao nosso studio! Como posso ajudar você hoje? 😊".to_string(),
            services: vec![
                ServiceOffering {
                    id: 1,
                    name: "Design de Sobrancelhas".to_string(),
                    price: 50.0,
                    duration_minutes: 60,
                    description: None,
                    active: true,
                },
                ServiceOffering {
                    id: 2,
                    name: "Henna".to_string(),
                    price: 30.0,
                    duration_minutes: 45,
                    description: None,
                    active: true,
                },
                ServiceOffering {
                    id: 3,
                    name: "Micropigmentação".to_string(),
                    price: 200.0,
                    duration_minutes: 120,
                    description: None,
                    active: true,
                },
            ],
            hours: Self::default_hours(),
        }
    }

    /// Mon–Fri 09:00–18:00, Sat 09:00–16:00, Sun closed.
    pub fn default_hours() -> Vec<OperatingHours> {
        (0..7)
            .map(|day| OperatingHours {
                day_of_week: day,
                open_time: if day == 6 {
                    String::new()
                } else {
                    "09:00".to_string()
                },
                close_time: match day {
                    6 => String::new(),
                    5 => "16:00".to_string(),
                    _ => "18:00".to_string(),
                },
                is_closed: day == 6,
            })
            .collect()
    }
}
