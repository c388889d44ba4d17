use crate::models::business::{WEEKDAYS, WEEKDAYS_LONG};
use crate::models::{OperatingHours, ServiceOffering};

pub fn format_price(price: f64) -> String {
    format!("R$ {price:.2}")
}

/// Bullet list shown in the services/price replies.
pub fn services_bullets(services: &[ServiceOffering]) -> String {
    if services.is_empty() {
        return "Ainda não temos serviços cadastrados.".to_string();
    }

    let mut text = String::new();
    for service in services {
        text.push_str(&format!(
            "• {}: {} (duração: {}min)\n",
            service.name,
            format_price(service.price),
            service.duration_minutes
        ));
        if let Some(description) = &service.description {
            if !description.is_empty() {
                text.push_str(&format!("  {description}\n"));
            }
        }
    }
    text.trim_end().to_string()
}

/// Compact catalog lines embedded in the completion system prompt.
pub fn catalog_lines(services: &[ServiceOffering]) -> String {
    services
        .iter()
        .map(|s| {
            format!(
                "- {}: {} ({}min)",
                s.name,
                format_price(s.price),
                s.duration_minutes
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Weekly schedule, Monday first, with the current day marked.
pub fn weekly_schedule(hours: &[OperatingHours], today: usize) -> String {
    let mut text = String::new();
    for hour in hours {
        let mut day_name = WEEKDAYS[hour.day_of_week].to_string();
        if hour.day_of_week == today {
            day_name.push_str(" (HOJE)");
        }

        if hour.is_closed {
            text.push_str(&format!("{day_name}: Fechado\n"));
        } else {
            text.push_str(&format!(
                "{day_name}: {} - {}\n",
                hour.open_time, hour.close_time
            ));
        }
    }
    text.trim_end().to_string()
}

pub fn weekday_long(day: usize) -> &'static str {
    WEEKDAYS_LONG[day.min(6)]
}
