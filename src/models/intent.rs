#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Hours,
    Price,
    Services,
    Contact,
    Location,
    Booking,
    Help,
    Date,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Hours => "hours",
            Intent::Price => "price",
            Intent::Services => "services",
            Intent::Contact => "contact",
            Intent::Location => "location",
            Intent::Booking => "booking",
            Intent::Help => "help",
            Intent::Date => "date",
            Intent::Unknown => "unknown",
        }
    }
}
