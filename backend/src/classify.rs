use shared::AlertCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub color: &'static str,
    pub description: &'static str,
    pub category: Option<AlertCategory>,
}

/// Map a WMO weather code to its segment color, display label and alert
/// category. Total over any integer: codes outside the table (negative,
/// above 99, reserved gaps) fall through to the unknown bucket.
pub fn classify(code: i32) -> Classification {
    use AlertCategory::*;

    let (color, description, category) = match code {
        0 => ("#22c55e", "Clear", None),
        1..=3 => ("#4ade80", "Cloudy", None),
        45 | 48 => ("#9ca3af", "Fog", Some(Fog)),
        51..=57 => ("#93c5fd", "Drizzle", Some(Rain)),
        61 | 80 => ("#60a5fa", "Light rain", Some(Rain)),
        63 | 81 => ("#3b82f6", "Rain", Some(Rain)),
        65 | 66 | 67 | 82 => ("#1e40af", "Heavy rain", Some(HeavyRain)),
        71 | 85 => ("#c7d2fe", "Light snow", Some(Snow)),
        73 => ("#a5b4fc", "Snow", Some(Snow)),
        75 | 77 | 86 => ("#6366f1", "Heavy snow", Some(HeavySnow)),
        95.. => ("#7c3aed", "Thunderstorm", Some(Thunderstorm)),
        _ => ("#6b7280", "Unknown", None),
    };

    Classification {
        color,
        description,
        category,
    }
}
