use serde::Serialize;

/// Length of the client-side countdown on a training page.
pub const TIMER_SECONDS: u32 = 30 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrainingTemplate {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub static TEMPLATES: [TrainingTemplate; 3] = [
    TrainingTemplate {
        slug: "cardio",
        title: "Cardio",
        description: "A workout for the heart and lungs.",
    },
    TrainingTemplate {
        slug: "strength",
        title: "Strength",
        description: "Build strength and muscle.",
    },
    TrainingTemplate {
        slug: "yoga",
        title: "Yoga",
        description: "Strengthen the body and calm the mind.",
    },
];

pub fn find(slug: &str) -> Option<&'static TrainingTemplate> {
    let slug = slug.trim();
    TEMPLATES.iter().find(|t| t.slug.eq_ignore_ascii_case(slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_spaces() {
        assert_eq!(find("Yoga").map(|t| t.title), Some("Yoga"));
        assert_eq!(find(" cardio ").map(|t| t.slug), Some("cardio"));
        assert!(find("pilates").is_none());
    }
}
