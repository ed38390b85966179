//! Employee input form
//!
//! Human-friendly inputs translated into the feature mapping the model was
//! trained on. Some pipelines were saved with slightly different column
//! names, so the aliases are sent alongside each other.

use clap::Args;
use serde_json::{json, Map, Value};

pub const REASONS: [(u8, &str); 7] = [
    (1, "Infectious diseases"),
    (2, "Injury / poisoning"),
    (3, "Respiratory diseases"),
    (4, "Digestive diseases"),
    (5, "Pregnancy-related"),
    (23, "Medical consultation"),
    (28, "Other reasons"),
];

pub const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

pub const WEEKDAYS: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];
pub const SEASONS: [&str; 4] = ["Summer", "Autumn", "Winter", "Spring"];
pub const EDUCATION: [&str; 4] = ["High school", "Graduate", "Postgraduate", "PhD"];

/// Fixed values for numeric features the form does not ask about
pub const DEFAULT_FEATURES: [(&str, i64); 8] = [
    ("Transportation expense", 200),
    ("Distance from Residence to Work", 10),
    ("Work load Average/day", 250),
    ("Hit target", 95),
    ("Son", 1),
    ("Pet", 0),
    ("Weight", 70),
    ("Height", 170),
];

#[derive(Debug, Clone, Args)]
pub struct EmployeeInput {
    /// Reason for absence (1-5 medical groups, 23 consultation, 28 other)
    #[arg(long, default_value_t = 23, value_parser = parse_reason)]
    pub reason: u8,

    /// Month of absence (1-12)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=12))]
    pub month: u8,

    /// Day of the week (2 = Mon .. 6 = Fri)
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=6))]
    pub day: u8,

    /// Season (1 Summer, 2 Autumn, 3 Winter, 4 Spring)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub season: u8,

    /// Education (1 High school, 2 Graduate, 3 Postgraduate, 4 PhD)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub education: u8,

    /// Had a disciplinary failure
    #[arg(long)]
    pub disciplinary_failure: bool,

    /// Social drinker
    #[arg(long)]
    pub drinker: bool,

    /// Social smoker
    #[arg(long)]
    pub smoker: bool,

    /// Service time in years (0-40)
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u8).range(0..=40))]
    pub service_time: u8,

    /// Age (18-70); sent, but the server drops it before scoring
    #[arg(long, default_value_t = 35, value_parser = clap::value_parser!(u8).range(18..=70))]
    pub age: u8,

    /// Body mass index (15-40)
    #[arg(long, default_value_t = 24.5, value_parser = parse_bmi)]
    pub bmi: f64,
}

impl Default for EmployeeInput {
    fn default() -> Self {
        Self {
            reason: 23,
            month: 1,
            day: 2,
            season: 1,
            education: 1,
            disciplinary_failure: false,
            drinker: false,
            smoker: false,
            service_time: 8,
            age: 35,
            bmi: 24.5,
        }
    }
}

fn parse_reason(s: &str) -> Result<u8, String> {
    let code: u8 = s.parse().map_err(|_| format!("'{}' is not a reason code", s))?;
    if REASONS.iter().any(|(c, _)| *c == code) {
        Ok(code)
    } else {
        let known: Vec<String> = REASONS.iter().map(|(c, _)| c.to_string()).collect();
        Err(format!("unknown reason {}; expected one of {}", code, known.join(", ")))
    }
}

fn parse_bmi(s: &str) -> Result<f64, String> {
    let bmi: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if (15.0..=40.0).contains(&bmi) {
        Ok(bmi)
    } else {
        Err("BMI must be between 15 and 40".to_string())
    }
}

fn flag(b: bool) -> i64 {
    i64::from(b)
}

impl EmployeeInput {
    /// Feature mapping sent to `/predict`
    pub fn to_features(&self) -> Map<String, Value> {
        let mut features = Map::new();

        features.insert("Reason for absence".into(), json!(self.reason));
        features.insert("Month of absence".into(), json!(self.month));
        features.insert("Day of the week".into(), json!(self.day));
        features.insert("Day of week".into(), json!(self.day));
        features.insert("Seasons".into(), json!(self.season));
        features.insert("Education".into(), json!(self.education));
        features.insert("Disciplinary failure".into(), json!(flag(self.disciplinary_failure)));
        features.insert("Social drinker".into(), json!(flag(self.drinker)));
        features.insert("Social smoker".into(), json!(flag(self.smoker)));
        features.insert("Service time".into(), json!(self.service_time));
        features.insert("Age".into(), json!(self.age));
        features.insert("BMI".into(), json!(self.bmi));
        features.insert("Body mass index".into(), json!(self.bmi));

        for (name, value) in DEFAULT_FEATURES {
            features.insert(name.into(), json!(value));
        }

        features
    }

    /// One-line summary of the inputs, with codes translated
    pub fn describe(&self) -> String {
        let reason = REASONS
            .iter()
            .find(|(c, _)| *c == self.reason)
            .map(|(_, name)| *name)
            .unwrap_or("Unknown");
        let pick = |names: &[&'static str], idx: u8, base: u8| -> &'static str {
            names.get(usize::from(idx.saturating_sub(base))).copied().unwrap_or("?")
        };

        format!(
            "{} | {} | {} | {} | {} | service {}y | BMI {:.1}",
            reason,
            pick(&MONTHS, self.month, 1),
            pick(&WEEKDAYS, self.day, 2),
            pick(&SEASONS, self.season, 1),
            pick(&EDUCATION, self.education, 1),
            self.service_time,
            self.bmi
        )
    }
}
