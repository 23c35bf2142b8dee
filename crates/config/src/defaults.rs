//! Default values for configuration fields

pub fn default_min_outcomes() -> usize {
    2
}

pub fn default_max_outcomes() -> usize {
    10
}

pub fn default_max_market_id_len() -> usize {
    32
}

pub fn default_max_question_len() -> usize {
    256
}

pub fn default_max_resting_per_side() -> usize {
    50
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}
