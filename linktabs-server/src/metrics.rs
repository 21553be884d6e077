mod labels;

use crate::metrics::labels::AsMetricLabel;
use metrics::{counter, describe_counter};

pub use labels::{LoginOutcome, SaveOutcome};

pub fn register_metrics() {
    AuthMetrics::register();
    EditorMetrics::register();
    PageMetrics::register();
}

pub struct AuthMetrics;

impl AuthMetrics {
    pub fn login_attempt(outcome: LoginOutcome) {
        counter!("linktabs_login_attempts_total", "status" => outcome.as_metric_label())
            .increment(1);
    }

    fn register() {
        describe_counter!(
            "linktabs_login_attempts_total",
            "Admin login attempts, labeled by outcome (success, invalid_password, not_configured)"
        );
    }
}

pub struct EditorMetrics;

impl EditorMetrics {
    pub fn save(outcome: SaveOutcome) {
        counter!("linktabs_saves_total", "outcome" => outcome.as_metric_label()).increment(1);
    }

    fn register() {
        describe_counter!(
            "linktabs_saves_total",
            "Document saves from the admin editor, labeled by outcome (success, rejected, error)"
        );
    }
}

pub struct PageMetrics;

impl PageMetrics {
    pub fn view() {
        counter!("linktabs_page_views_total").increment(1);
    }

    fn register() {
        describe_counter!("linktabs_page_views_total", "Number of rendered pages");
    }
}
