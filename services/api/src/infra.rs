use metrics_exporter_prometheus::PrometheusHandle;
use region_audit::audit::AuditOptions;
use region_audit::config::AuditConfig;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Configured audit defaults, overridable per request or per command.
#[derive(Debug, Clone)]
pub(crate) struct AuditDefaults {
    config: Arc<AuditConfig>,
}

impl AuditDefaults {
    pub(crate) fn new(config: AuditConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub(crate) fn options(
        &self,
        include_recommendations: Option<bool>,
        target_audience: Option<String>,
    ) -> AuditOptions {
        let mut options = self.config.options();
        if let Some(include) = include_recommendations {
            options.include_recommendations = include;
        }
        if let Some(audience) = target_audience.filter(|value| !value.trim().is_empty()) {
            options.target_audience = Some(audience);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_configured_defaults() {
        let defaults = AuditDefaults::new(AuditConfig {
            include_recommendations: true,
            target_audience: Some("Families in Osaka".to_string()),
        });

        let options = defaults.options(Some(false), Some("Students".to_string()));
        assert!(!options.include_recommendations);
        assert_eq!(options.target_audience.as_deref(), Some("Students"));

        let options = defaults.options(None, Some("   ".to_string()));
        assert!(options.include_recommendations);
        assert_eq!(options.target_audience.as_deref(), Some("Families in Osaka"));
    }
}
