pub const APP_NAME: &str = "Shipment Estimator";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");

pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{}", APP_VERSION)
    }
}

/// User agent sent to the pricing oracle and weather provider.
pub fn user_agent() -> String {
    format!("shipment-estimator/{}", version_label().trim_start_matches('v'))
}
