//! Device tier detection and per-tier configuration
//!
//! The runtime environment (desktop browser shell, iOS Safari, or an iOS
//! WebView embedding) is classified once at startup from the user-agent
//! string. Every timing and render constant the rest of the application
//! consumes comes from the resolved [`TierConfig`]; no component re-detects
//! the device on its own.

use std::time::Duration;

/// Device/runtime classification bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceTier {
    /// Desktop browser or native shell
    #[default]
    Desktop,
    /// iOS Safari
    Ios,
    /// iOS app WebView (Flutter shell or bare WKWebView)
    IosWebView,
}

impl DeviceTier {
    /// Get human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            DeviceTier::Desktop => "Desktop",
            DeviceTier::Ios => "iOS",
            DeviceTier::IosWebView => "iOS WebView",
        }
    }
}

/// Shader precision requested from the render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPrecision {
    #[default]
    High,
    Medium,
}

/// Fixed configuration record for one device tier.
///
/// This table is the single source of truth for tier-dependent constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierConfig {
    /// Tier this config was resolved for
    pub tier: DeviceTier,
    /// Minimum time the loading screen stays visible
    pub min_display: Duration,
    /// Watchdog deadline for the whole load pipeline
    pub load_timeout: Duration,
    /// Deadline for the scene initializer to see a scene graph
    pub init_timeout: Duration,
    /// Delay between initialization finishing and reporting ready
    /// (covers renderer-internal upload latency)
    pub settle_delay: Duration,
    /// Requested shader precision
    pub precision: RenderPrecision,
    /// Whether the backend should antialias
    pub antialias: bool,
    /// Whether meshes cast/receive shadows at all
    pub shadows: bool,
    /// Upper bound on the device pixel ratio
    pub pixel_ratio_cap: f32,
    /// Radians of camera rotation per pointer pixel
    pub pointer_sensitivity: f32,
}

impl TierConfig {
    /// Resolve the configuration table entry for a tier.
    pub fn for_tier(tier: DeviceTier) -> Self {
        match tier {
            DeviceTier::Desktop => Self {
                tier,
                min_display: Duration::from_millis(1000),
                load_timeout: Duration::from_millis(30_000),
                init_timeout: Duration::from_millis(10_000),
                settle_delay: Duration::from_millis(500),
                precision: RenderPrecision::High,
                antialias: true,
                shadows: true,
                pixel_ratio_cap: 2.0,
                pointer_sensitivity: 0.002,
            },
            DeviceTier::Ios => Self {
                tier,
                min_display: Duration::from_millis(1500),
                load_timeout: Duration::from_millis(60_000),
                init_timeout: Duration::from_millis(20_000),
                settle_delay: Duration::from_millis(750),
                precision: RenderPrecision::High,
                antialias: true,
                shadows: false,
                pixel_ratio_cap: 1.5,
                pointer_sensitivity: 0.0025,
            },
            DeviceTier::IosWebView => Self {
                tier,
                min_display: Duration::from_millis(2000),
                load_timeout: Duration::from_millis(90_000),
                init_timeout: Duration::from_millis(30_000),
                settle_delay: Duration::from_millis(1000),
                precision: RenderPrecision::Medium,
                antialias: false,
                shadows: false,
                pixel_ratio_cap: 1.0,
                pointer_sensitivity: 0.003,
            },
        }
    }
}

/// Classify a user-agent string into a device tier.
///
/// Detection is plain substring containment, case-sensitive. A WebView is
/// recognized by the `Flutter` shell token, the Android `wv` token, or the
/// iOS pattern of WebKit without Safari.
pub fn classify(user_agent: &str) -> DeviceTier {
    let is_ios = ["iPad", "iPhone", "iPod"]
        .iter()
        .any(|token| user_agent.contains(token));

    let is_webview = user_agent.contains("Flutter")
        || user_agent.contains("wv")
        || (user_agent.contains("AppleWebKit") && !user_agent.contains("Safari"));

    if is_ios && is_webview {
        DeviceTier::IosWebView
    } else if is_ios {
        DeviceTier::Ios
    } else {
        DeviceTier::Desktop
    }
}

/// Environment variable a hosting shell uses to hand us its user-agent.
pub const USER_AGENT_ENV: &str = "WALKTHROUGH_USER_AGENT";

/// Resolve the tier configuration once at startup.
///
/// Embedding shells inject their user-agent through [`USER_AGENT_ENV`];
/// without one we are a plain desktop session.
pub fn detect() -> TierConfig {
    let user_agent = std::env::var(USER_AGENT_ENV).unwrap_or_default();
    let tier = classify(&user_agent);
    log::info!("Device tier: {} (ua: {:?})", tier.name(), user_agent);
    TierConfig::for_tier(tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPAD_SAFARI: &str = "Mozilla/5.0 (iPad; CPU OS 16_3 like Mac OS X) \
         AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.3 Mobile/15E148 Safari/604.1";
    const IPAD_FLUTTER: &str = "Mozilla/5.0 (iPad; CPU OS 16_3 like Mac OS X) \
         AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148 Flutter";
    const DESKTOP_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
         AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const DESKTOP_FIREFOX: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0";

    #[test]
    fn test_classify_sample_agents() {
        assert_eq!(classify(IPAD_SAFARI), DeviceTier::Ios);
        assert_eq!(classify(IPAD_FLUTTER), DeviceTier::IosWebView);
        assert_eq!(classify(DESKTOP_CHROME), DeviceTier::Desktop);
        assert_eq!(classify(DESKTOP_FIREFOX), DeviceTier::Desktop);
    }

    #[test]
    fn test_classify_bare_webkit_is_webview() {
        // WKWebView strips the Safari token
        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_3 like Mac OS X) \
             AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148";
        assert_eq!(classify(ua), DeviceTier::IosWebView);
    }

    #[test]
    fn test_classify_empty_is_desktop() {
        assert_eq!(classify(""), DeviceTier::Desktop);
    }

    #[test]
    fn test_tier_config_scaling() {
        let desktop = TierConfig::for_tier(DeviceTier::Desktop);
        let ios = TierConfig::for_tier(DeviceTier::Ios);
        let webview = TierConfig::for_tier(DeviceTier::IosWebView);

        assert!(desktop.load_timeout < ios.load_timeout);
        assert!(ios.load_timeout < webview.load_timeout);
        assert!(desktop.min_display < webview.min_display);
        assert!(desktop.shadows);
        assert!(!webview.shadows);
        assert_eq!(webview.precision, RenderPrecision::Medium);
    }
}
