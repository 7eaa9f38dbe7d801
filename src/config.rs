//! Window and presentation settings for [`PinwheelApp`](crate::app::PinwheelApp)

/// Environment variable that overrides [`AppConfig::vsync`]
pub const VSYNC_ENV: &str = "PINWHEEL_VSYNC";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    /// Initial inner width in logical pixels
    pub width: u32,
    /// Initial inner height in logical pixels
    pub height: u32,
    pub vsync: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Pinwheel".to_string(),
            width: 1200,
            height: 800,
            vsync: true,
        }
    }
}

impl AppConfig {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Applies `PINWHEEL_VSYNC` when it is set
    ///
    /// `0`, `false`, `off` and `no` disable vsync; any other value enables it.
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(VSYNC_ENV) {
            Ok(value) => {
                let vsync = parse_flag(&value);
                log::debug!("{}={} -> vsync {}", VSYNC_ENV, value, vsync);
                self.with_vsync(vsync)
            }
            Err(_) => self,
        }
    }

    /// Width over height of the initial window, used before the first resize
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "off" | "no"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_landscape() {
        let config = AppConfig::default();
        assert!((config.aspect() - 1.5).abs() < f32::EPSILON);
        assert!(config.vsync);
    }

    #[test]
    fn zero_height_does_not_divide_by_zero() {
        let config = AppConfig::default().with_size(640, 0);
        assert_eq!(config.aspect(), 640.0);
    }

    #[test]
    fn vsync_flag_parsing() {
        assert!(!parse_flag("0"));
        assert!(!parse_flag(" Off "));
        assert!(!parse_flag("false"));
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
    }
}
