use typed_builder::TypedBuilder;

/// Largest accepted `ppu_clock_multiplier`: 4 dots per M-cycle.
const MAX_PPU_CLOCK_MULTIPLIER: u32 = 4;

/// Knobs for the driving loop.
///
/// ```
/// use sharpboy_core::MachineConfig;
///
/// let config = MachineConfig::builder().enforce_halt(true).build();
/// assert_eq!(config.ppu_clock_multiplier, 1);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, TypedBuilder)]
pub struct MachineConfig {
    /// The PPU is ticked with `cycles * ppu_clock_multiplier` after every
    /// instruction. 1 hands it the dispatcher cost unchanged; 4 converts
    /// M-cycles to dots.
    #[builder(default = 1)]
    pub ppu_clock_multiplier: u32,
    /// Log every byte captured from the serial port.
    #[builder(default = false)]
    pub serial_echo: bool,
    /// Make HALT pause fetching until `IE & IF` is non-zero.
    #[builder(default = false)]
    pub enforce_halt: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl MachineConfig {
    /// Defaults overridden by `SHARPBOY_PPU_CLOCK_MULTIPLIER`,
    /// `SHARPBOY_SERIAL_ECHO` and `SHARPBOY_ENFORCE_HALT`. Values that fail
    /// to parse are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(multiplier) = lookup("SHARPBOY_PPU_CLOCK_MULTIPLIER")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|m| (1..=MAX_PPU_CLOCK_MULTIPLIER).contains(m))
        {
            config.ppu_clock_multiplier = multiplier;
        }
        if let Some(echo) = lookup("SHARPBOY_SERIAL_ECHO").and_then(|v| parse_flag(&v)) {
            config.serial_echo = echo;
        }
        if let Some(halt) = lookup("SHARPBOY_ENFORCE_HALT").and_then(|v| parse_flag(&v)) {
            config.enforce_halt = halt;
        }
        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn builder_defaults() {
        let config = MachineConfig::builder().build();
        assert_eq!(config.ppu_clock_multiplier, 1);
        assert!(!config.serial_echo);
        assert!(!config.enforce_halt);
        assert_eq!(config, MachineConfig::default());
    }

    #[test]
    fn env_overrides() {
        let config = MachineConfig::from_lookup(lookup(&[
            ("SHARPBOY_PPU_CLOCK_MULTIPLIER", "4"),
            ("SHARPBOY_SERIAL_ECHO", "yes"),
            ("SHARPBOY_ENFORCE_HALT", "1"),
        ]));
        assert_eq!(config.ppu_clock_multiplier, 4);
        assert!(config.serial_echo);
        assert!(config.enforce_halt);
    }

    #[test]
    fn bad_env_values_keep_defaults() {
        let config = MachineConfig::from_lookup(lookup(&[
            ("SHARPBOY_PPU_CLOCK_MULTIPLIER", "0"),
            ("SHARPBOY_ENFORCE_HALT", "maybe"),
        ]));
        assert_eq!(config, MachineConfig::default());

        for value in ["5", "4294967295"] {
            let config =
                MachineConfig::from_lookup(lookup(&[("SHARPBOY_PPU_CLOCK_MULTIPLIER", value)]));
            assert_eq!(config.ppu_clock_multiplier, 1, "{value}");
        }
    }
}
