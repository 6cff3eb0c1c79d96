//! Key bindings: SDL scancodes mapped to console buttons, with a TOML
//! override file in the platform config directory.

use std::collections::HashMap;
use std::path::PathBuf;

use olivine_core::core::machine::InputButton;
use sdl2::keyboard::Scancode;
use serde::Deserialize;

/// Maps SDL scancodes to machine button IDs.
pub struct KeyMap {
    map: HashMap<Scancode, u8>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Bind a scancode to a machine button ID.
    pub fn bind(&mut self, scancode: Scancode, button_id: u8) {
        self.map.insert(scancode, button_id);
    }

    /// Look up the machine button ID for a scancode.
    pub fn get(&self, scancode: Scancode) -> Option<u8> {
        self.map.get(&scancode).copied()
    }
}

/// User override file: `[bindings]` maps button names to SDL key names.
///
/// ```toml
/// [bindings]
/// A = "Z"
/// B = "X"
/// Start = "Return"
/// ```
#[derive(Deserialize, Default)]
struct Config {
    #[serde(default)]
    bindings: HashMap<String, String>,
}

fn config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("olivine").join("input.toml"))
}

fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let Ok(text) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    match toml::from_str(&text) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring malformed {}: {e}", path.display());
            Config::default()
        }
    }
}

fn default_scancode(name: &str) -> Option<Scancode> {
    match name {
        "Up" => Some(Scancode::Up),
        "Down" => Some(Scancode::Down),
        "Left" => Some(Scancode::Left),
        "Right" => Some(Scancode::Right),
        "A" => Some(Scancode::Z),
        "B" => Some(Scancode::X),
        "Select" => Some(Scancode::RShift),
        "Start" => Some(Scancode::Return),
        _ => None,
    }
}

/// Build the key map for a machine's buttons: defaults first, then the
/// user's TOML overrides by button name.
pub fn load_key_map(buttons: &[InputButton]) -> KeyMap {
    let config = load_config();
    let mut km = KeyMap::new();

    for button in buttons {
        let scancode = match config.bindings.get(button.name) {
            Some(key_name) => match Scancode::from_name(key_name) {
                Some(sc) => Some(sc),
                None => {
                    log::warn!("unknown key name {key_name:?} for button {}", button.name);
                    default_scancode(button.name)
                }
            },
            None => default_scancode(button.name),
        };

        if let Some(sc) = scancode {
            km.bind(sc, button.id);
        }
    }

    km
}
