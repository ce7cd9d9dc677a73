use std::{io::ErrorKind, path::Path};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::term::{MAX_GRID_HEIGHT, MAX_GRID_WIDTH};

pub type Rgb = [u8; 3];

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub snake: Rgb,
    pub food: Rgb,
    pub border: Rgb,
    pub background: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            snake: [0, 255, 0],
            food: [255, 0, 0],
            border: [93, 216, 228],
            background: [0, 0, 0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Board size in the same units as `cell_size`
    pub board_width: u32,
    pub board_height: u32,
    pub cell_size: u32,
    /// Ticks per second
    pub tick_rate: u32,
    pub title: String,
    pub colors: Palette,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            board_width: 640,
            board_height: 480,
            cell_size: 20,
            tick_rate: 5,
            title: "Snake".to_string(),
            colors: Palette::default(),
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<(), String> {
        self.checked_grid()?;

        if !(1..=60).contains(&self.tick_rate) {
            return Err("Tick rate must be between 1 and 60 ticks per second".to_string());
        }
        Ok(())
    }
}

impl Settings {
    /// Reads settings from a YAML file. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Settings> {
        let settings = match std::fs::read_to_string(path) {
            Ok(content) => Settings::from_yaml(&content)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => Settings::default(),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read config file {}", path.display()));
            }
        };

        Ok(settings)
    }

    pub fn from_yaml(content: &str) -> Result<Settings> {
        let settings: Settings = serde_yaml_ng::from_str(content).context("Failed to deserialize config")?;
        settings.validate().map_err(|e| anyhow!("Config validation error: {}", e))?;
        Ok(settings)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).context("Failed to serialize config")
    }

    pub fn grid(&self) -> Result<Grid> {
        self.checked_grid().map_err(|e| anyhow!("Config validation error: {}", e))
    }

    fn checked_grid(&self) -> Result<Grid, String> {
        if self.cell_size == 0 {
            return Err("Cell size must be positive".to_string());
        }
        if self.board_width == 0 || self.board_width % self.cell_size != 0 {
            return Err(format!(
                "Board width {} must be a positive multiple of the cell size {}",
                self.board_width, self.cell_size
            ));
        }
        if self.board_height == 0 || self.board_height % self.cell_size != 0 {
            return Err(format!(
                "Board height {} must be a positive multiple of the cell size {}",
                self.board_height, self.cell_size
            ));
        }

        let grid = Grid::from_board(self.board_width, self.board_height, self.cell_size)
            .filter(|grid| grid.width() <= MAX_GRID_WIDTH && grid.height() <= MAX_GRID_HEIGHT)
            .ok_or_else(|| {
                format!(
                    "Board must be at most {}x{} cells, {}x{} with cell size {} is too large",
                    MAX_GRID_WIDTH, MAX_GRID_HEIGHT, self.board_width, self.board_height, self.cell_size
                )
            })?;

        if grid.cell_count() < 2 {
            return Err("Board must have room for at least two cells".to_string());
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.grid().unwrap(), Grid::new(32, 24));
        assert_eq!(settings.tick_rate, 5);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings = Settings::from_yaml("tick_rate: 10\ncolors:\n  snake: [1, 2, 3]\n").unwrap();
        assert_eq!(settings.tick_rate, 10);
        assert_eq!(settings.colors.snake, [1, 2, 3]);
        assert_eq!(settings.colors.food, [255, 0, 0]);
        assert_eq!(settings.board_width, 640);
    }

    #[test]
    fn test_yaml_round_trip() {
        let settings = Settings { title: "Zmeika".to_string(), ..Settings::default() };
        let yaml = settings.to_yaml().unwrap();
        assert_eq!(Settings::from_yaml(&yaml).unwrap(), settings);
    }

    #[test]
    fn test_validation() {
        let bad = [
            Settings { cell_size: 0, ..Settings::default() },
            Settings { board_width: 650, ..Settings::default() },
            Settings { board_height: 0, ..Settings::default() },
            Settings { board_width: 20, board_height: 20, ..Settings::default() },
            Settings { tick_rate: 0, ..Settings::default() },
            Settings { tick_rate: 61, ..Settings::default() },
        ];

        for settings in bad {
            assert!(settings.validate().is_err(), "{:?} should be rejected", settings);
        }

        assert!(Settings { board_width: 40, board_height: 20, ..Settings::default() }.validate().is_ok());
    }

    #[test]
    fn test_oversized_boards_are_rejected() {
        let bad = [
            "board_width: 4294967295\nboard_height: 20\ncell_size: 1\n",
            "board_width: 20\nboard_height: 4294967295\ncell_size: 1\n",
            "board_width: 32768\nboard_height: 20\ncell_size: 1\n",
            "board_width: 20\nboard_height: 65534\ncell_size: 1\n",
        ];

        for yaml in bad {
            let err = Settings::from_yaml(yaml).unwrap_err();
            assert!(format!("{:#}", err).contains("too large"), "{}", yaml);
        }

        let settings = Settings { board_width: 32768, board_height: 20, cell_size: 1, ..Settings::default() };
        assert!(settings.validate().is_err());
        assert!(settings.grid().is_err());
    }

    #[test]
    fn test_largest_board_is_accepted() {
        let settings = Settings {
            board_width: MAX_GRID_WIDTH as u32,
            board_height: MAX_GRID_HEIGHT as u32,
            cell_size: 1,
            ..Settings::default()
        };

        assert!(settings.validate().is_ok());
        assert_eq!(settings.grid().unwrap(), Grid::new(MAX_GRID_WIDTH, MAX_GRID_HEIGHT));
    }

    #[test]
    fn test_invalid_yaml_is_rejected() {
        assert!(Settings::from_yaml("cell_size: 0").is_err());
        assert!(Settings::from_yaml("tick_rate: fast").is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("snake.yaml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snake.yaml");
        fs::write(&path, "board_width: 200\nboard_height: 100\ncell_size: 10\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.grid().unwrap(), Grid::new(20, 10));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snake.yaml");
        fs::write(&path, "cell_size: 7\n").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Config validation error"));
    }
}
